use context_content_chunker::{
    chunk, Chunk, ChunkerError, ChunkingConfig, ChunkingStrategy, ContentChunker, Significance,
};
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn joined(chunks: &[Chunk]) -> String {
    chunks.iter().map(|chunk| chunk.content.as_str()).collect()
}

fn function_body(name: &str, statement: &str) -> Vec<String> {
    let mut lines = vec![format!("function {name}() {{")];
    lines.extend((0..48).map(|_| format!("  {statement}();")));
    lines.push("}".to_string());
    lines
}

#[test]
fn plain_prose_fits_one_low_chunk() {
    let prose: String = (1..=30)
        .map(|n| format!("Plain prose line {n} about a quiet morning walk.\n"))
        .collect();
    let config = ChunkingConfig {
        max_tokens: 1000,
        strategy: ChunkingStrategy::Balanced,
        ..ChunkingConfig::default()
    };

    let chunks = chunk(&prose, &config).expect("valid config");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, prose);
    assert_eq!(chunks[0].start_line, 1);
    assert_eq!(chunks[0].end_line, 30);
    assert_eq!(chunks[0].metadata.significance, Significance::Low);
}

#[test]
fn empty_input_has_no_chunks() {
    let chunks = chunk("", &ChunkingConfig::default()).expect("valid config");
    assert!(chunks.is_empty());
}

#[test]
fn two_functions_split_at_the_blank_line() {
    let mut lines = function_body("alpha", "a");
    lines.push(String::new());
    lines.extend(function_body("beta", "b"));
    let content = format!("{}\n", lines.join("\n"));

    let config = ChunkingConfig {
        max_tokens: 200,
        min_chunk_size: 50,
        overlap_size: 0,
        strategy: ChunkingStrategy::Balanced,
        ..ChunkingConfig::default()
    };
    let chunks = chunk(&content, &config).expect("valid config");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].end_line, 50);
    assert!(chunks[0].content.ends_with("}\n"));
    assert_eq!(chunks[1].start_line, 51);
    assert!(chunks[1].content.starts_with("\nfunction beta() {"));
    assert_eq!(joined(&chunks), content);
}

#[test]
fn oversized_line_stays_whole() {
    let line = "x".repeat(200);
    let config = ChunkingConfig {
        max_tokens: 10,
        min_chunk_size: 0,
        ..ChunkingConfig::default()
    };

    let chunks = chunk(&line, &config).expect("valid config");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].token_count, 50);
    assert_eq!(chunks[0].content, line);
}

#[test]
fn negative_ceiling_is_rejected_before_any_line() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let chunker = ContentChunker::new().with_token_estimator(move |text: &str, _: Option<&str>| {
        counter.fetch_add(1, Ordering::SeqCst);
        text.len()
    });
    let config = ChunkingConfig {
        max_tokens: -1,
        ..ChunkingConfig::default()
    };

    let err = chunker
        .chunk("some\ncontent\n", &config)
        .expect_err("max_tokens = -1 must fail");

    assert!(matches!(err, ChunkerError::InvalidConfig(_)), "got {err:?}");
    assert!(err.to_string().contains("max_tokens"));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn overlap_equal_to_ceiling_is_rejected() {
    let config = ChunkingConfig {
        max_tokens: 100,
        overlap_size: 100,
        ..ChunkingConfig::default()
    };
    let err = chunk("text", &config).expect_err("overlap must stay below max_tokens");
    assert!(err.is_config_error());
}

#[test]
fn natural_strategy_is_known_alias_of_balanced() {
    let mut lines = function_body("alpha", "a");
    lines.push(String::new());
    lines.push("## Notes".to_string());
    lines.push("Some trailing prose about alpha.".to_string());
    lines.push(String::new());
    lines.extend(function_body("beta", "b"));
    let content = lines.join("\n");

    let balanced = ChunkingConfig {
        max_tokens: 120,
        min_chunk_size: 30,
        strategy: ChunkingStrategy::Balanced,
        ..ChunkingConfig::default()
    };
    let natural = ChunkingConfig {
        strategy: ChunkingStrategy::Natural,
        ..balanced.clone()
    };

    let boundaries = |chunks: Vec<Chunk>| -> Vec<(usize, usize, usize)> {
        chunks
            .into_iter()
            .map(|chunk| (chunk.start_line, chunk.end_line, chunk.token_count))
            .collect()
    };
    let from_balanced = boundaries(chunk(&content, &balanced).expect("valid config"));
    let from_natural = boundaries(chunk(&content, &natural).expect("valid config"));

    assert!(from_balanced.len() > 1);
    assert_eq!(from_natural, from_balanced);
}

#[test]
fn fenced_block_is_not_split_above_the_floor() {
    let mut content = String::from("Intro paragraph.\n\n```python\n");
    for n in 0..20 {
        content.push_str(&format!("value_{n} = compute({n})\n"));
        content.push('\n');
    }
    content.push_str("```\n\nAfter the block.\n");

    let config = ChunkingConfig {
        max_tokens: 2000,
        min_chunk_size: 10,
        ..ChunkingConfig::default()
    };
    let chunks = chunk(&content, &config).expect("valid config");

    let fence_open = 3;
    let fence_close = content
        .lines()
        .enumerate()
        .filter(|(_, line)| *line == "```")
        .last()
        .map(|(idx, _)| idx + 1)
        .expect("closing fence");
    for chunk in &chunks {
        let splits_block = chunk.start_line > fence_open && chunk.start_line <= fence_close;
        assert!(!splits_block, "chunk starts inside the fence at line {}", chunk.start_line);
    }
    assert_eq!(joined(&chunks), content);
}

#[test]
fn markdown_sections_prefer_header_boundaries() {
    let section = |title: &str| {
        let mut text = format!("## {title}\n\n");
        for n in 0..6 {
            text.push_str(&format!("Sentence {n} of the {title} section goes here.\n"));
        }
        text.push('\n');
        text
    };
    let content = format!("# Guide\n\n{}{}{}", section("Install"), section("Usage"), section("Faq"));

    let config = ChunkingConfig {
        max_tokens: 100,
        min_chunk_size: 40,
        ..ChunkingConfig::default()
    };
    let chunks = chunk(&content, &config).expect("valid config");

    assert!(chunks.len() >= 2);
    for chunk in chunks.iter().skip(1) {
        let first_text = chunk
            .content
            .lines()
            .find(|line| !line.trim().is_empty())
            .unwrap_or_default();
        assert!(
            first_text.starts_with('#') || chunk.content.starts_with('\n'),
            "chunk {} opens mid-section: {first_text:?}",
            chunk.metadata.chunk_index
        );
    }
    assert_eq!(joined(&chunks), content);
}
