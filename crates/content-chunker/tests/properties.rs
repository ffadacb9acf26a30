use context_content_chunker::{chunk, Chunk, ChunkMetadata, ChunkingConfig, ChunkingStrategy};
use proptest::prelude::*;

const TEMPLATES: &[&str] = &[
    "",
    "   ",
    "# Title",
    "## Section",
    "Some plain words in a sentence.",
    "// line comment",
    "/* block comment starts",
    " * inside the block",
    " */",
    "fn compute(value: u32) -> u32 {",
    "    let doubled = value * 2;",
    "}",
    "export class Store {",
    "def handler(event):",
    "```rust",
    "```",
    "import os",
    "héllo wörld, naïve café 🎉",
];

fn line() -> impl Strategy<Value = String> {
    prop_oneof![
        6 => prop::sample::select(TEMPLATES).prop_map(str::to_string),
        2 => "[a-z ]{0,60}",
        1 => "[a-zA-Z0-9_(){};]{80,300}",
    ]
}

fn input() -> impl Strategy<Value = String> {
    (prop::collection::vec(line(), 0..120), any::<bool>()).prop_map(|(lines, trailing)| {
        let mut text = lines.join("\n");
        if trailing && !lines.is_empty() {
            text.push('\n');
        }
        text
    })
}

fn strategy() -> impl Strategy<Value = ChunkingStrategy> {
    prop::sample::select(vec![
        ChunkingStrategy::Balanced,
        ChunkingStrategy::Natural,
        ChunkingStrategy::Aggressive,
    ])
}

fn config(overlap: bool) -> impl Strategy<Value = ChunkingConfig> {
    (
        1i64..300,
        0i64..200,
        strategy(),
        any::<bool>(),
        any::<bool>(),
        0i64..4,
    )
        .prop_map(
            move |(max_tokens, min_chunk_size, strategy, code_blocks, markdown, overlap_size)| {
                ChunkingConfig {
                    max_tokens,
                    strategy,
                    preserve_code_blocks: code_blocks,
                    preserve_markdown_structure: markdown,
                    min_chunk_size,
                    overlap_size: if overlap {
                        overlap_size.min(max_tokens - 1)
                    } else {
                        0
                    },
                }
            },
        )
}

/// Everything but the random id
fn stable(chunk: &Chunk) -> (&str, usize, usize, usize, usize, usize, &ChunkMetadata) {
    (
        chunk.content.as_str(),
        chunk.token_count,
        chunk.start_line,
        chunk.end_line,
        chunk.start_char,
        chunk.end_char,
        &chunk.metadata,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(192))]

    #[test]
    fn concatenation_reproduces_input(content in input(), config in config(false)) {
        let chunks = chunk(&content, &config).unwrap();
        if content.trim().is_empty() {
            prop_assert!(chunks.is_empty());
        } else {
            let joined: String = chunks.iter().map(|chunk| chunk.content.as_str()).collect();
            prop_assert_eq!(joined, content);
        }
    }

    #[test]
    fn chunks_are_ordered_and_counted(content in input(), config in config(true)) {
        let chunks = chunk(&content, &config).unwrap();
        for (idx, chunk) in chunks.iter().enumerate() {
            prop_assert_eq!(chunk.metadata.chunk_index, idx);
            prop_assert_eq!(chunk.metadata.total_chunks, chunks.len());
            prop_assert!(chunk.start_line <= chunk.end_line);
            prop_assert!(content[..chunk.end_char].ends_with(&chunk.content));
        }
        for pair in chunks.windows(2) {
            prop_assert!(pair[0].start_line < pair[1].start_line);
            prop_assert_eq!(pair[0].end_line + 1, pair[1].start_line);
        }
    }

    #[test]
    fn chunking_is_deterministic(content in input(), config in config(true)) {
        let first = chunk(&content, &config).unwrap();
        let second = chunk(&content, &config).unwrap();
        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            prop_assert_eq!(stable(a), stable(b));
        }
    }

    #[test]
    fn ceiling_holds_except_for_single_lines(content in input(), config in config(false)) {
        let max = usize::try_from(config.max_tokens).unwrap();
        for chunk in chunk(&content, &config).unwrap() {
            prop_assert!(
                chunk.token_count <= max || chunk.metadata.lines_count == 1,
                "chunk {} spans {} lines with {} tokens over {}",
                chunk.metadata.chunk_index,
                chunk.metadata.lines_count,
                chunk.token_count,
                max
            );
        }
    }
}
