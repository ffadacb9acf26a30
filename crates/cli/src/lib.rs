use anyhow::{Context as AnyhowContext, Result};
use clap::{Parser, ValueEnum};
use context_content_chunker::{
    Chunk, ChunkingConfig, ChunkingStats, ChunkingStrategy, ContentChunker, FileIndex,
};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

fn print_stdout(text: &str) -> Result<()> {
    use std::io::Write;

    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

#[derive(Parser)]
#[command(name = "context-split")]
#[command(about = "Split concatenated source text into token-bounded chunks", long_about = None)]
#[command(version)]
struct Cli {
    /// Input file; reads stdin when omitted or "-"
    input: Option<PathBuf>,

    /// Start from a built-in configuration
    #[arg(long, value_enum, conflicts_with = "config")]
    preset: Option<Preset>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Hard token ceiling per chunk
    #[arg(long, allow_negative_numbers = true)]
    max_tokens: Option<i64>,

    /// Soft token floor before structural breaks are taken
    #[arg(long, allow_negative_numbers = true)]
    min_chunk_size: Option<i64>,

    /// Lines of the previous chunk repeated at the start of the next one
    #[arg(long, allow_negative_numbers = true)]
    overlap: Option<i64>,

    /// Chunking strategy
    #[arg(long, value_enum)]
    strategy: Option<StrategyFlag>,

    /// Allow breaks inside fenced code blocks
    #[arg(long)]
    no_preserve_code_blocks: bool,

    /// Attribute chunks to files using `--- File: <path> ---` headers
    #[arg(long)]
    attribute_files: bool,

    /// Output chunks as a JSON array
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Quiet mode: log only warnings/errors
    #[arg(long)]
    quiet: bool,
}

#[derive(Copy, Clone, ValueEnum)]
enum StrategyFlag {
    Balanced,
    Natural,
    Aggressive,
}

impl StrategyFlag {
    const fn as_domain(self) -> ChunkingStrategy {
        match self {
            StrategyFlag::Balanced => ChunkingStrategy::Balanced,
            StrategyFlag::Natural => ChunkingStrategy::Natural,
            StrategyFlag::Aggressive => ChunkingStrategy::Aggressive,
        }
    }
}

#[derive(Copy, Clone, ValueEnum)]
enum Preset {
    /// Large budget for long-context models
    Llm,
    /// 4k-class windows with a little overlap
    Small,
    /// Size-only splitting, no structure handling
    Speed,
}

impl Preset {
    fn config(self) -> ChunkingConfig {
        match self {
            Preset::Llm => ChunkingConfig::for_llm_context(),
            Preset::Small => ChunkingConfig::for_small_context(),
            Preset::Speed => ChunkingConfig::for_speed(),
        }
    }
}

pub fn main_entry() -> Result<()> {
    let mut cli = Cli::parse();

    // stdout is reserved for JSON
    if cli.json {
        cli.quiet = true;
    }

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let config = resolve_config(&cli)?;
    let content = read_input(cli.input.as_deref())?;

    let chunker = ContentChunker::new();
    log::debug!(
        "chunking {} bytes (~{} tokens): max_tokens={} min_chunk_size={} overlap={} strategy={}",
        content.len(),
        chunker.estimate_tokens(&content, None),
        config.max_tokens,
        config.min_chunk_size,
        config.overlap_size,
        config.strategy
    );

    let chunks = if cli.attribute_files {
        let index = FileIndex::from_file_headers(&content);
        if index.is_empty() {
            log::warn!("--attribute-files: no `--- File: <path> ---` headers found in input");
        }
        chunker.chunk_with_sources(&content, &config, &index)?
    } else {
        chunker.chunk(&content, &config)?
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&chunks).context("Failed to serialize chunks")?;
        return print_stdout(&json);
    }

    print_stdout(&render_summary(&chunks))
}

fn resolve_config(cli: &Cli) -> Result<ChunkingConfig> {
    let mut config = match (&cli.config, cli.preset) {
        (Some(path), _) => ChunkingConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        (None, Some(preset)) => preset.config(),
        (None, None) => ChunkingConfig::default(),
    };

    if let Some(max_tokens) = cli.max_tokens {
        config.max_tokens = max_tokens;
    }
    if let Some(min_chunk_size) = cli.min_chunk_size {
        config.min_chunk_size = min_chunk_size;
    }
    if let Some(overlap) = cli.overlap {
        config.overlap_size = overlap;
    }
    if let Some(strategy) = cli.strategy {
        config.strategy = strategy.as_domain();
    }
    if cli.no_preserve_code_blocks {
        config.preserve_code_blocks = false;
    }

    config.validate().context("Invalid chunking configuration")?;
    Ok(config)
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input from {}", path.display())),
        _ => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            Ok(buffer)
        }
    }
}

fn render_summary(chunks: &[Chunk]) -> String {
    let mut out = String::new();
    for chunk in chunks {
        out.push_str(&format!(
            "#{} lines {}-{} tokens {} {}",
            chunk.metadata.chunk_index,
            chunk.start_line,
            chunk.end_line,
            chunk.token_count,
            chunk.metadata.significance
        ));
        for segment in &chunk.metadata.file_segments {
            out.push_str(&format!(" {}:{:.0}%", segment.file_path, segment.percentage));
        }
        out.push('\n');
    }
    out.push_str(&ChunkingStats::from_chunks(chunks).to_string());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use context_content_chunker::chunk;

    #[test]
    fn overrides_apply_on_top_of_preset() {
        let cli = Cli::parse_from([
            "context-split",
            "--preset",
            "speed",
            "--max-tokens",
            "300",
            "--strategy",
            "natural",
        ]);
        let config = resolve_config(&cli).unwrap();
        assert_eq!(config.max_tokens, 300);
        assert_eq!(config.strategy, ChunkingStrategy::Natural);
        assert!(!config.preserve_code_blocks);
    }

    #[test]
    fn negative_override_is_rejected() {
        let cli = Cli::parse_from(["context-split", "--min-chunk-size", "-5"]);
        let err = resolve_config(&cli).unwrap_err();
        assert!(format!("{err:#}").contains("min_chunk_size"));
    }

    #[test]
    fn summary_lists_every_chunk_then_stats() {
        let config = ChunkingConfig {
            max_tokens: 8,
            min_chunk_size: 0,
            ..ChunkingConfig::default()
        };
        let chunks = chunk("first line here\n\nsecond line here\n", &config).unwrap();
        let summary = render_summary(&chunks);
        let lines: Vec<&str> = summary.lines().collect();

        assert_eq!(lines.len(), chunks.len() + 1);
        assert!(lines[0].starts_with("#0 lines 1-"));
        assert!(lines.last().unwrap().starts_with("Chunks: "));
    }
}
