use crate::error::{ChunkerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Configuration for content chunking behavior
///
/// Numeric fields are signed on purpose: values read from a config file or a
/// request body reach [`ChunkingConfig::validate`] as written, so a negative
/// budget is reported as a configuration error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Maximum chunk size in tokens (hard limit, forces a break)
    pub max_tokens: i64,

    /// Chunking strategy to use
    pub strategy: ChunkingStrategy,

    /// Never take a structural break inside a fenced code block
    pub preserve_code_blocks: bool,

    /// Detect markdown headers while profiling the content
    pub preserve_markdown_structure: bool,

    /// Minimum chunk size in tokens (soft limit for structural breaks)
    pub min_chunk_size: i64,

    /// Number of trailing lines repeated at the start of the next chunk
    pub overlap_size: i64,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            strategy: ChunkingStrategy::Balanced,
            preserve_code_blocks: true,
            preserve_markdown_structure: true,
            min_chunk_size: 500,
            overlap_size: 0,
        }
    }
}

impl ChunkingConfig {
    /// Create config for large LLM context windows
    pub fn for_llm_context() -> Self {
        Self {
            max_tokens: 16_000,
            min_chunk_size: 2_000,
            ..Default::default()
        }
    }

    /// Create config for small (4k-class) context windows
    pub fn for_small_context() -> Self {
        Self {
            max_tokens: 3_000,
            min_chunk_size: 300,
            overlap_size: 3,
            ..Default::default()
        }
    }

    /// Create config optimized for speed (size-only splitting)
    pub fn for_speed() -> Self {
        Self {
            strategy: ChunkingStrategy::Aggressive,
            preserve_code_blocks: false,
            preserve_markdown_structure: false,
            min_chunk_size: 0,
            ..Default::default()
        }
    }

    /// Parse a TOML document and validate the result
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML config file and validate the result
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.limits().map(|_| ())
    }

    /// Validate and convert into the unsigned limits used by the assembler
    pub(crate) fn limits(&self) -> Result<Limits> {
        if self.max_tokens <= 0 {
            return Err(ChunkerError::invalid_config(format!(
                "max_tokens must be > 0 (got {})",
                self.max_tokens
            )));
        }

        if self.min_chunk_size < 0 {
            return Err(ChunkerError::invalid_config(format!(
                "min_chunk_size cannot be negative (got {})",
                self.min_chunk_size
            )));
        }

        if self.overlap_size < 0 {
            return Err(ChunkerError::invalid_config(format!(
                "overlap_size cannot be negative (got {})",
                self.overlap_size
            )));
        }

        if self.overlap_size >= self.max_tokens {
            return Err(ChunkerError::invalid_config(format!(
                "overlap_size ({}) must be smaller than max_tokens ({})",
                self.overlap_size, self.max_tokens
            )));
        }

        Ok(Limits {
            max_tokens: to_usize(self.max_tokens),
            min_chunk_size: to_usize(self.min_chunk_size),
            overlap_lines: to_usize(self.overlap_size),
            preserve_code_blocks: self.preserve_code_blocks,
        })
    }
}

fn to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(usize::MAX)
}

/// Validated, unsigned view of a [`ChunkingConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Limits {
    pub max_tokens: usize,
    pub min_chunk_size: usize,
    pub overlap_lines: usize,
    pub preserve_code_blocks: bool,
}

/// Strategy for choosing chunk boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkingStrategy {
    /// Token-driven with structural breaks above the soft floor
    #[default]
    Balanced,

    /// Currently runs the balanced algorithm unchanged
    Natural,

    /// Size-only: close a chunk right before it would overflow
    Aggressive,
}

impl ChunkingStrategy {
    /// Get strategy name as string
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::Natural => "natural",
            Self::Aggressive => "aggressive",
        }
    }
}

impl fmt::Display for ChunkingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChunkingStrategy {
    type Err = ChunkerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "balanced" => Ok(Self::Balanced),
            "natural" => Ok(Self::Natural),
            "aggressive" => Ok(Self::Aggressive),
            other => Err(ChunkerError::invalid_config(format!(
                "unknown strategy: {other}"
            ))),
        }
    }
}
