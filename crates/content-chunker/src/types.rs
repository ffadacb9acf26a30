use serde::{Deserialize, Serialize};
use std::fmt;

/// A bounded slice of the input text with its metadata
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique within one chunking call; not stable across calls
    pub id: String,

    /// The text slice (overlap lines included)
    pub content: String,

    /// Estimate of `content` by the estimator that drove the breaks
    pub token_count: usize,

    /// Start line (1-indexed)
    pub start_line: usize,

    /// End line (1-indexed, inclusive)
    pub end_line: usize,

    /// Byte offset of `start_line` in the original input
    pub start_char: usize,

    /// Byte offset just past `end_line` in the original input
    pub end_char: usize,

    pub metadata: ChunkMetadata,
}

impl Chunk {
    /// Check if chunk covers a specific line of the original input
    #[must_use]
    pub const fn contains_line(&self, line: usize) -> bool {
        line >= self.start_line && line <= self.end_line
    }

    /// Check if the chunk went over a token ceiling
    #[must_use]
    pub const fn exceeds(&self, max_tokens: usize) -> bool {
        self.token_count > max_tokens
    }
}

/// Metadata about a chunk
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ChunkMetadata {
    /// Position among siblings (0-indexed)
    pub chunk_index: usize,

    /// Number of chunks produced by the same call
    pub total_chunks: usize,

    /// `end_line - start_line + 1`
    pub lines_count: usize,

    /// Language detected for the whole input
    pub language: Option<String>,

    pub significance: Significance,

    /// Files contributing to this chunk, when a line→file map was supplied
    #[serde(default)]
    pub file_segments: Vec<FileSegment>,
}

/// Part of a chunk attributed to one source file
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileSegment {
    pub file_path: String,

    /// First line of the file inside the chunk (1-indexed, original input)
    pub start_line: usize,

    /// Last line of the file inside the chunk (inclusive)
    pub end_line: usize,

    /// Share of the chunk's lines that belong to this file (0-100)
    pub percentage: f64,
}

/// Coarse importance tier assigned after chunking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Significance {
    High,
    Medium,
    #[default]
    Low,
}

impl Significance {
    /// Get human-readable name
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

impl fmt::Display for Significance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(start_line: usize, end_line: usize, token_count: usize) -> Chunk {
        Chunk {
            id: "c".to_string(),
            content: "code".to_string(),
            token_count,
            start_line,
            end_line,
            start_char: 0,
            end_char: 4,
            metadata: ChunkMetadata::default(),
        }
    }

    #[test]
    fn test_chunk_contains_line() {
        let chunk = chunk(10, 15, 1);
        assert!(chunk.contains_line(10));
        assert!(chunk.contains_line(12));
        assert!(chunk.contains_line(15));
        assert!(!chunk.contains_line(9));
        assert!(!chunk.contains_line(16));
    }

    #[test]
    fn test_chunk_exceeds() {
        assert!(chunk(1, 1, 50).exceeds(10));
        assert!(!chunk(1, 1, 10).exceeds(10));
    }

    #[test]
    fn test_significance_serde_is_lowercase() {
        let json = serde_json::to_string(&Significance::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        let parsed: Significance = serde_json::from_str("\"high\"").unwrap();
        assert_eq!(parsed, Significance::High);
        assert_eq!(Significance::default(), Significance::Low);
    }

    #[test]
    fn test_metadata_defaults_have_no_segments() {
        let metadata = ChunkMetadata::default();
        assert!(metadata.file_segments.is_empty());
        assert_eq!(metadata.significance, Significance::Low);
    }
}
