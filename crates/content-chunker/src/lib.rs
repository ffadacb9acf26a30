//! # Context Content Chunker
//!
//! Splits a large block of concatenated source text into ordered,
//! token-bounded chunks for consumers with a hard input limit (LLM context
//! windows, embedding models, clipboard-sized exports).
//!
//! ## Philosophy
//!
//! - Lines are atomic: a chunk never ends mid-line
//! - `max_tokens` is a hard ceiling; only a single oversized line may exceed it
//! - Above `min_chunk_size`, prefer blank lines, headers, comment ends and
//!   definition openers as split points, but never inside a fenced block
//! - Without overlap, concatenating the chunks gives back the input exactly
//!
//! Structural detection is heuristic, line-level pattern matching. No
//! language is parsed.
//!
//! ## Architecture
//!
//! ```text
//! Content + ChunkingConfig
//!     │
//!     ├──> Validation (fail fast on bad budgets)
//!     │
//!     ├──> Structure Analyzer
//!     │    ├─> Language detection (injected, called once)
//!     │    └─> Per-line classification → ContentStructureProfile
//!     │
//!     ├──> Strategy Executor (balanced | natural | aggressive)
//!     │    ├─> Per-line token estimates (injected estimator)
//!     │    ├─> Break Policy decisions
//!     │    └─> Overlap seeding
//!     │
//!     └──> Finalisation
//!          ├─> total_chunks
//!          ├─> Significance tiers
//!          └─> Optional file-segment attribution
//! ```
//!
//! ## Example
//!
//! ```rust
//! use context_content_chunker::{ChunkingConfig, ContentChunker};
//!
//! let config = ChunkingConfig {
//!     max_tokens: 200,
//!     min_chunk_size: 20,
//!     ..ChunkingConfig::default()
//! };
//! let chunker = ContentChunker::new();
//!
//! let text = "# Intro\n\nSome words.\n\n## Usage\n\nMore words.\n";
//! let chunks = chunker.chunk(text, &config).unwrap();
//! for chunk in &chunks {
//!     println!(
//!         "Chunk {}/{} at lines {}-{}: {} tokens ({})",
//!         chunk.metadata.chunk_index + 1,
//!         chunk.metadata.total_chunks,
//!         chunk.start_line,
//!         chunk.end_line,
//!         chunk.token_count,
//!         chunk.metadata.significance
//!     );
//! }
//! ```

mod chunker;
mod config;
mod error;
mod estimator;
mod language;
mod patterns;
mod policy;
mod segments;
mod significance;
mod strategy;
mod structure;
mod types;

pub use chunker::{chunk, ChunkingStats, ContentChunker};
pub use config::{ChunkingConfig, ChunkingStrategy};
pub use error::{ChunkerError, Result};
pub use estimator::{CharRatioEstimator, HeuristicLanguageDetector, LanguageDetector, TokenEstimator};
pub use language::Language;
pub use policy::{BreakDecision, BreakPolicy};
pub use segments::{FileIndex, FileSegmentSource, NoFileSegments};
pub use significance::SignificanceScorer;
pub use structure::{ContentStructureProfile, LineInfo, LineKind, StructureAnalyzer};
pub use types::{Chunk, ChunkMetadata, FileSegment, Significance};
