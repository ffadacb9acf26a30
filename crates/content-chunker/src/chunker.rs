use crate::config::ChunkingConfig;
use crate::error::Result;
use crate::estimator::{
    CharRatioEstimator, HeuristicLanguageDetector, LanguageDetector, TokenEstimator,
};
use crate::segments::FileSegmentSource;
use crate::significance::SignificanceScorer;
use crate::strategy::StrategyExecutor;
use crate::structure::{ContentStructureProfile, StructureAnalyzer};
use crate::types::{Chunk, Significance};

/// Main chunker interface.
///
/// Owns its token estimator and language detector and nothing else, so one
/// instance can serve any number of calls from any thread.
pub struct ContentChunker {
    estimator: Box<dyn TokenEstimator + Send + Sync>,
    detector: Box<dyn LanguageDetector + Send + Sync>,
    scorer: SignificanceScorer,
}

impl ContentChunker {
    /// Create a chunker with the default collaborators
    #[must_use]
    pub fn new() -> Self {
        Self {
            estimator: Box::new(CharRatioEstimator::default()),
            detector: Box::new(HeuristicLanguageDetector),
            scorer: SignificanceScorer,
        }
    }

    /// Builder: replace the token estimator
    #[must_use]
    pub fn with_token_estimator(
        mut self,
        estimator: impl TokenEstimator + Send + Sync + 'static,
    ) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    /// Builder: replace the language detector
    #[must_use]
    pub fn with_language_detector(
        mut self,
        detector: impl LanguageDetector + Send + Sync + 'static,
    ) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Split `content` into ordered chunks.
    ///
    /// Fails only when `config` is invalid, before any line is looked at.
    pub fn chunk(&self, content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
        self.run(content, config, None)
    }

    /// Like [`ContentChunker::chunk`], also attributing each chunk to source files
    pub fn chunk_with_sources(
        &self,
        content: &str,
        config: &ChunkingConfig,
        sources: &dyn FileSegmentSource,
    ) -> Result<Vec<Chunk>> {
        self.run(content, config, Some(sources))
    }

    /// Structure profile the chunker would use for `content`
    pub fn analyze(&self, content: &str, config: &ChunkingConfig) -> ContentStructureProfile {
        StructureAnalyzer::new(config.preserve_markdown_structure)
            .analyze(content, self.detector.as_ref())
    }

    /// Token estimate with the chunker's own estimator
    pub fn estimate_tokens(&self, text: &str, language_hint: Option<&str>) -> usize {
        self.estimator.estimate(text, language_hint)
    }

    fn run(
        &self,
        content: &str,
        config: &ChunkingConfig,
        sources: Option<&dyn FileSegmentSource>,
    ) -> Result<Vec<Chunk>> {
        let limits = config.limits()?;

        // Collaborators are resolved once here; the line loop never calls the detector.
        let profile = self.analyze(content, config);
        let executor =
            StrategyExecutor::new(config.strategy, limits, &profile, self.estimator.as_ref());
        let mut chunks = executor.execute(content);

        let total = chunks.len();
        for chunk in &mut chunks {
            chunk.metadata.total_chunks = total;
            chunk.metadata.significance = self.scorer.score(
                &chunk.content,
                chunk.token_count,
                chunk.metadata.language.as_deref(),
            );
            if let Some(sources) = sources {
                chunk.metadata.file_segments =
                    sources.segments_for(chunk.start_line, chunk.end_line);
            }
            if chunk.exceeds(limits.max_tokens) {
                log::warn!(
                    "chunk {} (lines {}-{}) has {} tokens, over the {} limit: a single line cannot be split",
                    chunk.metadata.chunk_index,
                    chunk.start_line,
                    chunk.end_line,
                    chunk.token_count,
                    limits.max_tokens
                );
            }
        }

        log::debug!(
            "chunked {} lines ({} language) into {} chunks with {} strategy",
            profile.line_count(),
            profile.language.as_deref().unwrap_or("unknown"),
            total,
            config.strategy
        );

        Ok(chunks)
    }

    /// Get statistics about chunking
    #[must_use]
    pub fn get_stats(chunks: &[Chunk]) -> ChunkingStats {
        ChunkingStats::from_chunks(chunks)
    }
}

impl Default for ContentChunker {
    fn default() -> Self {
        Self::new()
    }
}

/// Chunk `content` with the default estimator and detector
pub fn chunk(content: &str, config: &ChunkingConfig) -> Result<Vec<Chunk>> {
    ContentChunker::new().chunk(content, config)
}

/// Statistics about chunking results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkingStats {
    pub total_chunks: usize,
    pub total_lines: usize,
    pub total_tokens: usize,
    pub avg_tokens_per_chunk: usize,
    pub min_tokens: usize,
    pub max_tokens: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl ChunkingStats {
    pub fn from_chunks(chunks: &[Chunk]) -> Self {
        let tokens = || chunks.iter().map(|chunk| chunk.token_count);
        let tier = |significance: Significance| {
            chunks
                .iter()
                .filter(|chunk| chunk.metadata.significance == significance)
                .count()
        };
        let total_tokens: usize = tokens().sum();

        Self {
            total_chunks: chunks.len(),
            total_lines: chunks.iter().map(|chunk| chunk.metadata.lines_count).sum(),
            total_tokens,
            avg_tokens_per_chunk: total_tokens.checked_div(chunks.len()).unwrap_or(0),
            min_tokens: tokens().min().unwrap_or(0),
            max_tokens: tokens().max().unwrap_or(0),
            high: tier(Significance::High),
            medium: tier(Significance::Medium),
            low: tier(Significance::Low),
        }
    }

    /// Number of chunks over a token ceiling
    pub fn count_exceeding(chunks: &[Chunk], max_tokens: usize) -> usize {
        chunks.iter().filter(|chunk| chunk.exceeds(max_tokens)).count()
    }
}

impl std::fmt::Display for ChunkingStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunks: {} | Lines: {} | Tokens: {} | Avg: {} | Range: {}-{} | Significance: {}/{}/{} (high/medium/low)",
            self.total_chunks,
            self.total_lines,
            self.total_tokens,
            self.avg_tokens_per_chunk,
            self.min_tokens,
            self.max_tokens,
            self.high,
            self.medium,
            self.low
        )
    }
}
