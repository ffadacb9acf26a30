use crate::config::{ChunkingStrategy, Limits};
use crate::estimator::TokenEstimator;
use crate::policy::BreakPolicy;
use crate::structure::ContentStructureProfile;
use crate::types::{Chunk, ChunkMetadata};

/// One input line with its terminator and byte offset
#[derive(Debug, Clone, Copy)]
struct Line<'t> {
    text: &'t str,
    offset: usize,
    tokens: usize,
}

impl Line<'_> {
    fn end(&self) -> usize {
        self.offset + self.text.len()
    }

    fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Lines accumulated for the chunk under construction.
///
/// `from..` is what the chunk physically contains (overlap included);
/// `start..` is the range it reports as its own.
#[derive(Debug, Clone, Copy, Default)]
struct Buffer {
    from: usize,
    start: usize,
    tokens: usize,
}

/// Execute a chunking strategy over a profiled input
pub struct StrategyExecutor<'a> {
    strategy: ChunkingStrategy,
    limits: Limits,
    profile: &'a ContentStructureProfile,
    estimator: &'a dyn TokenEstimator,
}

impl<'a> StrategyExecutor<'a> {
    pub(crate) fn new(
        strategy: ChunkingStrategy,
        limits: Limits,
        profile: &'a ContentStructureProfile,
        estimator: &'a dyn TokenEstimator,
    ) -> Self {
        Self {
            strategy,
            limits,
            profile,
            estimator,
        }
    }

    /// Execute the configured strategy.
    ///
    /// Chunks come back ordered, with `chunk_index` set; `total_chunks` and
    /// significance are filled in by the caller.
    pub(crate) fn execute(&self, content: &str) -> Vec<Chunk> {
        if content.trim().is_empty() {
            return Vec::new();
        }

        let lines = self.split_lines(content);
        match self.strategy {
            ChunkingStrategy::Aggressive => self.chunk_by_size(content, &lines),
            // Natural has no algorithm of its own yet and runs balanced unchanged.
            ChunkingStrategy::Balanced | ChunkingStrategy::Natural => {
                self.chunk_balanced(content, &lines)
            }
        }
    }

    fn split_lines<'t>(&self, content: &'t str) -> Vec<Line<'t>> {
        let language = self.profile.language.as_deref();
        let mut offset = 0;
        content
            .split_inclusive('\n')
            .map(|text| {
                let line = Line {
                    text,
                    offset,
                    tokens: self.estimator.estimate(text, language),
                };
                offset += text.len();
                line
            })
            .collect()
    }

    /// Token-driven chunking that prefers structural boundaries
    fn chunk_balanced(&self, content: &str, lines: &[Line<'_>]) -> Vec<Chunk> {
        let policy = BreakPolicy::with_limits(self.limits, self.profile);
        let mut chunks = Vec::new();
        let mut buffer = Buffer::default();

        for (idx, line) in lines.iter().enumerate() {
            let accumulated = buffer.tokens.saturating_add(line.tokens);
            let decision = policy.decide(idx, accumulated);

            // The ceiling only needs something to close; soft breaks also need
            // real text and the soft floor.
            let can_close = idx > buffer.start
                && (decision.is_forced()
                    || (has_text(&lines[buffer.from..idx])
                        && buffer.tokens >= self.limits.min_chunk_size));

            if decision.should_break() && can_close {
                log::trace!("break before line {} ({decision:?}, {accumulated} tokens)", idx + 1);
                chunks.push(self.build_chunk(content, lines, buffer, idx, chunks.len()));
                buffer = self.seed(lines, idx);
            }

            buffer.tokens = buffer.tokens.saturating_add(line.tokens);
        }

        self.flush(content, lines, buffer, &mut chunks);
        chunks
    }

    /// Size-only chunking: close right before the ceiling would be crossed
    fn chunk_by_size(&self, content: &str, lines: &[Line<'_>]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut buffer = Buffer::default();

        for (idx, line) in lines.iter().enumerate() {
            let accumulated = buffer.tokens.saturating_add(line.tokens);

            if accumulated > self.limits.max_tokens && idx > buffer.start {
                chunks.push(self.build_chunk(content, lines, buffer, idx, chunks.len()));
                buffer = self.seed(lines, idx);
            }

            buffer.tokens = buffer.tokens.saturating_add(line.tokens);
        }

        self.flush(content, lines, buffer, &mut chunks);
        chunks
    }

    /// Start a new buffer at `break_at`, repeating the `overlap_lines` lines
    /// that precede it (fewer only at the start of the input).
    fn seed(&self, lines: &[Line<'_>], break_at: usize) -> Buffer {
        let from = break_at.saturating_sub(self.limits.overlap_lines);
        Buffer {
            from,
            start: break_at,
            tokens: lines[from..break_at].iter().map(|line| line.tokens).sum(),
        }
    }

    fn flush(&self, content: &str, lines: &[Line<'_>], buffer: Buffer, chunks: &mut Vec<Chunk>) {
        let end = lines.len();
        if buffer.start >= end {
            return;
        }

        if has_text(&lines[buffer.start..end]) {
            chunks.push(self.build_chunk(content, lines, buffer, end, chunks.len()));
            return;
        }

        let Some(last) = chunks.last_mut() else {
            return;
        };

        // A whitespace-only tail joins the previous chunk when it fits, so the
        // chunks still cover the whole input.
        let tail = &content[lines[buffer.start].offset..];
        let merged = format!("{}{tail}", last.content);
        let merged_tokens = self
            .estimator
            .estimate(&merged, self.profile.language.as_deref());

        if merged_tokens <= self.limits.max_tokens {
            last.content = merged;
            last.token_count = merged_tokens;
            last.end_line = end;
            last.end_char = content.len();
            last.metadata.lines_count = last.end_line - last.start_line + 1;
        } else {
            chunks.push(self.build_chunk(content, lines, buffer, end, chunks.len()));
        }
    }

    /// Materialise lines `buffer.from..end` as a chunk reporting `buffer.start..end`
    fn build_chunk(
        &self,
        content: &str,
        lines: &[Line<'_>],
        buffer: Buffer,
        end: usize,
        chunk_index: usize,
    ) -> Chunk {
        let physical_start = lines[buffer.from].offset;
        let start_char = lines[buffer.start].offset;
        let end_char = lines[end - 1].end();
        let text = content[physical_start..end_char].to_string();
        let language = self.profile.language.clone();
        let token_count = self.estimator.estimate(&text, language.as_deref());

        Chunk {
            id: uuid::Uuid::new_v4().to_string(),
            content: text,
            token_count,
            start_line: buffer.start + 1,
            end_line: end,
            start_char,
            end_char,
            metadata: ChunkMetadata {
                chunk_index,
                lines_count: end - buffer.start,
                language,
                ..Default::default()
            },
        }
    }
}

fn has_text(lines: &[Line<'_>]) -> bool {
    lines.iter().any(|line| !line.is_blank())
}
