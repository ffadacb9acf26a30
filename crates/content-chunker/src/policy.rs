use crate::config::{ChunkingConfig, Limits};
use crate::error::Result;
use crate::structure::{ContentStructureProfile, LineKind};

/// Outcome of evaluating one line position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// Keep accumulating
    Continue,
    /// `max_tokens` reached; break regardless of the soft floor
    Ceiling,
    /// Blank line, header ahead, or end of a block comment
    Natural,
    /// The current line opens a definition
    Structural,
}

impl BreakDecision {
    #[must_use]
    pub const fn should_break(self) -> bool {
        !matches!(self, Self::Continue)
    }

    /// Break that ignores `min_chunk_size`
    #[must_use]
    pub const fn is_forced(self) -> bool {
        matches!(self, Self::Ceiling)
    }
}

/// Decides whether the chunk may end right before a given line.
///
/// The decision at `line_index` uses the accumulated token count *as if* that
/// line were already appended. Rules apply in order:
///
/// 1. accumulated >= `max_tokens` → [`BreakDecision::Ceiling`]
/// 2. accumulated < `min_chunk_size` → continue
/// 3. inside an open fenced block with `preserve_code_blocks` → continue
/// 4. natural boundary and accumulated >= 0.7 × `min_chunk_size` → [`BreakDecision::Natural`]
/// 5. definition opener and accumulated >= 0.8 × `min_chunk_size` → [`BreakDecision::Structural`]
/// 6. otherwise continue
#[derive(Debug, Clone, Copy)]
pub struct BreakPolicy<'a> {
    profile: &'a ContentStructureProfile,
    limits: Limits,
}

impl<'a> BreakPolicy<'a> {
    /// Build a policy, validating `config` first
    pub fn new(config: &ChunkingConfig, profile: &'a ContentStructureProfile) -> Result<Self> {
        Ok(Self::with_limits(config.limits()?, profile))
    }

    pub(crate) const fn with_limits(limits: Limits, profile: &'a ContentStructureProfile) -> Self {
        Self { profile, limits }
    }

    pub fn should_break(&self, line_index: usize, accumulated_tokens: usize) -> bool {
        self.decide(line_index, accumulated_tokens).should_break()
    }

    pub fn decide(&self, line_index: usize, accumulated_tokens: usize) -> BreakDecision {
        let min = self.limits.min_chunk_size;

        if accumulated_tokens >= self.limits.max_tokens {
            return BreakDecision::Ceiling;
        }

        if accumulated_tokens < min {
            return BreakDecision::Continue;
        }

        if self.limits.preserve_code_blocks && self.inside_fence(line_index) {
            return BreakDecision::Continue;
        }

        if self.is_natural_boundary(line_index) {
            return if reaches_fraction(accumulated_tokens, min, 7) {
                BreakDecision::Natural
            } else {
                BreakDecision::Continue
            };
        }

        if self.opens_definition(line_index) {
            return if reaches_fraction(accumulated_tokens, min, 8) {
                BreakDecision::Structural
            } else {
                BreakDecision::Continue
            };
        }

        BreakDecision::Continue
    }

    fn inside_fence(&self, line_index: usize) -> bool {
        self.profile
            .line(line_index)
            .is_some_and(|info| info.inside_fence)
    }

    fn is_natural_boundary(&self, line_index: usize) -> bool {
        let current = self.profile.line(line_index);
        let next = self.profile.kind(line_index + 1);

        if next == Some(LineKind::Header) {
            return true;
        }

        let Some(current) = current else {
            return false;
        };

        if self.profile.is_natural_break_point(line_index)
            && current.kind == LineKind::Blank
            && next.is_some_and(|kind| kind != LineKind::Blank)
        {
            return true;
        }

        current.closes_block_comment && next != Some(LineKind::Comment)
    }

    fn opens_definition(&self, line_index: usize) -> bool {
        self.profile.is_natural_break_point(line_index)
            && self
                .profile
                .kind(line_index)
                .is_some_and(LineKind::opens_definition)
    }
}

/// `tokens >= tenths / 10 × floor`, in integer arithmetic
fn reaches_fraction(tokens: usize, floor: usize, tenths: usize) -> bool {
    tokens.saturating_mul(10) >= floor.saturating_mul(tenths)
}
