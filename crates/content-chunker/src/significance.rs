//! Post-hoc importance tiers for produced chunks.
//!
//! The score is an additive, monotonic heuristic meant for ranking and UI
//! hints. It is advisory: nothing in the chunking itself depends on it.

use crate::language::comment_prefixes_for;
use crate::patterns;
use crate::structure::LineKind;
use crate::types::Significance;

const LARGE_CHUNK_TOKENS: usize = 800;
const MEDIUM_CHUNK_TOKENS: usize = 400;
const KEYWORD_WEIGHT: f64 = 0.5;
const KEYWORD_CAP: f64 = 3.0;
const COMMENT_RATIO_THRESHOLD: f64 = 0.3;
const HIGH_SCORE: f64 = 5.0;
const MEDIUM_SCORE: f64 = 2.0;

/// Scores chunk content into a [`Significance`] tier
#[derive(Debug, Clone, Copy, Default)]
pub struct SignificanceScorer;

impl SignificanceScorer {
    /// `language` picks the comment prefixes; `None` uses the generic set
    pub fn score(&self, content: &str, token_count: usize, language: Option<&str>) -> Significance {
        Self::tier(self.raw_score(content, token_count, language))
    }

    /// Additive score before it is bucketed into a tier
    pub fn raw_score(&self, content: &str, token_count: usize, language: Option<&str>) -> f64 {
        let mut score = 0.0;

        if token_count > LARGE_CHUNK_TOKENS {
            score += 2.0;
        } else if token_count > MEDIUM_CHUNK_TOKENS {
            score += 1.0;
        }

        if patterns::has_function_definition(content) {
            score += 2.0;
        }

        if patterns::has_class_definition(content) {
            score += 3.0;
        }

        let keywords = patterns::count_keywords(content) as f64;
        score += (keywords * KEYWORD_WEIGHT).min(KEYWORD_CAP);

        if comment_ratio(content, language) > COMMENT_RATIO_THRESHOLD {
            score += 1.0;
        }

        score
    }

    fn tier(score: f64) -> Significance {
        if score >= HIGH_SCORE {
            Significance::High
        } else if score >= MEDIUM_SCORE {
            Significance::Medium
        } else {
            Significance::Low
        }
    }
}

/// Share of lines classified as [`LineKind::Comment`]
fn comment_ratio(content: &str, language: Option<&str>) -> f64 {
    let prefixes = comment_prefixes_for(language);
    let (comments, total) = content
        .lines()
        .fold((0usize, 0usize), |(comments, total), line| {
            let is_comment = LineKind::classify_with(line, &prefixes) == LineKind::Comment;
            (comments + usize::from(is_comment), total + 1)
        });

    if total == 0 {
        0.0
    } else {
        comments as f64 / total as f64
    }
}
