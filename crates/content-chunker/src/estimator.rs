//! Pluggable collaborators: token estimation and language detection.
//!
//! Both are treated as pure, total functions. Callers whose real estimator can
//! fail (remote tokenizer, missing model) wrap it and fall back before handing
//! it to the chunker.

use crate::language::Language;
use unicode_segmentation::UnicodeSegmentation;

/// Estimates how many tokens a piece of text costs downstream
pub trait TokenEstimator {
    fn estimate(&self, text: &str, language_hint: Option<&str>) -> usize;
}

impl<F> TokenEstimator for F
where
    F: Fn(&str, Option<&str>) -> usize,
{
    fn estimate(&self, text: &str, language_hint: Option<&str>) -> usize {
        self(text, language_hint)
    }
}

/// Detects the dominant language of a block of text
pub trait LanguageDetector {
    fn detect(&self, text: &str) -> Option<String>;
}

impl<F> LanguageDetector for F
where
    F: Fn(&str) -> Option<String>,
{
    fn detect(&self, text: &str) -> Option<String> {
        self(text)
    }
}

/// Character-ratio estimate: one token per `chars_per_token` graphemes, rounded up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRatioEstimator {
    pub chars_per_token: usize,
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self { chars_per_token: 4 }
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str, _language_hint: Option<&str>) -> usize {
        let graphemes = text.graphemes(true).count();
        graphemes.div_ceil(self.chars_per_token.max(1))
    }
}

/// Content-based detection over fence tags, file headers and line signatures
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicLanguageDetector;

impl LanguageDetector for HeuristicLanguageDetector {
    fn detect(&self, text: &str) -> Option<String> {
        match Language::detect(text) {
            Language::Unknown => None,
            language => Some(language.as_str().to_string()),
        }
    }
}
