use crate::estimator::LanguageDetector;
use crate::language::{comment_prefixes_for, file_header_path};
use crate::patterns;

/// Classification of one raw input line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineKind {
    Blank,
    Comment,
    Header,
    FunctionBoundary,
    ClassBoundary,
    Code,
    Other,
}

impl LineKind {
    /// Classify a single line (line terminator optional) with the
    /// language-agnostic comment prefixes
    pub fn classify(line: &str) -> Self {
        Self::classify_with(line, patterns::COMMENT_PREFIXES)
    }

    /// Classify a single line, treating `comment_prefixes` as comment openers
    pub fn classify_with(line: &str, comment_prefixes: &[&str]) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Self::Blank;
        }
        if patterns::is_fence_marker(line) {
            return Self::Code;
        }
        if patterns::is_markdown_header(line) {
            return Self::Header;
        }
        if file_header_path(line).is_some() {
            return Self::Other;
        }
        if patterns::has_comment_prefix(line, comment_prefixes) {
            return Self::Comment;
        }
        if patterns::is_class_signature(line) {
            return Self::ClassBoundary;
        }
        if patterns::is_function_signature(line) {
            return Self::FunctionBoundary;
        }
        if looks_like_code(trimmed) {
            return Self::Code;
        }
        Self::Other
    }

    /// Candidate place for a low-cost split
    #[must_use]
    pub const fn is_break_candidate(self) -> bool {
        matches!(
            self,
            Self::Blank
                | Self::Comment
                | Self::Header
                | Self::FunctionBoundary
                | Self::ClassBoundary
        )
    }

    /// Opens a function, class, interface, type or arrow-bound definition
    #[must_use]
    pub const fn opens_definition(self) -> bool {
        matches!(self, Self::FunctionBoundary | Self::ClassBoundary)
    }
}

fn looks_like_code(trimmed: &str) -> bool {
    const CLOSERS: [char; 7] = [';', '{', '}', '(', ')', '[', ']'];
    trimmed.ends_with(CLOSERS)
        || trimmed.starts_with(['}', ')', ']'])
        || trimmed.contains(" = ")
        || trimmed.contains("=>")
}

/// Per-line facts computed once by the analyzer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInfo {
    pub kind: LineKind,
    /// Line is a fence marker (```` ``` ```` or `~~~`)
    pub fence: bool,
    /// An odd number of fence markers precede this line
    pub inside_fence: bool,
    pub closes_block_comment: bool,
}

/// Structural summary of the whole input, consumed by the break policy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentStructureProfile {
    pub language: Option<String>,
    pub has_code_blocks: bool,
    pub has_markdown_headers: bool,
    pub has_function_definitions: bool,
    pub has_class_definitions: bool,
    /// Sorted 0-based indices of blank, comment and definition lines.
    ///
    /// Advisory: the break policy checks membership for blank and definition
    /// breaks but re-derives header and comment-close context itself.
    pub natural_break_points: Vec<usize>,
    lines: Vec<LineInfo>,
}

impl ContentStructureProfile {
    #[must_use]
    pub fn line(&self, index: usize) -> Option<&LineInfo> {
        self.lines.get(index)
    }

    #[must_use]
    pub fn kind(&self, index: usize) -> Option<LineKind> {
        self.lines.get(index).map(|info| info.kind)
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_natural_break_point(&self, index: usize) -> bool {
        self.natural_break_points.binary_search(&index).is_ok()
    }
}

/// Scans the full input once and builds its [`ContentStructureProfile`]
#[derive(Debug, Clone, Copy)]
pub struct StructureAnalyzer {
    detect_markdown_headers: bool,
}

impl Default for StructureAnalyzer {
    fn default() -> Self {
        Self {
            detect_markdown_headers: true,
        }
    }
}

impl StructureAnalyzer {
    /// `detect_markdown_headers` mirrors `preserve_markdown_structure`
    pub fn new(detect_markdown_headers: bool) -> Self {
        Self {
            detect_markdown_headers,
        }
    }

    pub fn analyze(&self, text: &str, detector: &dyn LanguageDetector) -> ContentStructureProfile {
        let mut lines = Vec::new();
        let mut natural_break_points = Vec::new();
        let mut open_fence = false;
        let language = detector.detect(text);
        let comment_prefixes = comment_prefixes_for(language.as_deref());

        for (index, raw) in text.split_inclusive('\n').enumerate() {
            let kind = LineKind::classify_with(raw, &comment_prefixes);
            let fence = patterns::is_fence_marker(raw);
            lines.push(LineInfo {
                kind,
                fence,
                inside_fence: open_fence,
                closes_block_comment: patterns::closes_block_comment(
                    raw.trim_end_matches(['\n', '\r']),
                ),
            });
            if fence {
                open_fence = !open_fence;
            }
            if kind.is_break_candidate() {
                natural_break_points.push(index);
            }
        }

        ContentStructureProfile {
            language,
            has_code_blocks: patterns::has_fenced_block(text),
            has_markdown_headers: self.detect_markdown_headers
                && patterns::has_markdown_header(text),
            has_function_definitions: patterns::has_function_definition(text),
            has_class_definitions: patterns::has_class_definition(text),
            natural_break_points,
            lines,
        }
    }
}
