use crate::patterns;
use std::path::Path;

/// Number of leading lines inspected by content-based detection
const DETECTION_WINDOW_LINES: usize = 400;

/// Minimum signature hits before content scoring names a language
const MIN_SIGNATURE_SCORE: usize = 2;

/// Language recognised by content or file-name heuristics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Language {
    Rust,
    Python,
    JavaScript,
    TypeScript,
    Go,
    Java,
    C,
    Cpp,
    CSharp,
    Ruby,
    Markdown,
    Unknown,
}

impl Language {
    /// Detect language from file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "rs" => Language::Rust,
            "py" | "pyw" => Language::Python,
            "js" | "mjs" | "cjs" | "jsx" => Language::JavaScript,
            "ts" | "tsx" | "mts" => Language::TypeScript,
            "go" => Language::Go,
            "java" => Language::Java,
            "c" | "h" => Language::C,
            "cpp" | "cc" | "cxx" | "hpp" | "hh" | "hxx" => Language::Cpp,
            "cs" => Language::CSharp,
            "rb" => Language::Ruby,
            "md" | "markdown" => Language::Markdown,
            _ => Language::Unknown,
        }
    }

    /// Detect language from file path
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Unknown)
    }

    /// Parse a fence info string or language name (`rust`, `ts`, `py`, ...)
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_lowercase().as_str() {
            "rust" => Language::Rust,
            "python" => Language::Python,
            "javascript" | "node" => Language::JavaScript,
            "typescript" => Language::TypeScript,
            "golang" => Language::Go,
            "c++" => Language::Cpp,
            "c#" | "csharp" => Language::CSharp,
            "ruby" => Language::Ruby,
            other => Self::from_extension(other),
        }
    }

    /// Get language name as string
    pub fn as_str(self) -> &'static str {
        match self {
            Language::Rust => "rust",
            Language::Python => "python",
            Language::JavaScript => "javascript",
            Language::TypeScript => "typescript",
            Language::Go => "go",
            Language::Java => "java",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::CSharp => "csharp",
            Language::Ruby => "ruby",
            Language::Markdown => "markdown",
            Language::Unknown => "unknown",
        }
    }

    /// Get typical comment prefixes for this language
    pub fn comment_prefixes(self) -> Vec<&'static str> {
        match self {
            Language::Rust
            | Language::JavaScript
            | Language::TypeScript
            | Language::Go
            | Language::Java
            | Language::C
            | Language::Cpp
            | Language::CSharp => vec!["//", "/*", "*"],
            Language::Python | Language::Ruby => vec!["#", "\"\"\"", "'''"],
            Language::Markdown => vec!["<!--"],
            Language::Unknown => patterns::COMMENT_PREFIXES.to_vec(),
        }
    }

    /// Line prefixes that identify this language when seen repeatedly
    fn signature_prefixes(self) -> &'static [&'static str] {
        match self {
            Language::Rust => &[
                "fn ", "pub fn ", "pub(crate) fn ", "impl ", "impl<", "use ", "let mut ", "mod ",
                "#[derive", "pub struct ",
            ],
            Language::Python => &["def ", "from ", "elif ", "class ", "async def ", "@"],
            Language::Go => &["func ", "package ", "import (", "type ", "defer "],
            Language::TypeScript => &[
                "interface ",
                "export interface ",
                "export type ",
                "type ",
                "enum ",
                "private ",
                "readonly ",
            ],
            Language::JavaScript => &[
                "function ",
                "const ",
                "let ",
                "export default ",
                "module.exports",
                "import ",
            ],
            Language::Java => &[
                "public class ",
                "public static ",
                "private final ",
                "@Override",
                "package ",
            ],
            _ => &[],
        }
    }

    /// Fragments that identify this language anywhere in a line
    fn signature_fragments(self) -> &'static [&'static str] {
        match self {
            Language::Rust => &["::", " -> ", "&self", "&mut "],
            Language::Python => &["self.", "):", "None", "elif "],
            Language::Go => &[" := ", "err != nil", "fmt."],
            Language::TypeScript => &[": string", ": number", ": boolean", "as const"],
            Language::JavaScript => &[" => ", "require(", "===", "console."],
            Language::Java => &["System.out", "new ", "throws "],
            _ => &[],
        }
    }

    /// Detect the dominant language of a block of concatenated text.
    ///
    /// Explicit hints win: fenced block info strings and `--- File: <path> ---`
    /// headers vote first. Without hints, per-language line signatures are
    /// scored over a bounded prefix of the text.
    pub fn detect(text: &str) -> Self {
        let mut votes: Vec<(Language, usize)> = Vec::new();
        let mut headers = 0usize;
        let mut in_fence = false;

        for line in text.lines().take(DETECTION_WINDOW_LINES) {
            let trimmed = line.trim();
            if patterns::is_fence_marker(line) {
                if !in_fence {
                    let info = trimmed.trim_start_matches(['`', '~']);
                    let info = info.split_whitespace().next().unwrap_or("");
                    add_vote(&mut votes, Language::from_name(info));
                }
                in_fence = !in_fence;
                continue;
            }
            if let Some(path) = file_header_path(trimmed) {
                add_vote(&mut votes, Language::from_path(path));
                continue;
            }
            if !in_fence && patterns::is_markdown_header(line) {
                headers += 1;
            }
        }

        if let Some(language) = best_vote(&votes) {
            return language;
        }

        let candidates = [
            Language::Rust,
            Language::TypeScript,
            Language::JavaScript,
            Language::Python,
            Language::Go,
            Language::Java,
        ];

        let mut best: Option<(Language, usize)> = None;
        for language in candidates {
            let score = signature_score(language, text);
            if score >= MIN_SIGNATURE_SCORE && best.map_or(true, |(_, top)| score > top) {
                best = Some((language, score));
            }
        }

        match best {
            Some((language, score)) if score >= headers => language,
            _ if headers > 0 => Language::Markdown,
            _ => Language::Unknown,
        }
    }
}

/// Comment prefixes for a detected language name, falling back to the
/// language-agnostic set when the name is unknown or absent
pub(crate) fn comment_prefixes_for(language: Option<&str>) -> Vec<&'static str> {
    Language::from_name(language.unwrap_or_default()).comment_prefixes()
}

/// `--- File: src/lib.rs ---` header emitted by the upstream concatenation step.
pub(crate) fn file_header_path(line: &str) -> Option<&str> {
    line.trim()
        .strip_prefix("--- File: ")
        .and_then(|rest| rest.strip_suffix(" ---"))
        .map(str::trim)
        .filter(|path| !path.is_empty())
}

fn add_vote(votes: &mut Vec<(Language, usize)>, language: Language) {
    if language == Language::Unknown {
        return;
    }
    match votes.iter_mut().find(|(lang, _)| *lang == language) {
        Some((_, count)) => *count += 1,
        None => votes.push((language, 1)),
    }
}

fn best_vote(votes: &[(Language, usize)]) -> Option<Language> {
    votes
        .iter()
        .max_by(|a, b| a.1.cmp(&b.1).then_with(|| b.0.cmp(&a.0)))
        .map(|(language, _)| *language)
}

fn signature_score(language: Language, text: &str) -> usize {
    let prefixes = language.signature_prefixes();
    let fragments = language.signature_fragments();

    text.lines()
        .take(DETECTION_WINDOW_LINES)
        .map(|line| {
            let trimmed = line.trim_start();
            let prefix_hit = prefixes.iter().any(|p| trimmed.starts_with(p));
            let fragment_hit = fragments.iter().any(|f| line.contains(f));
            usize::from(prefix_hit) + usize::from(fragment_hit)
        })
        .sum()
}
