//! Line-level heuristics shared by the structure analyzer and the scorer.
//!
//! Nothing here parses a language. Every check is a regex or prefix test over
//! one raw line (or over a whole block of text for the `has_*` variants).

use once_cell::sync::Lazy;
use regex::Regex;

/// Prefixes that mark a line as a comment in the languages we see most often.
pub(crate) const COMMENT_PREFIXES: &[&str] = &["//", "/*", "*", "#", "<!--", "--", "\"\"\""];

const CONTROL_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "with", "return", "match", "else", "elif", "do",
    "new", "typeof", "await", "sizeof",
];

static HEADER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#{1,6}\s+\S").expect("valid header regex"));

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:```|~~~)").expect("valid fence regex"));

static FENCED_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)(?:^|\n)\s*```[^\n]*\n.*?\n\s*```").expect("valid fenced block regex")
});

static FUNCTION_KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:pub(?:\([^)]*\))?\s+)?(?:(?:async|static|unsafe|const|extern)\s+)*(?:function\*?|def|fn|func)(?:\s+|\s*\([^)]*\)\s*)[A-Za-z_$][\w$]*",
    )
    .expect("valid function keyword regex")
});

static ARROW_FUNCTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:const|let|var)\s+[A-Za-z_$][\w$]*\s*(?::[^=]+)?=\s*(?:async\s+)?(?:\([^)]*\)|[A-Za-z_$][\w$]*)\s*(?::[^=]+)?=>",
    )
    .expect("valid arrow function regex")
});

static METHOD_SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:(?:public|private|protected|static|async|override|readonly|final|abstract|synchronized)\s+)*(?:[A-Za-z_$][\w$<>\[\],.]*\s+)?([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*(?::\s*[^{]+)?\{\s*$",
    )
    .expect("valid method signature regex")
});

static CLASS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^\s*(?:export\s+)?(?:default\s+)?(?:declare\s+)?(?:abstract\s+)?(?:pub(?:\([^)]*\))?\s+)?(?:class|interface|struct|trait|enum|type)\s+[A-Za-z_$][\w$]*",
    )
    .expect("valid class regex")
});

static KEYWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:export|import|class|function|const|let|var|interface|type|enum|namespace|module)\b",
    )
    .expect("valid keyword regex")
});

/// `#`..`######` followed by whitespace and text.
pub(crate) fn is_markdown_header(line: &str) -> bool {
    HEADER_RE.is_match(line)
}

/// Opening or closing marker of a fenced code block.
pub(crate) fn is_fence_marker(line: &str) -> bool {
    FENCE_RE.is_match(line)
}

/// True if the text holds at least one complete opener/closer fence pair.
pub(crate) fn has_fenced_block(text: &str) -> bool {
    FENCED_BLOCK_RE.is_match(text)
}

/// Line starts with one of `prefixes`.
///
/// Bare `*` and `--` also open markdown bullets, emphasis and rules, so they
/// only count when followed by whitespace (or `/` for `*/`) or nothing.
pub(crate) fn has_comment_prefix(line: &str, prefixes: &[&str]) -> bool {
    let trimmed = line.trim_start();
    prefixes.iter().any(|prefix| {
        trimmed.strip_prefix(prefix).is_some_and(|rest| match *prefix {
            "*" => rest.is_empty() || rest.starts_with(char::is_whitespace) || rest.starts_with('/'),
            "--" => rest.is_empty() || rest.starts_with(char::is_whitespace),
            _ => true,
        })
    })
}

/// Last line of a `/* ... */` or `<!-- ... -->` block.
pub(crate) fn closes_block_comment(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.ends_with("*/") || trimmed.ends_with("-->")
}

/// Keyword + identifier, arrow-style binding, or parameter list + brace.
pub(crate) fn is_function_signature(line: &str) -> bool {
    if FUNCTION_KEYWORD_RE.is_match(line) || ARROW_FUNCTION_RE.is_match(line) {
        return true;
    }

    METHOD_SIGNATURE_RE
        .captures(line)
        .and_then(|caps| caps.get(1))
        .is_some_and(|name| !CONTROL_KEYWORDS.contains(&name.as_str()))
}

/// class / interface / struct / trait / enum / type alias opener.
pub(crate) fn is_class_signature(line: &str) -> bool {
    CLASS_RE.is_match(line)
}

pub(crate) fn has_function_definition(text: &str) -> bool {
    text.lines().any(is_function_signature)
}

pub(crate) fn has_class_definition(text: &str) -> bool {
    text.lines().any(is_class_signature)
}

pub(crate) fn has_markdown_header(text: &str) -> bool {
    text.lines().any(is_markdown_header)
}

/// Word-boundary matches of declaration keywords across the whole text.
pub(crate) fn count_keywords(text: &str) -> usize {
    KEYWORD_RE.find_iter(text).count()
}
