//! Attribution of chunk line ranges back to the files they came from.
//!
//! The chunker has no idea how its input was assembled, so attribution needs
//! a line→file map from the caller. Without one, chunks carry no segments.

use crate::language::file_header_path;
use crate::types::FileSegment;

/// Supplies the files that cover a line range of the original input
pub trait FileSegmentSource {
    /// Segments overlapping `start_line..=end_line` (1-indexed)
    fn segments_for(&self, start_line: usize, end_line: usize) -> Vec<FileSegment>;
}

/// Source that attributes nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFileSegments;

impl FileSegmentSource for NoFileSegments {
    fn segments_for(&self, _start_line: usize, _end_line: usize) -> Vec<FileSegment> {
        Vec::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FileRange {
    path: String,
    start_line: usize,
    end_line: usize,
}

/// Line→file map over the concatenated input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileIndex {
    ranges: Vec<FileRange>,
}

impl FileIndex {
    /// Build from explicit `(path, start_line, end_line)` ranges (1-indexed, inclusive)
    pub fn from_ranges<I, P>(ranges: I) -> Self
    where
        I: IntoIterator<Item = (P, usize, usize)>,
        P: Into<String>,
    {
        let mut ranges: Vec<FileRange> = ranges
            .into_iter()
            .filter(|(_, start, end)| *start >= 1 && start <= end)
            .map(|(path, start_line, end_line)| FileRange {
                path: path.into(),
                start_line,
                end_line,
            })
            .collect();
        ranges.sort_by(|a, b| a.start_line.cmp(&b.start_line).then(a.end_line.cmp(&b.end_line)));
        Self { ranges }
    }

    /// Build from `--- File: <path> ---` headers in the concatenated input.
    ///
    /// Each file owns its header line and everything up to the next header.
    /// Lines before the first header are unattributed.
    pub fn from_file_headers(content: &str) -> Self {
        let mut ranges: Vec<FileRange> = Vec::new();
        let mut total = 0;

        for (idx, line) in content.lines().enumerate() {
            let line_no = idx + 1;
            total = line_no;
            if let Some(path) = file_header_path(line) {
                if let Some(prev) = ranges.last_mut() {
                    prev.end_line = line_no - 1;
                }
                ranges.push(FileRange {
                    path: path.to_string(),
                    start_line: line_no,
                    end_line: line_no,
                });
            }
        }

        if let Some(last) = ranges.last_mut() {
            last.end_line = total;
        }

        Self { ranges }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// File that owns a given line, if any
    #[must_use]
    pub fn file_at(&self, line: usize) -> Option<&str> {
        self.ranges
            .iter()
            .find(|range| range.start_line <= line && line <= range.end_line)
            .map(|range| range.path.as_str())
    }
}

impl FileSegmentSource for FileIndex {
    fn segments_for(&self, start_line: usize, end_line: usize) -> Vec<FileSegment> {
        if end_line < start_line {
            return Vec::new();
        }
        let chunk_lines = (end_line - start_line + 1) as f64;

        self.ranges
            .iter()
            .filter_map(|range| {
                let start = start_line.max(range.start_line);
                let end = end_line.min(range.end_line);
                (start <= end).then(|| FileSegment {
                    file_path: range.path.clone(),
                    start_line: start,
                    end_line: end,
                    percentage: (end - start + 1) as f64 * 100.0 / chunk_lines,
                })
            })
            .collect()
    }
}
