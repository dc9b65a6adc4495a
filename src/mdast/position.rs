//! Byte offset to line/column mapping.

use serde::Serialize;

/// A place in the source: 1-based line and column, 0-based byte offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct Point {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

/// Source span of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub start: Point,
    pub end: Point,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.start.line, self.start.column)
    }
}

/// Line start offsets of a source text.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    source: &'a str,
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self {
            source,
            line_starts,
        }
    }

    /// Point for a byte offset. Columns count characters, not bytes.
    pub fn point(&self, offset: usize) -> Point {
        let offset = offset.min(self.source.len());
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        let line_start = self.line_starts[line];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset - line_start, |s| s.chars().count());

        Point {
            line: line + 1,
            column: column + 1,
            offset,
        }
    }

    pub fn position(&self, range: std::ops::Range<usize>) -> Position {
        Position {
            start: self.point(range.start),
            end: self.point(range.end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points() {
        let index = LineIndex::new("ab\ncd\n\nü x");
        assert_eq!(index.point(0), Point { line: 1, column: 1, offset: 0 });
        assert_eq!(index.point(2), Point { line: 1, column: 3, offset: 2 });
        assert_eq!(index.point(3), Point { line: 2, column: 1, offset: 3 });
        assert_eq!(index.point(6), Point { line: 3, column: 1, offset: 6 });
        // `ü` is two bytes but one column
        assert_eq!(index.point(10).column, 3);
    }

    #[test]
    fn test_offset_past_end_is_clamped() {
        let index = LineIndex::new("abc");
        assert_eq!(index.point(99).offset, 3);
        assert_eq!(index.point(99).column, 4);
    }
}
