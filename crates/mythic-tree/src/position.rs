//! Conversion between byte offsets and line/column positions.
//!
//! Every range reported by the analyzer goes through a [`LineIndex`], so the
//! conversion must be exact: for any offset in `0..=len`,
//! `position_to_offset(offset_to_position(o)) == o`.

use serde::Serialize;

use crate::Span;

/// A zero-based line/column position. The column counts bytes from the
/// start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.character + 1)
    }
}

/// A range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Whether `pos` lies in this range, both ends inclusive.
    pub fn contains(&self, pos: Position) -> bool {
        self.start <= pos && pos <= self.end
    }
}

/// Per-line start offsets for a source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    line_starts: Vec<u32>,
    len: u32,
}

impl LineIndex {
    /// Build the index for `source`.
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i as u32 + 1);
            }
        }
        Self {
            line_starts,
            len: source.len() as u32,
        }
    }

    /// Length of the indexed source in bytes.
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of lines. An empty source has one (empty) line.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Span of a line, excluding its terminating newline.
    pub fn line_span(&self, line: u32) -> Option<Span> {
        let start = *self.line_starts.get(line as usize)?;
        let end = match self.line_starts.get(line as usize + 1) {
            Some(next) => next - 1,
            None => self.len,
        };
        Some(Span::new(start, end))
    }

    /// Convert a byte offset to a position. Offsets past the end clamp to
    /// the end of the source.
    pub fn offset_to_position(&self, offset: u32) -> Position {
        let offset = offset.min(self.len);
        let line = self.line_starts.partition_point(|&start| start <= offset) - 1;
        Position {
            line: line as u32,
            character: offset - self.line_starts[line],
        }
    }

    /// Convert a position back to a byte offset. Lines past the end clamp to
    /// the end of the source and columns past a line's end clamp to that end.
    pub fn position_to_offset(&self, pos: Position) -> u32 {
        match self.line_span(pos.line) {
            Some(span) => (span.start + pos.character).min(span.end),
            None => self.len,
        }
    }

    /// Convert a span to a range.
    pub fn range(&self, span: Span) -> Range {
        Range {
            start: self.offset_to_position(span.start),
            end: self.offset_to_position(span.end),
        }
    }

    /// Convert a range back to a span.
    pub fn span(&self, range: Range) -> Span {
        let start = self.position_to_offset(range.start);
        let end = self.position_to_offset(range.end).max(start);
        Span::new(start, end)
    }
}
