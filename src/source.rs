//! Line and offset addressing over a source buffer.
//!
//! Lines are split on `\n`; a trailing `\r` belongs to the terminator, not
//! to the line, so CRLF documents keep their line endings untouched when a
//! line's span is replaced.

use crate::error::{Error, Result};

/// Zero-based line and character column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// A `start..end` pair of positions, as handed over by an editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub start: Position,
    pub end: Position,
}

impl Selection {
    pub fn new(start: Position, end: Position) -> Self {
        if end < start {
            Self { start: end, end: start }
        } else {
            Self { start, end }
        }
    }

    /// Whole lines `first..=last`, ending at the start of the line after `last`.
    pub fn lines(first: usize, last: usize) -> Self {
        Self::new(Position::new(first, 0), Position::new(last + 1, 0))
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// One row of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    pub index: usize,
    /// Byte offset of the first character.
    pub start: usize,
    /// Text without its line terminator.
    pub raw: &'a str,
}

impl<'a> Line<'a> {
    pub fn end(&self) -> usize {
        self.start + self.raw.len()
    }

    pub fn trimmed(&self) -> &'a str {
        self.raw.trim()
    }

    pub fn is_blank(&self) -> bool {
        self.raw.trim().is_empty()
    }

    /// Leading whitespace of the line.
    pub fn indentation(&self) -> &'a str {
        let content = self.raw.trim_start();
        &self.raw[..self.raw.len() - content.len()]
    }
}

/// Source text addressable by line and by absolute byte offset.
#[derive(Debug)]
pub struct SourceText<'a> {
    text: &'a str,
    lines: Vec<Line<'a>>,
}

impl<'a> SourceText<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut lines = Vec::new();
        let mut start = 0;
        for (index, chunk) in text.split('\n').enumerate() {
            let raw = chunk.strip_suffix('\r').unwrap_or(chunk);
            lines.push(Line { index, start, raw });
            start += chunk.len() + 1;
        }
        Self { text, lines }
    }

    pub fn lines(&self) -> &[Line<'a>] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// The line containing byte `offset`.
    pub fn line_at(&self, offset: usize) -> &Line<'a> {
        let idx = match self.lines.binary_search_by(|l| l.start.cmp(&offset)) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        &self.lines[idx]
    }

    /// Convert a position to a byte offset. The column may sit at the end of
    /// the line; a line index one past the last line is the end of the text.
    pub fn offset(&self, pos: Position) -> Result<usize> {
        let out_of_range = Error::PositionOutOfRange {
            line: pos.line,
            character: pos.character,
        };
        let Some(line) = self.lines.get(pos.line) else {
            if pos.line == self.lines.len() && pos.character == 0 {
                return Ok(self.text.len());
            }
            return Err(out_of_range);
        };
        if pos.character == 0 {
            return Ok(line.start);
        }
        let mut chars = line.raw.char_indices().skip(pos.character);
        match chars.next() {
            Some((byte, _)) => Ok(line.start + byte),
            None if line.raw.chars().count() == pos.character => Ok(line.end()),
            None => Err(out_of_range),
        }
    }

    pub fn position(&self, offset: usize) -> Position {
        let offset = offset.min(self.text.len());
        let line = self.line_at(offset);
        let within = offset.saturating_sub(line.start).min(line.raw.len());
        let character = line.raw[..within].chars().count();
        Position::new(line.index, character)
    }
}
