//! Library error type.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("edit {start}..{end} is out of bounds for a document of {len} bytes")]
    OutOfBounds { start: usize, end: usize, len: usize },

    #[error("edit {start}..{end} does not fall on a character boundary")]
    NotCharBoundary { start: usize, end: usize },

    #[error("edit {start}..{end} is inverted")]
    InvertedRange { start: usize, end: usize },

    #[error("edits overlap at byte {0}")]
    Overlapping(usize),

    #[error("position {line}:{character} lies outside the document")]
    PositionOutOfRange { line: usize, character: usize },

    #[error("invalid modifier pattern: {0}")]
    Pattern(String),
}

impl From<regex::Error> for Error {
    fn from(e: regex::Error) -> Self {
        Error::Pattern(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
