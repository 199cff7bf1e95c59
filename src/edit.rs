//! Text edits and their transactional application.
//!
//! Edits are expressed as byte ranges over the *original* document. A batch
//! is validated as a whole before anything is written, so a document is
//! either fully transformed or left as it was.

use crate::error::{Error, Result};

/// Replacement of `start..end` with `new_text`. A zero-width range inserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    pub start: usize,
    pub end: usize,
    pub new_text: String,
}

impl TextEdit {
    pub fn replace(start: usize, end: usize, new_text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            new_text: new_text.into(),
        }
    }

    pub fn insert(at: usize, new_text: impl Into<String>) -> Self {
        Self::replace(at, at, new_text)
    }

    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}

/// Apply a batch of edits to `source`, returning the new text.
///
/// Edits are ordered by start (insertions before a replacement at the same
/// offset) and must not overlap.
pub fn apply_edits(source: &str, edits: &[TextEdit]) -> Result<String> {
    let mut ordered: Vec<&TextEdit> = edits.iter().collect();
    ordered.sort_by_key(|e| (e.start, e.end));

    let mut cursor = 0;
    for edit in &ordered {
        validate(source, edit)?;
        if edit.start < cursor {
            return Err(Error::Overlapping(edit.start));
        }
        cursor = edit.end;
    }

    let mut out = String::with_capacity(source.len());
    let mut cursor = 0;
    for edit in ordered {
        out.push_str(&source[cursor..edit.start]);
        out.push_str(&edit.new_text);
        cursor = edit.end;
    }
    out.push_str(&source[cursor..]);
    Ok(out)
}

fn validate(source: &str, edit: &TextEdit) -> Result<()> {
    let (start, end) = (edit.start, edit.end);
    if start > end {
        return Err(Error::InvertedRange { start, end });
    }
    if end > source.len() {
        return Err(Error::OutOfBounds {
            start,
            end,
            len: source.len(),
        });
    }
    if !source.is_char_boundary(start) || !source.is_char_boundary(end) {
        return Err(Error::NotCharBoundary { start, end });
    }
    Ok(())
}

/// An owned document that accepts edit batches atomically.
#[derive(Debug, Clone, Default)]
pub struct Document {
    text: String,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Apply `edits` as one transaction. On failure the document is left
    /// unchanged and the failure is logged.
    pub fn apply(&mut self, edits: &[TextEdit]) -> Result<()> {
        if edits.is_empty() {
            return Ok(());
        }
        match apply_edits(&self.text, edits) {
            Ok(text) => {
                tracing::debug!(count = edits.len(), "applied edits");
                self.text = text;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "edit abandoned, document left unchanged");
                Err(e)
            }
        }
    }
}
