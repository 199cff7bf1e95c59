//! Editor snippet renderer.
//!
//! The description placeholder becomes a tab stop (`${1:...}`) so an editor
//! host can select it after insertion. Everything else is escaped so it is
//! inserted verbatim.

use crate::model::{DocComment, RenderedComment};
use crate::render::{layout, Renderer, DESCRIPTION_PLACEHOLDER};

pub struct SnippetRenderer;

impl Renderer for SnippetRenderer {
    fn render(&self, comment: &DocComment) -> RenderedComment {
        let description: Vec<String> = match &comment.description {
            Some(text) => text.lines().map(escape).collect(),
            None => vec![format!("${{1:{DESCRIPTION_PLACEHOLDER}}}")],
        };
        layout(comment, &description, escape)
    }

    fn name(&self) -> &str {
        "snippet"
    }
}

/// Escape snippet metacharacters.
fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '$' | '}' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}
