//! Output styles behind the [`Renderer`] trait.

pub mod snippet;
pub mod text;

use crate::model::{DocComment, RenderedComment};
use anyhow::{anyhow, Result};

/// Shown in place of a missing description.
pub const DESCRIPTION_PLACEHOLDER: &str = "add your description here";

/// Trait for turning comment content into output lines.
pub trait Renderer {
    fn render(&self, comment: &DocComment) -> RenderedComment;
    fn name(&self) -> &str;
}

/// Create a renderer for the given style name.
pub fn create_renderer(style: &str) -> Result<Box<dyn Renderer>> {
    match style {
        "text" | "plain" => Ok(Box::new(text::TextRenderer)),
        "snippet" => Ok(Box::new(snippet::SnippetRenderer)),
        _ => Err(anyhow!("unknown style: {}. Use text or snippet", style)),
    }
}

/// Shared block layout. `description` is the already styled first
/// description line(s); `escape` is applied to every other piece of text.
pub(crate) fn layout(
    comment: &DocComment,
    description: &[String],
    escape: impl Fn(&str) -> String,
) -> RenderedComment {
    let indent = &comment.indent;
    let mut lines = Vec::new();

    lines.push(format!("{indent}/**"));
    for (i, text) in description.iter().enumerate() {
        if i == 0 {
            lines.push(format!("{indent} * @description {text}"));
        } else {
            lines.push(format!("{indent} * {text}"));
        }
    }

    lines.push(format!("{indent} *"));
    if let Some(method) = &comment.method {
        for param in &method.parameters {
            lines.push(format!(
                "{indent} * @param {} {}",
                escape(&param.name),
                escape(&param.ty)
            ));
        }
        lines.push(format!("{indent} * @Date {}", escape(&method.date)));
        lines.push(format!("{indent} * @return {}", escape(&method.return_type)));
    }

    lines.push(format!("{indent} */"));
    RenderedComment::new(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_styles() {
        assert_eq!(create_renderer("text").unwrap().name(), "text");
        assert_eq!(create_renderer("snippet").unwrap().name(), "snippet");
    }

    #[test]
    fn unknown_style_fails() {
        let err = create_renderer("html").err().unwrap();
        assert!(err.to_string().contains("unknown style"));
    }
}
