//! Brace-depth re-indentation.
//!
//! A line-by-line state machine: each non-blank line is trimmed, assigned
//! a depth from the braces seen so far, and re-rendered with that many
//! indent units. Blank lines are never touched and never affect state.
//!
//! This is not a brace balancer. Only a leading `}` and a trailing `{`
//! count, so `} else {` dedents then indents, and `a { b }` is depth
//! neutral.

use crate::edit::{apply_edits, TextEdit};
use crate::source::SourceText;

const COMMENT_OPEN: &str = "/*";
const COMMENT_CLOSE: &str = "*/";
const LINE_COMMENT: &str = "//";

/// Widest accepted space indent.
pub const MAX_INDENT_WIDTH: usize = 16;

/// One level of indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Spaces(usize),
    Tab,
}

impl Default for IndentUnit {
    fn default() -> Self {
        IndentUnit::Spaces(4)
    }
}

impl IndentUnit {
    /// Leading whitespace for `depth`; negative depths render as nothing.
    /// Widths above [`MAX_INDENT_WIDTH`] are clamped to it.
    pub fn render(&self, depth: i64) -> String {
        let levels = usize::try_from(depth).unwrap_or(0);
        match self {
            IndentUnit::Spaces(width) => " ".repeat((*width).min(MAX_INDENT_WIDTH) * levels),
            IndentUnit::Tab => "\t".repeat(levels),
        }
    }
}

/// State carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentState {
    pub depth: i64,
    pub in_multiline_comment: bool,
}

/// Outcome of feeding one trimmed line through [`IndentState::next`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    /// Depth the line is rendered at.
    pub depth: i64,
    /// Whether the line is part of a multi-line comment (opener and closer
    /// included).
    pub in_multiline_comment: bool,
    /// Trimmed text, with the comment-continuation space applied.
    pub content: String,
    /// State for the following line.
    pub next: IndentState,
}

impl IndentState {
    /// Advance over one non-blank, already trimmed line.
    pub fn next(self, text: &str) -> Transition {
        let inside = self.in_multiline_comment;
        let opens = !inside && opens_comment(text);
        let still_inside = if inside {
            !text.ends_with(COMMENT_CLOSE)
        } else {
            opens
        };

        let mut depth = self.depth;
        let is_code = !inside && !opens;
        if is_code && text.starts_with('}') {
            depth -= 1;
        }
        let render_depth = depth;

        let content = if inside && text.starts_with('*') {
            format!(" {text}")
        } else {
            text.to_string()
        };

        if is_code && strip_line_comment(text).trim_end().ends_with('{') {
            depth += 1;
        }

        Transition {
            depth: render_depth,
            in_multiline_comment: inside || opens,
            content,
            next: IndentState {
                depth,
                in_multiline_comment: still_inside,
            },
        }
    }
}

/// `/*` at the start of the line with no `*/` after it.
fn opens_comment(text: &str) -> bool {
    text.strip_prefix(COMMENT_OPEN)
        .is_some_and(|rest| !rest.contains(COMMENT_CLOSE))
}

/// Drop a trailing `//` comment. The marker only counts when no `{` follows
/// it, since `//` may sit inside a string before the real brace.
fn strip_line_comment(text: &str) -> &str {
    let Some(at) = text.find(LINE_COMMENT) else {
        return text;
    };
    match text.find('{') {
        Some(brace) if brace > at && at > 0 => text,
        _ => &text[..at],
    }
}

/// A non-blank line with its computed depth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedLine {
    pub index: usize,
    pub depth: i64,
    pub in_multiline_comment: bool,
    pub content: String,
}

impl AnnotatedLine {
    pub fn render(&self, unit: &IndentUnit) -> String {
        let mut out = unit.render(self.depth);
        out.push_str(&self.content);
        out
    }
}

/// Fold the state machine over every non-blank line.
pub fn annotate(source: &SourceText<'_>) -> Vec<AnnotatedLine> {
    source
        .lines()
        .iter()
        .filter(|line| !line.is_blank())
        .scan(IndentState::default(), |state, line| {
            let step = state.next(line.trimmed());
            *state = step.next;
            Some(AnnotatedLine {
                index: line.index,
                depth: step.depth,
                in_multiline_comment: step.in_multiline_comment,
                content: step.content,
            })
        })
        .collect()
}

/// One edit per line whose rendering differs from the original.
pub fn format(source: &str, unit: &IndentUnit) -> Vec<TextEdit> {
    let text = SourceText::new(source);
    let edits: Vec<TextEdit> = annotate(&text)
        .into_iter()
        .filter_map(|annotated| {
            let line = text.lines()[annotated.index];
            let rendered = annotated.render(unit);
            (rendered != line.raw).then(|| TextEdit::replace(line.start, line.end(), rendered))
        })
        .collect();
    tracing::debug!(lines = text.line_count(), edits = edits.len(), "computed indentation");
    edits
}

/// Whole-document variant of [`format`].
pub fn reindent(source: &str, unit: &IndentUnit) -> String {
    let edits = format(source, unit);
    match apply_edits(source, &edits) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(error = %e, "reindent abandoned");
            source.to_string()
        }
    }
}
