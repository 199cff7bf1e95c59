//! Locating and reading an existing `/** ... */` block next to a declaration.

use crate::model::ExistingComment;
use regex::Regex;
use std::sync::LazyLock;

const DOC_OPEN: &str = "/**";
const DOC_CLOSE: &str = "*/";

static RE_DESCRIPTION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@description\b[ \t]*(.*)$").unwrap());

static RE_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^@date\b[ \t]*(.*)$").unwrap());

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^@\w+").unwrap());

/// Where a block was found relative to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// First thing inside the selection.
    Leading,
    /// Directly above the selection, separated by whitespace only.
    Preceding,
}

/// Byte span of a documentation block, markers included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockSpan {
    pub start: usize,
    pub end: usize,
    pub placement: Placement,
}

/// Find the documentation block for the selection `start..end` of `source`.
pub fn locate(source: &str, start: usize, end: usize) -> Option<BlockSpan> {
    leading(source, start, end).or_else(|| preceding(source, start))
}

fn leading(source: &str, start: usize, end: usize) -> Option<BlockSpan> {
    let selected = &source[start..end];
    let lead = selected.len() - selected.trim_start().len();
    let open = start + lead;
    if !source[open..end].starts_with(DOC_OPEN) {
        return None;
    }
    let close = source[open + DOC_OPEN.len()..end].find(DOC_CLOSE)?;
    Some(BlockSpan {
        start: open,
        end: open + DOC_OPEN.len() + close + DOC_CLOSE.len(),
        placement: Placement::Leading,
    })
}

fn preceding(source: &str, start: usize) -> Option<BlockSpan> {
    let before = source[..start].trim_end();
    let inner_end = before.strip_suffix(DOC_CLOSE)?.len();
    let open = before[..inner_end].rfind(DOC_OPEN)?;
    if before[open + DOC_OPEN.len()..inner_end].contains(DOC_CLOSE) {
        return None;
    }
    Some(BlockSpan {
        start: open,
        end: before.len(),
        placement: Placement::Preceding,
    })
}

/// Read `@description` and `@Date` from a block's text.
///
/// The description runs from its tag to the next blank line, tag, or the
/// end of the block; continuation lines are kept, one per line.
pub fn read_tags(block: &str) -> (String, String) {
    let body = block.strip_prefix(DOC_OPEN).unwrap_or(block);
    let body = body.strip_suffix(DOC_CLOSE).unwrap_or(body);

    let mut description: Vec<&str> = Vec::new();
    let mut date = String::new();
    let mut in_description = false;

    for raw in body.lines() {
        let line = raw.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();

        if let Some(caps) = RE_DESCRIPTION.captures(line) {
            description.clear();
            let first = caps.get(1).map_or("", |m| m.as_str().trim());
            if !first.is_empty() {
                description.push(first);
            }
            in_description = true;
            continue;
        }
        if let Some(caps) = RE_DATE.captures(line) {
            date = caps.get(1).map_or("", |m| m.as_str().trim()).to_string();
            in_description = false;
            continue;
        }
        if RE_TAG.is_match(line) || (line.is_empty() && !description.is_empty()) {
            in_description = false;
            continue;
        }
        if in_description && !line.is_empty() {
            description.push(line);
        }
    }

    (description.join("\n"), date)
}

/// Extend a block span to whole lines when nothing else shares them: back
/// to the line start, and forward past the line terminator. When code
/// follows the block on its last line, only the spaces before it are taken.
pub fn widen_to_lines(source: &str, start: usize, end: usize) -> (usize, usize) {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let start = if source[line_start..start].trim().is_empty() {
        line_start
    } else {
        start
    };

    let rest = &source[end..];
    let line_end = rest.find('\n').map_or(source.len(), |i| end + i + 1);
    let after = &source[end..line_end];
    let end = if after.trim().is_empty() {
        line_end
    } else {
        end + after.len() - after.trim_start_matches([' ', '\t']).len()
    };
    (start, end)
}

/// Locate, read and widen the block for a selection.
pub fn extract(source: &str, start: usize, end: usize) -> Option<(ExistingComment, Placement)> {
    let span = locate(source, start, end)?;
    let (description, date) = read_tags(&source[span.start..span.end]);
    let (wide_start, wide_end) = widen_to_lines(source, span.start, span.end);
    Some((
        ExistingComment {
            description,
            date,
            start: wide_start,
            end: wide_end,
        },
        span.placement,
    ))
}
