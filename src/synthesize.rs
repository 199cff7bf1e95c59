//! Documentation comment synthesis for a selected declaration.
//!
//! [`plan_comment`] only reads the document: it finds any existing block,
//! parses the declaration, merges old free text with the fresh signature and
//! returns the edits to make. [`insert_comment`] applies those edits to a
//! [`Document`] as a single transaction.
//!
//! Merge policy: the block is always rebuilt. `@description` and `@Date` are
//! carried over when present; parameters and return type always come from
//! the current signature.

use crate::edit::{Document, TextEdit};
use crate::error::Result;
use crate::model::*;
use crate::parser::existing::{self, Placement};
use crate::parser::{skip_line_comments, SignatureParser};
use crate::render::text::TextRenderer;
use crate::render::{Renderer, DESCRIPTION_PLACEHOLDER};
use crate::source::{Selection, SourceText};
use chrono::{Local, NaiveDate};
use tracing::debug;

pub struct CommentOptions {
    pub parser: SignatureParser,
    pub renderer: Box<dyn Renderer>,
    /// Date written into a block that has none yet.
    pub today: NaiveDate,
}

impl Default for CommentOptions {
    fn default() -> Self {
        Self {
            parser: SignatureParser::default(),
            renderer: Box::new(TextRenderer),
            today: Local::now().date_naive(),
        }
    }
}

/// Everything [`plan_comment`] worked out, edits included.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentPlan {
    pub declaration: Declaration,
    /// The block being replaced, if any.
    pub previous: Option<ExistingComment>,
    pub comment: DocComment,
    pub rendered: RenderedComment,
    /// Deletion of the previous block (if any) followed by the insertion,
    /// both against the original text.
    pub edits: Vec<TextEdit>,
}

/// `5 March 2024`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// Combine a declaration with what survives from its previous block.
/// An untouched placeholder description counts as no description.
/// `None` for unrecognized declarations.
pub fn merge(
    declaration: &Declaration,
    previous: Option<&ExistingComment>,
    indent: &str,
    today: &str,
) -> Option<DocComment> {
    let description = previous
        .map(|c| c.description.trim())
        .filter(|d| !d.is_empty() && *d != DESCRIPTION_PLACEHOLDER)
        .map(str::to_string);

    let method = match declaration {
        Declaration::Unrecognized => return None,
        Declaration::Class => None,
        Declaration::Method(sig) => {
            let date = previous
                .map(|c| c.date.trim())
                .filter(|d| !d.is_empty())
                .unwrap_or(today);
            Some(MethodTags {
                parameters: sig.parameters.clone(),
                date: date.to_string(),
                return_type: sig.return_type.clone(),
            })
        }
    };

    Some(DocComment {
        indent: indent.to_string(),
        description,
        method,
    })
}

/// Work out the comment for `selection` without touching the document.
///
/// Returns `Ok(None)` for an empty or blank selection and for text that is
/// neither a class nor a method. Fails only when the selection does not fit
/// the document.
pub fn plan_comment(
    source: &str,
    selection: Selection,
    options: &CommentOptions,
) -> Result<Option<CommentPlan>> {
    if selection.is_empty() {
        debug!("empty selection, nothing to document");
        return Ok(None);
    }
    let text = SourceText::new(source);
    let start = text.offset(selection.start)?;
    let end = text.offset(selection.end)?;
    if source[start..end].trim().is_empty() {
        debug!("blank selection, nothing to document");
        return Ok(None);
    }

    let found = existing::extract(source, start, end);
    let decl_start = match &found {
        Some((block, Placement::Leading)) => block.end.min(end),
        _ => start,
    };
    let declaration_text = &source[decl_start..end];
    let declaration = options.parser.classify(declaration_text);

    // Line comments above the header stay above the new block.
    let lead = declaration_text.len() - skip_line_comments(declaration_text).len();
    let decl_offset = decl_start + lead;
    let decl_line = text.line_at(decl_offset);
    let prefix = &source[decl_line.start..decl_offset];
    let indent = if prefix.trim().is_empty() {
        prefix
    } else {
        decl_line.indentation()
    };

    let previous = found.map(|(block, _)| block);
    let today = format_date(options.today);
    let Some(comment) = merge(&declaration, previous.as_ref(), indent, &today) else {
        debug!("selection is not a class or method declaration");
        return Ok(None);
    };
    debug!(line = text.position(decl_offset).line + 1, "documenting declaration");
    let rendered = options.renderer.render(&comment);
    let eol = if source.contains("\r\n") { "\r\n" } else { "\n" };

    // The block goes where the old one started, or above the declaration.
    // When code shares that line, it is split onto a line of its own.
    let anchor = previous.as_ref().map_or(decl_offset, |c| c.start);
    let anchor_line = text.line_at(anchor);
    let shares_line = !source[anchor_line.start..anchor].trim().is_empty();
    let insert_at = if shares_line { anchor } else { anchor_line.start };

    let mut new_text = String::new();
    if shares_line {
        new_text.push_str(eol);
    }
    new_text.push_str(&rendered.to_text(eol));
    if shares_line {
        new_text.push_str(indent);
    }

    let mut edits = Vec::with_capacity(2);
    if let Some(old) = &previous {
        debug!(start = old.start, end = old.end, "replacing existing documentation block");
        edits.push(TextEdit::delete(old.start, old.end));
    }
    edits.push(TextEdit::insert(insert_at, new_text));

    Ok(Some(CommentPlan {
        declaration,
        previous,
        comment,
        rendered,
        edits,
    }))
}

/// Plan and apply in one step. `Ok(false)` when there was nothing to do; on
/// error the document is unchanged.
pub fn insert_comment(
    doc: &mut Document,
    selection: Selection,
    options: &CommentOptions,
) -> Result<bool> {
    let Some(plan) = plan_comment(doc.text(), selection, options)? else {
        return Ok(false);
    };
    doc.apply(&plan.edits)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::render::snippet::SnippetRenderer;
    use crate::source::Position;

    fn options() -> CommentOptions {
        CommentOptions {
            today: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            ..Default::default()
        }
    }

    fn run(source: &str, selection: Selection) -> String {
        let mut doc = Document::new(source);
        insert_comment(&mut doc, selection, &options()).unwrap();
        doc.into_text()
    }

    const CALC: &str = "public class Calc {
    /**
     * @description Computes total
     *
     * @param a Integer
     * @Date 1 January 2023
     * @return Integer
     */
    public Integer total(Integer a, String b) {
        return a;
    }
}
";

    const CALC_REFRESHED: &str = "public class Calc {
    /**
     * @description Computes total
     *
     * @param a Integer
     * @param b String
     * @Date 1 January 2023
     * @return Integer
     */
    public Integer total(Integer a, String b) {
        return a;
    }
}
";

    #[test]
    fn formats_dates_without_padding() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        assert_eq!(format_date(date), "5 March 2024");
        let date = NaiveDate::from_ymd_opt(2021, 12, 25).unwrap();
        assert_eq!(format_date(date), "25 December 2021");
    }

    #[test]
    fn documents_new_method() {
        let source = "public Integer add(Integer x, Integer y) {\n    return x + y;\n}\n";
        let out = run(source, Selection::lines(0, 2));
        assert_eq!(
            out,
            "/**
 * @description add your description here
 *
 * @param x Integer
 * @param y Integer
 * @Date 5 March 2024
 * @return Integer
 */
public Integer add(Integer x, Integer y) {
    return x + y;
}
"
        );
    }

    #[test]
    fn refresh_keeps_description_and_date() {
        assert_eq!(run(CALC, Selection::lines(1, 10)), CALC_REFRESHED);
    }

    #[test]
    fn refresh_finds_block_above_selection() {
        assert_eq!(run(CALC, Selection::lines(8, 10)), CALC_REFRESHED);
    }

    #[test]
    fn refreshing_twice_is_stable() {
        assert_eq!(run(CALC_REFRESHED, Selection::lines(9, 11)), CALC_REFRESHED);
    }

    #[test]
    fn plan_reports_previous_block() {
        let plan = plan_comment(CALC, Selection::lines(8, 10), &options())
            .unwrap()
            .unwrap();
        let previous = plan.previous.unwrap();
        assert_eq!(previous.description, "Computes total");
        assert_eq!(previous.date, "1 January 2023");
        assert_eq!(plan.edits.len(), 2);
        assert!(plan.edits[1].is_insertion());
    }

    #[test]
    fn class_gets_description_only() {
        let out = run("public with sharing class Calc {\n}\n", Selection::lines(0, 1));
        assert_eq!(
            out,
            "/**\n * @description add your description here\n *\n */\npublic with sharing class Calc {\n}\n"
        );
    }

    #[test]
    fn indentation_follows_declaration() {
        let source = "class A {\n\tvoid run() {\n\t}\n}";
        let out = run(source, Selection::lines(1, 2));
        assert!(out.starts_with("class A {\n\t/**\n\t * @description "));
        assert!(out.contains("\t * @return void\n\t */\n\tvoid run() {"));
    }

    #[test]
    fn unrecognized_selection_is_a_no_op() {
        let source = "Integer total = a + b;\n";
        let sel = Selection::lines(0, 0);
        assert_eq!(plan_comment(source, sel, &options()).unwrap(), None);
        let mut doc = Document::new(source);
        assert!(!insert_comment(&mut doc, sel, &options()).unwrap());
        assert_eq!(doc.text(), source);
    }

    #[test]
    fn empty_selection_is_a_no_op() {
        let here = Position::new(0, 3);
        let sel = Selection::new(here, here);
        assert_eq!(plan_comment("void f() {}", sel, &options()).unwrap(), None);
    }

    #[test]
    fn selection_outside_document_fails_cleanly() {
        let source = "void f() {\n}";
        let sel = Selection::lines(4, 6);
        let mut doc = Document::new(source);
        assert!(matches!(
            insert_comment(&mut doc, sel, &options()),
            Err(Error::PositionOutOfRange { .. })
        ));
        assert_eq!(doc.text(), source);
    }

    #[test]
    fn declaration_sharing_a_line_is_split() {
        let source = "x(); public void f() {\n}";
        let sel = Selection::new(Position::new(0, 5), Position::new(1, 1));
        let out = run(source, sel);
        assert!(out.starts_with("x(); \n/**\n * @description "));
        assert!(out.ends_with(" */\npublic void f() {\n}"));
    }

    #[test]
    fn block_sharing_the_declaration_line_leaves_no_stray_space() {
        let out = run("/** @description d */ void f() {\n}", Selection::lines(0, 1));
        assert_eq!(
            out,
            "/**\n * @description d\n *\n * @Date 5 March 2024\n * @return void\n */\nvoid f() {\n}"
        );
    }

    #[test]
    fn block_goes_below_leading_line_comments() {
        let source = "    // Entry point.\n    global void run() {\n    }\n";
        let out = run(source, Selection::lines(0, 2));
        assert!(out.starts_with("    // Entry point.\n    /**\n     * @description "));
        assert!(out.ends_with("     */\n    global void run() {\n    }\n"));
    }

    #[test]
    fn placeholder_description_is_not_kept_as_text() {
        let source = "/**\n * @description add your description here\n *\n * @Date 1 May 2020\n * @return void\n */\nvoid f() {\n}";
        let opts = CommentOptions {
            renderer: Box::new(SnippetRenderer),
            ..options()
        };
        let plan = plan_comment(source, Selection::lines(6, 7), &opts)
            .unwrap()
            .unwrap();
        assert_eq!(plan.comment.description, None);
        assert_eq!(
            plan.rendered.lines()[1],
            " * @description ${1:add your description here}"
        );
        assert_eq!(plan.rendered.lines()[3], " * @Date 1 May 2020");
    }

    #[test]
    fn keeps_crlf() {
        let source = "void f() {\r\n}\r\n";
        let out = run(source, Selection::lines(0, 1));
        assert!(out.starts_with("/**\r\n * @description "));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn snippet_style_uses_tab_stop() {
        let opts = CommentOptions {
            renderer: Box::new(SnippetRenderer),
            ..options()
        };
        let plan = plan_comment("void f() {\n}", Selection::lines(0, 1), &opts)
            .unwrap()
            .unwrap();
        assert_eq!(
            plan.rendered.lines()[1],
            " * @description ${1:add your description here}"
        );
    }

    #[test]
    fn merge_uses_today_without_previous_date() {
        let sig = crate::parser::parse_signature("void f()").unwrap();
        let previous = ExistingComment {
            description: "Kept".to_string(),
            ..Default::default()
        };
        let comment = merge(&Declaration::Method(sig), Some(&previous), "", "2 June 2022").unwrap();
        assert_eq!(comment.description.as_deref(), Some("Kept"));
        assert_eq!(comment.method.unwrap().date, "2 June 2022");
        assert_eq!(merge(&Declaration::Unrecognized, None, "", "x"), None);
    }
}
