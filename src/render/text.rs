//! Plain-text renderer. The placeholder is inserted literally.

use crate::model::{DocComment, RenderedComment};
use crate::render::{layout, Renderer, DESCRIPTION_PLACEHOLDER};

pub struct TextRenderer;

impl Renderer for TextRenderer {
    fn render(&self, comment: &DocComment) -> RenderedComment {
        let description: Vec<String> = match &comment.description {
            Some(text) => text.lines().map(str::to_string).collect(),
            None => vec![DESCRIPTION_PLACEHOLDER.to_string()],
        };
        layout(comment, &description, str::to_string)
    }

    fn name(&self) -> &str {
        "text"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MethodTags, Parameter, Parameters};

    fn method_comment(description: Option<&str>) -> DocComment {
        DocComment {
            indent: "    ".to_string(),
            description: description.map(str::to_string),
            method: Some(MethodTags {
                parameters: [Parameter::new("x", "Integer"), Parameter::new("y", "Integer")]
                    .into_iter()
                    .collect::<Parameters>(),
                date: "5 March 2024".to_string(),
                return_type: "Integer".to_string(),
            }),
        }
    }

    #[test]
    fn method_layout() {
        let rendered = TextRenderer.render(&method_comment(None));
        assert_eq!(
            rendered.lines(),
            [
                "    /**",
                "     * @description add your description here",
                "     *",
                "     * @param x Integer",
                "     * @param y Integer",
                "     * @Date 5 March 2024",
                "     * @return Integer",
                "     */",
            ]
        );
    }

    #[test]
    fn class_layout_has_no_method_tags() {
        let comment = DocComment {
            indent: String::new(),
            description: Some("Invoice service".to_string()),
            method: None,
        };
        assert_eq!(
            TextRenderer.render(&comment).lines(),
            ["/**", " * @description Invoice service", " *", " */"]
        );
    }

    #[test]
    fn multi_line_description_keeps_lines() {
        let rendered = TextRenderer.render(&method_comment(Some("First\nSecond")));
        assert_eq!(rendered.lines()[1], "     * @description First");
        assert_eq!(rendered.lines()[2], "     * Second");
        assert_eq!(rendered.lines()[3], "     *");
    }
}
