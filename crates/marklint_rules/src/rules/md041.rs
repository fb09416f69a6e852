//! MD041 first-line-heading: the document should start with a top-level
//! heading.
//!
//! Front matter and HTML comments before the first block are skipped; an
//! HTML `<h1>` counts as a heading. Not fixable: there is no title to
//! invent.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | level | integer | 1 | Required heading level |

use marklint_ast::{MdNode, NodeType};
use marklint_core::{Diagnostic, Rule, RuleContext, RuleError};

use super::option_u32;

pub struct FirstLineHeading;

impl Rule for FirstLineHeading {
    fn id(&self) -> &'static str {
        "MD041"
    }

    fn name(&self) -> &'static str {
        "first-line-heading"
    }

    fn description(&self) -> &'static str {
        "First line in a file should be a top-level heading"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let level = option_u32(ctx, "level", 1)?;
        if !(1..=6).contains(&level) {
            return Err(RuleError::invalid_option("level", "expected 1 to 6"));
        }
        ctx.check_cancelled()?;

        let first = ctx
            .snapshot()
            .root()
            .children
            .iter()
            .find(|node| !is_preamble(node));
        let Some(first) = first else {
            return Ok(Vec::new());
        };

        let is_heading = match first.heading_depth() {
            Some(depth) => u32::from(depth) == level,
            None => first.node_type == NodeType::Html && is_html_heading(first, level),
        };
        if is_heading {
            return Ok(Vec::new());
        }

        let snapshot = ctx.snapshot();
        let line = &ctx.lines()[snapshot.line_index(first.span.start)];
        Ok(vec![ctx.report(
            line.content_span(),
            format!("First line in a file should be a level {} heading", level),
        )])
    }
}

fn is_preamble(node: &MdNode<'_>) -> bool {
    match node.node_type {
        NodeType::FrontMatter => true,
        NodeType::Html => node
            .value
            .is_some_and(|html| html.trim_start().starts_with("<!--")),
        _ => false,
    }
}

fn is_html_heading(node: &MdNode<'_>, level: u32) -> bool {
    let tag = format!("<h{}", level);
    node.value.is_some_and(|html| {
        let html = html.trim_start();
        html.get(..tag.len())
            .is_some_and(|open| open.eq_ignore_ascii_case(&tag))
            && html[tag.len()..].starts_with(['>', ' ', '\t', '\n'])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{check, check_with, lines};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case::h1("# Title\n\nText\n")]
    #[case::setext("Title\n=====\n")]
    #[case::front_matter("---\ntitle: x\n---\n# Title\n")]
    #[case::comment("<!-- generated -->\n\n# Title\n")]
    #[case::html_heading("<h1 align=\"center\">Title</h1>\n")]
    #[case::empty("")]
    #[case::blank_lines("\n\n# Title\n")]
    fn not_reported(#[case] source: &str) {
        assert!(check(FirstLineHeading, source).is_empty());
    }

    #[rstest]
    #[case::paragraph("Some text\n\n# Title\n", 1)]
    #[case::second_level("## Title\n", 1)]
    #[case::after_blank_lines("\n\nText\n", 3)]
    #[case::list("- item\n", 1)]
    fn reported(#[case] source: &str, #[case] line: u32) {
        let diagnostics = check(FirstLineHeading, source);
        assert_eq!(lines(&diagnostics), vec![line]);
        assert!(diagnostics[0].edits.is_empty());
    }

    #[test]
    fn level_option() {
        let options = json!({ "level": 2 });
        assert!(check_with(FirstLineHeading, options.clone(), "## Title\n").is_empty());
        assert_eq!(check_with(FirstLineHeading, options, "# Title\n").len(), 1);
    }

    #[test]
    fn level_out_of_range_is_invalid() {
        let err = crate::test_utils::try_check_with(
            FirstLineHeading,
            json!({ "level": 9 }),
            "# Title\n",
        )
        .unwrap_err();
        assert!(matches!(err, RuleError::InvalidOption { .. }));
    }

    #[test]
    fn is_not_fixable() {
        assert!(!FirstLineHeading.can_fix());
    }
}
