//! MD023 heading-start-left: headings must start at the beginning of the line.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

pub struct HeadingStartLeft;

impl Rule for HeadingStartLeft {
    fn id(&self) -> &'static str {
        "MD023"
    }

    fn name(&self) -> &'static str {
        "heading-start-left"
    }

    fn description(&self) -> &'static str {
        "Headings must start at the beginning of the line"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let lines = ctx.lines();
        let mut diagnostics = Vec::new();

        for heading in ctx.snapshot().headings().iter().filter(|h| h.top_level) {
            ctx.check_cancelled()?;
            let line = &lines[heading.line];
            if line.indent_bytes == 0 {
                continue;
            }

            let span = Span::new(line.start, line.content_start());
            diagnostics.push(
                ctx.report(span, "Headings must start at the beginning of the line")
                    .with_edits(vec![TextEdit::delete(span.start, span.end)]),
            );
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{check, fix};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case::atx("  # Title\n", "# Title\n")]
    #[case::setext(" Title\n=====\n", "Title\n=====\n")]
    #[case::after_paragraph("Text\n\n   ## Sub\n", "Text\n\n## Sub\n")]
    fn fixes(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix(HeadingStartLeft, source), expected);
    }

    #[rstest]
    #[case::flush("# Title\n")]
    #[case::indented_code("    # not a heading\n")]
    #[case::nested_in_list("- item\n\n  # In item\n")]
    fn not_reported(#[case] source: &str) {
        assert!(check(HeadingStartLeft, source).is_empty());
    }
}
