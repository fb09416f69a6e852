//! MD010 no-hard-tabs: replace hard tabs outside code with spaces.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | spaces_per_tab | integer | 4 | Spaces inserted for each tab |

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

use super::option_u32;

pub struct NoHardTabs;

impl Rule for NoHardTabs {
    fn id(&self) -> &'static str {
        "MD010"
    }

    fn name(&self) -> &'static str {
        "no-hard-tabs"
    }

    fn description(&self) -> &'static str {
        "Hard tabs"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let spaces_per_tab = option_u32(ctx, "spaces_per_tab", 4)? as usize;
        let snapshot = ctx.snapshot();
        let mut diagnostics = Vec::new();

        for (i, line) in ctx.lines().iter().enumerate() {
            ctx.check_cancelled()?;
            if line.verbatim {
                continue;
            }

            let text = snapshot.line_text(i);
            let mut rest = text;
            let mut offset = 0usize;
            // One finding per run of consecutive tabs.
            while let Some(pos) = rest.find('\t') {
                let run = rest[pos..].bytes().take_while(|&b| b == b'\t').count();
                let start = line.start + (offset + pos) as u32;
                let span = Span::new(start, start + run as u32);
                diagnostics.push(
                    ctx.report(span, format!("Hard tabs: {} tab(s)", run))
                        .with_edits(vec![TextEdit::replace_span(
                            span,
                            " ".repeat(run * spaces_per_tab),
                        )]),
                );
                offset += pos + run;
                rest = &text[offset..];
            }
        }

        Ok(diagnostics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{check, check_cancelled, fix, fix_with};
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn tab_runs_are_one_finding() {
        let diagnostics = check(NoHardTabs, "a\t\tb\tc\n");
        let spans: Vec<Span> = diagnostics.iter().map(|d| d.span).collect();
        assert_eq!(spans, vec![Span::new(1, 3), Span::new(4, 5)]);
    }

    #[rstest]
    #[case::inline("a\tb\n", "a    b\n")]
    #[case::list_indent("- item\n\n\tmore\n", "- item\n\n    more\n")]
    #[case::lazy_continuation("a\tb\n\tc\n", "a    b\n    c\n")]
    fn fixes(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(fix(NoHardTabs, source), expected);
    }

    #[test]
    fn spaces_per_tab_option() {
        let options = json!({ "spaces_per_tab": 2 });
        assert_eq!(fix_with(NoHardTabs, options, "a\t\tb\n"), "a    b\n");
    }

    #[test]
    fn code_and_front_matter_are_skipped() {
        let source = "---\nkey:\tvalue\n---\n\n```make\nall:\n\tcc main.c\n```\n";
        assert!(check(NoHardTabs, source).is_empty());
    }

    #[test]
    fn observes_cancellation() {
        assert_eq!(
            check_cancelled(NoHardTabs, "\tx\n").unwrap_err(),
            RuleError::Cancelled
        );
    }
}
