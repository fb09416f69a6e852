//! MD012 no-multiple-blanks: limit consecutive blank lines.
//!
//! Blank lines inside code blocks do not count.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | maximum | integer | 1 | Consecutive blank lines allowed |

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

use super::option_u32;

pub struct NoMultipleBlanks;

impl Rule for NoMultipleBlanks {
    fn id(&self) -> &'static str {
        "MD012"
    }

    fn name(&self) -> &'static str {
        "no-multiple-blanks"
    }

    fn description(&self) -> &'static str {
        "Multiple consecutive blank lines"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let maximum = option_u32(ctx, "maximum", 1)?;
        let mut diagnostics = Vec::new();
        let mut run = 0u32;

        for line in ctx.lines() {
            ctx.check_cancelled()?;
            if !line.is_blank || line.verbatim {
                run = 0;
                continue;
            }

            run += 1;
            if run > maximum {
                let span = Span::new(line.start, line.end);
                diagnostics.push(
                    ctx.report(
                        line.content_span(),
                        format!("Expected: {}; Actual: {}", maximum, run),
                    )
                    .with_edits(vec![TextEdit::delete(span.start, span.end)]),
                );
            }
        }

        Ok(diagnostics)
    }
}
