//! MD009 no-trailing-spaces: disallow whitespace at the end of a line.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | br_spaces | integer | 2 | Exactly this many trailing spaces are kept as a hard line break when the next line continues the paragraph (values below 2 disable the exception) |
//!
//! # Example
//!
//! ```json
//! {
//!   "rules": {
//!     "no-trailing-spaces": { "br_spaces": 0 }
//!   }
//! }
//! ```

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

use super::{option_u32, trimmed_len};

pub struct NoTrailingSpaces;

impl Rule for NoTrailingSpaces {
    fn id(&self) -> &'static str {
        "MD009"
    }

    fn name(&self) -> &'static str {
        "no-trailing-spaces"
    }

    fn description(&self) -> &'static str {
        "Trailing spaces"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let br_spaces = option_u32(ctx, "br_spaces", 2)?;
        let snapshot = ctx.snapshot();
        let lines = ctx.lines();
        let mut diagnostics = Vec::new();

        for (i, line) in lines.iter().enumerate() {
            ctx.check_cancelled()?;
            if line.verbatim {
                continue;
            }

            let text = snapshot.line_text(i);
            let kept = trimmed_len(text) as u32;
            let trailing = &text[kept as usize..];
            if trailing.is_empty() {
                continue;
            }

            let is_hard_break = br_spaces >= 2
                && !line.is_blank
                && trailing.len() as u32 == br_spaces
                && trailing.bytes().all(|b| b == b' ')
                && lines
                    .get(i + 1)
                    .is_some_and(|next| !next.is_blank && !next.verbatim);
            if is_hard_break {
                continue;
            }

            let span = Span::new(line.start + kept, line.newline_start);
            diagnostics.push(
                ctx.report(
                    span,
                    format!("Expected: 0 trailing spaces; Actual: {}", trailing.len()),
                )
                .with_edits(vec![TextEdit::delete(span.start, span.end)]),
            );
        }

        Ok(diagnostics)
    }
}
