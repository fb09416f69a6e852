//! MD047 single-trailing-newline: files end with exactly one newline.
//!
//! A missing final newline is inserted and trailing blank lines are
//! removed. Blank lines that belong to an unclosed code block are kept.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

pub struct SingleTrailingNewline;

impl Rule for SingleTrailingNewline {
    fn id(&self) -> &'static str {
        "MD047"
    }

    fn name(&self) -> &'static str {
        "single-trailing-newline"
    }

    fn description(&self) -> &'static str {
        "Files should end with a single newline character"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let lines = ctx.lines();
        let len = ctx.source().len() as u32;

        let mut last_content = None;
        for (i, line) in lines.iter().enumerate().rev() {
            ctx.check_cancelled()?;
            if !line.is_blank || line.verbatim {
                last_content = Some(i);
                break;
            }
        }
        let Some(last) = last_content.map(|i| &lines[i]) else {
            return Ok(Vec::new());
        };

        let diagnostic = if !last.has_newline() {
            ctx.report(Span::empty(len), "Files should end with a single newline character")
                .with_edits(vec![TextEdit::insert(len, "\n")])
        } else if last.end < len {
            let span = Span::new(last.end, len);
            ctx.report(span, "Files should end with a single newline character")
                .with_edits(vec![TextEdit::delete(span.start, span.end)])
        } else {
            return Ok(Vec::new());
        };

        Ok(vec![diagnostic])
    }
}
