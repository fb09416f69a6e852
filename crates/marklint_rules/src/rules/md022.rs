//! MD022 blanks-around-headings: a blank line before and after each heading.
//!
//! Only headings at the top level of the document are checked; a heading
//! directly after front matter needs no blank line above it.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, TextEdit};

pub struct BlanksAroundHeadings;

impl Rule for BlanksAroundHeadings {
    fn id(&self) -> &'static str {
        "MD022"
    }

    fn name(&self) -> &'static str {
        "blanks-around-headings"
    }

    fn description(&self) -> &'static str {
        "Headings should be surrounded by blank lines"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let snapshot = ctx.snapshot();
        let lines = ctx.lines();
        let front_matter = snapshot.front_matter();
        let mut diagnostics = Vec::new();

        for heading in snapshot.headings().iter().filter(|h| h.top_level) {
            ctx.check_cancelled()?;
            let first = &lines[heading.line];

            if let Some(above) = heading.line.checked_sub(1).map(|i| &lines[i]) {
                let after_front_matter = front_matter.is_some_and(|fm| fm.contains(above.start));
                if !above.is_blank && !after_front_matter {
                    diagnostics.push(
                        ctx.report(first.content_span(), "Expected a blank line above heading")
                            .with_edits(vec![TextEdit::insert(first.start, "\n")]),
                    );
                }
            }

            // Setext headings end on their underline.
            let last_byte = heading.span.end.saturating_sub(1).max(heading.span.start);
            let last_line = snapshot.line_index(last_byte);
            let last = &lines[last_line];
            if lines.get(last_line + 1).is_some_and(|below| !below.is_blank) {
                diagnostics.push(
                    ctx.report(last.content_span(), "Expected a blank line below heading")
                        .with_edits(vec![TextEdit::insert(last.end, "\n")]),
                );
            }
        }

        Ok(diagnostics)
    }
}
