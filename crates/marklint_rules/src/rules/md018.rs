//! MD018 no-missing-space-atx: `#Heading` is a paragraph, not a heading.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

pub struct NoMissingSpaceAtx;

impl Rule for NoMissingSpaceAtx {
    fn id(&self) -> &'static str {
        "MD018"
    }

    fn name(&self) -> &'static str {
        "no-missing-space-atx"
    }

    fn description(&self) -> &'static str {
        "No space after hash on atx style heading"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let snapshot = ctx.snapshot();
        let mut diagnostics = Vec::new();

        for (i, line) in ctx.lines().iter().enumerate() {
            ctx.check_cancelled()?;
            if line.verbatim || line.is_blank || line.indent > 3 {
                continue;
            }

            let text = snapshot.line_text(i);
            let content = &text[line.indent_bytes as usize..];
            let hashes = content.bytes().take_while(|&b| b == b'#').count();
            if !(1..=6).contains(&hashes) {
                continue;
            }
            let Some(next) = content[hashes..].chars().next() else {
                continue;
            };
            if next.is_whitespace() {
                continue;
            }

            let after_hashes = line.content_start() + hashes as u32;
            diagnostics.push(
                ctx.report(
                    Span::new(line.content_start(), after_hashes),
                    "No space after hash on atx style heading",
                )
                .with_edits(vec![TextEdit::insert(after_hashes, " ")]),
            );
        }

        Ok(diagnostics)
    }
}
