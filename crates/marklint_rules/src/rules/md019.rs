//! MD019 no-multiple-space-atx: one space between the hashes and the text.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

pub struct NoMultipleSpaceAtx;

impl Rule for NoMultipleSpaceAtx {
    fn id(&self) -> &'static str {
        "MD019"
    }

    fn name(&self) -> &'static str {
        "no-multiple-space-atx"
    }

    fn description(&self) -> &'static str {
        "Multiple spaces after hash on atx style heading"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let source = ctx.source();
        let lines = ctx.lines();
        let mut diagnostics = Vec::new();

        for heading in ctx.snapshot().headings() {
            ctx.check_cancelled()?;
            if heading.setext {
                continue;
            }

            let line_end = lines[heading.line].newline_start as usize;
            let text = &source[heading.span.start as usize..line_end];
            let indent = text.len() - text.trim_start_matches([' ', '\t']).len();
            let hashes = text[indent..].bytes().take_while(|&b| b == b'#').count();
            let after = indent + hashes;
            let gap = text[after..]
                .bytes()
                .take_while(|&b| b == b' ' || b == b'\t')
                .count();
            if gap <= 1 || after + gap == text.len() {
                continue;
            }

            let start = heading.span.start + after as u32;
            let span = Span::new(start, start + gap as u32);
            diagnostics.push(
                ctx.report(span, "Multiple spaces after hash on atx style heading")
                    .with_edits(vec![TextEdit::replace_span(span, " ")]),
            );
        }

        Ok(diagnostics)
    }
}
