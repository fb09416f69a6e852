//! MD026 no-trailing-punctuation: headings should not end in punctuation.
//!
//! # Configuration
//!
//! | Option | Type | Default | Description |
//! |--------|------|---------|-------------|
//! | punctuation | string | `.,;:!` | Characters not allowed at the end of a heading |
//!
//! A trailing `;` that closes an HTML entity (`&amp;`) is allowed.

use marklint_core::{Diagnostic, Rule, RuleContext, RuleError, Span, TextEdit};

pub struct NoTrailingPunctuation;

const DEFAULT_PUNCTUATION: &str = ".,;:!";

impl Rule for NoTrailingPunctuation {
    fn id(&self) -> &'static str {
        "MD026"
    }

    fn name(&self) -> &'static str {
        "no-trailing-punctuation"
    }

    fn description(&self) -> &'static str {
        "Trailing punctuation in heading"
    }

    fn can_fix(&self) -> bool {
        true
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
        let punctuation = ctx.option_str("punctuation", DEFAULT_PUNCTUATION)?;
        let snapshot = ctx.snapshot();
        let source = ctx.source();
        let lines = ctx.lines();
        let mut diagnostics = Vec::new();

        for heading in snapshot.headings() {
            ctx.check_cancelled()?;

            // Setext text ends on the line above the underline.
            let text_line = if heading.setext {
                snapshot
                    .line_index(heading.span.end.saturating_sub(1))
                    .saturating_sub(1)
            } else {
                heading.line
            };
            let line = &lines[text_line];
            let start = line.start.max(heading.span.start) as usize;
            let text = &source[start..line.newline_start as usize];
            let content = if heading.setext {
                text.trim_end()
            } else {
                atx_content(text)
            };

            let stripped = content.trim_end_matches(|c: char| punctuation.contains(c));
            if stripped.len() == content.len() || ends_with_entity(content) {
                continue;
            }

            let span = Span::new(
                (start + stripped.len()) as u32,
                (start + content.len()) as u32,
            );
            diagnostics.push(
                ctx.report(
                    span,
                    format!("Punctuation: '{}'", &content[stripped.len()..]),
                )
                .with_edits(vec![TextEdit::delete(span.start, span.end)]),
            );
        }

        Ok(diagnostics)
    }
}

/// Strips the trailing whitespace and the optional closing `#` sequence.
fn atx_content(text: &str) -> &str {
    let text = text.trim_end();
    let without_hashes = text.trim_end_matches('#');
    if without_hashes.len() < text.len() && without_hashes.ends_with([' ', '\t']) {
        without_hashes.trim_end()
    } else {
        text
    }
}

fn ends_with_entity(text: &str) -> bool {
    let Some(body) = text.strip_suffix(';') else {
        return false;
    };
    let Some(amp) = body.rfind('&') else {
        return false;
    };
    let name = &body[amp + 1..];
    let name = name.strip_prefix('#').unwrap_or(name);
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}
