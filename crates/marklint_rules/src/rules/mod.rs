//! Built-in rule implementations, one module per rule.

mod md009;
mod md010;
mod md012;
mod md018;
mod md019;
mod md022;
mod md023;
mod md026;
mod md041;
mod md047;

pub use md009::NoTrailingSpaces;
pub use md010::NoHardTabs;
pub use md012::NoMultipleBlanks;
pub use md018::NoMissingSpaceAtx;
pub use md019::NoMultipleSpaceAtx;
pub use md022::BlanksAroundHeadings;
pub use md023::HeadingStartLeft;
pub use md026::NoTrailingPunctuation;
pub use md041::FirstLineHeading;
pub use md047::SingleTrailingNewline;

use marklint_core::{RuleContext, RuleError};

/// Reads a `u32` option, rejecting values that do not fit.
pub(crate) fn option_u32(ctx: &RuleContext<'_>, key: &str, default: u32) -> Result<u32, RuleError> {
    let value = ctx.option_u64(key, u64::from(default))?;
    u32::try_from(value).map_err(|_| RuleError::invalid_option(key, "value is too large"))
}

/// Length in bytes of `text` without trailing spaces and tabs.
pub(crate) fn trimmed_len(text: &str) -> usize {
    text.trim_end_matches([' ', '\t']).len()
}
