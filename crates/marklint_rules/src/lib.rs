//! # marklint_rules
//!
//! Built-in Markdown style rules for marklint.
//!
//! Rule ids and names follow markdownlint so existing configurations read
//! naturally. Every rule skips code blocks and front matter, checks the
//! cancellation token once per line it scans, and every fixable rule is
//! idempotent: applying its fixes leaves nothing for it to report.
//!
//! ## Example
//!
//! ```rust
//! use marklint_rules::builtin_registry;
//!
//! let registry = builtin_registry();
//! assert!(registry.get("MD009").is_some());
//! assert!(registry.get("no-trailing-spaces").is_some());
//! ```

pub mod rules;

pub use rules::{
    BlanksAroundHeadings, FirstLineHeading, HeadingStartLeft, NoHardTabs, NoMissingSpaceAtx,
    NoMultipleBlanks, NoMultipleSpaceAtx, NoTrailingPunctuation, NoTrailingSpaces,
    SingleTrailingNewline,
};

use marklint_core::RuleRegistry;

/// Returns a registry holding every built-in rule.
pub fn builtin_registry() -> RuleRegistry {
    RuleRegistry::builder()
        .register(NoTrailingSpaces)
        .register(NoHardTabs)
        .register(NoMultipleBlanks)
        .register(NoMissingSpaceAtx)
        .register(NoMultipleSpaceAtx)
        .register(BlanksAroundHeadings)
        .register(HeadingStartLeft)
        .register(NoTrailingPunctuation)
        .register(FirstLineHeading)
        .register(SingleTrailingNewline)
        .build()
}

#[cfg(test)]
pub(crate) mod test_utils;
