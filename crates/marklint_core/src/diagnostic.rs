//! Diagnostic types for lint results.

use std::fmt;
use std::str::FromStr;

use marklint_ast::{Location, Span};
use serde::{Deserialize, Serialize};

use crate::edit::TextEdit;

/// Severity level for diagnostics.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Error - must be fixed.
    #[default]
    Error,
    /// Warning - should be reviewed.
    Warning,
    /// Info - informational message.
    Info,
}

impl Severity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" | "warn" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            other => Err(format!("unknown severity '{other}'")),
        }
    }
}

/// A finding reported by a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable rule identifier, e.g. `MD009`.
    pub rule_id: String,

    /// Human-readable rule name, e.g. `no-trailing-spaces`.
    pub rule_name: String,

    /// Byte span in the source.
    pub span: Span,

    /// Line/column location of `span`.
    pub loc: Location,

    /// The diagnostic message.
    pub message: String,

    /// Severity level.
    #[serde(default)]
    pub severity: Severity,

    /// Optional free-form hint shown next to the message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Edits that fix the finding; empty when not fixable.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub edits: Vec<TextEdit>,
}

impl Diagnostic {
    /// Creates a new diagnostic with `Error` severity and no fix.
    pub fn new(
        rule_id: impl Into<String>,
        rule_name: impl Into<String>,
        message: impl Into<String>,
        span: Span,
        loc: Location,
    ) -> Self {
        Self {
            rule_id: rule_id.into(),
            rule_name: rule_name.into(),
            span,
            loc,
            message: message.into(),
            severity: Severity::Error,
            suggestion: None,
            edits: Vec::new(),
        }
    }

    /// Sets the severity level.
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Sets a suggestion.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attaches fix edits.
    pub fn with_edits(mut self, edits: Vec<TextEdit>) -> Self {
        self.edits = edits;
        self
    }

    /// Returns true if the diagnostic carries a fix.
    pub fn is_fixable(&self) -> bool {
        !self.edits.is_empty()
    }

    /// Ordering used for reports: position first, then rule, then message.
    pub fn sort_key(&self) -> (u32, u32, &str, &str) {
        (self.span.start, self.span.end, &self.rule_id, &self.message)
    }
}

/// Sorts diagnostics by [`Diagnostic::sort_key`] and drops exact duplicates.
pub fn sort_and_dedup(diagnostics: &mut Vec<Diagnostic>) {
    diagnostics.sort_by(|a, b| a.sort_key().cmp(&b.sort_key()));
    diagnostics.dedup();
}
