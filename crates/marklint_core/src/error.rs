//! Linter error types.

use std::path::PathBuf;

use marklint_parser::ParseError;
use thiserror::Error;

use crate::edit::EditError;

/// File- and run-level errors.
///
/// Rule failures are not represented here: they are recorded per rule in
/// the pipeline result and never fail a file on their own.
#[derive(Debug, Error)]
pub enum LinterError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O error with context.
    #[error("File error: {0}")]
    File(String),

    /// The file could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// A rule produced an edit that does not fit the content.
    #[error("Invalid edit: {0}")]
    Edit(#[from] EditError),

    /// The backup copy could not be written, so the file was left untouched.
    #[error("Backup failed for {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The run was cancelled or its deadline passed.
    #[error("Cancelled")]
    Cancelled,

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl LinterError {
    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates a file error.
    pub fn file(message: impl Into<String>) -> Self {
        Self::File(message.into())
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Returns true if this error is a cancellation.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
