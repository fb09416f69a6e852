//! Parse error types.

use thiserror::Error;

/// Why a file could not be turned into a tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The Markdown front-end rejected the text.
    #[error("Malformed markdown: {message}")]
    Syntax {
        message: String,
        /// Byte offset of the problem, if the front-end reported one.
        offset: Option<usize>,
    },

    /// The file bytes are not UTF-8.
    #[error("Invalid UTF-8 at byte {offset}")]
    InvalidUtf8 {
        /// Length of the valid prefix.
        offset: usize,
    },

    /// Offsets are `u32`, so larger inputs cannot be represented.
    #[error("Source is {len} bytes, larger than the 4 GiB limit")]
    TooLarge { len: usize },
}

impl ParseError {
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
            offset: None,
        }
    }

    /// Byte offset of the problem, when known.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Self::Syntax { offset, .. } => *offset,
            Self::InvalidUtf8 { offset } => Some(*offset),
            Self::TooLarge { .. } => None,
        }
    }
}
