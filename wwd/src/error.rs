//! WWD decoding error types

use std::io;

/// Errors produced while decoding or encoding a level.
#[derive(Debug, thiserror::Error)]
pub enum WwdError {
    /// Bad magic, a field running past the end of the buffer, or a value
    /// outside its allowed range
    #[error("corrupt level: {0}")]
    Corrupt(String),

    /// A level file on disk could not be read
    #[error("level I/O error: {0}")]
    Io(#[from] io::Error),

    /// A [`Level`](crate::Level) is inconsistent and cannot be written
    #[error("cannot encode level: {0}")]
    Encode(String),
}

impl WwdError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        WwdError::Corrupt(reason.into())
    }

    /// Prefix a corruption message with the section it occurred in.
    pub fn within(self, section: impl std::fmt::Display) -> Self {
        match self {
            WwdError::Corrupt(reason) => WwdError::Corrupt(format!("{}: {}", section, reason)),
            other => other,
        }
    }
}
