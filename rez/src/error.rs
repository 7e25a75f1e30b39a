//! REZ archive error types

use std::io;

/// Errors produced while opening or reading a REZ archive.
#[derive(Debug, thiserror::Error)]
pub enum RezError {
    /// The archive file is missing, or no entry with this path exists in
    /// its directory
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad magic, truncated header, or a malformed directory
    #[error("corrupt archive: {0}")]
    Corrupt(String),

    /// The underlying file could not be read
    #[error("archive I/O error: {0}")]
    Io(#[from] io::Error),

    /// The archive was closed before this call
    #[error("archive is closed")]
    Closed,

    /// An archive could not be assembled by [`ArchiveBuilder`](crate::ArchiveBuilder)
    #[error("cannot build archive: {0}")]
    Build(String),
}

impl RezError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        RezError::Corrupt(reason.into())
    }

    /// Whether this is a lookup miss (callers may fall back to a default asset).
    pub fn is_not_found(&self) -> bool {
        matches!(self, RezError::NotFound(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            RezError::NotFound("levels/a.wwd".into()).to_string(),
            "not found: levels/a.wwd"
        );
        assert_eq!(
            RezError::corrupt("invalid magic").to_string(),
            "corrupt archive: invalid magic"
        );
        assert_eq!(RezError::Closed.to_string(), "archive is closed");
    }

    #[test]
    fn test_is_not_found() {
        assert!(RezError::NotFound("x".into()).is_not_found());
        assert!(!RezError::Closed.is_not_found());
    }
}
