//! Dataset Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A dataset error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for dataset operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset file does not exist.
    #[display("dataset not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
    /// Reading the file failed.
    #[display("I/O error")]
    Io,
    /// Compressed data is corrupt or truncated. Don't retry with the same file.
    #[display("invalid or corrupted data")]
    InvalidData,
    /// The decompressed content is not valid JSON.
    #[display("invalid JSON document")]
    InvalidJson,
    /// The JSON pointer does not resolve inside the document.
    #[display("nothing at JSON pointer: {_0}")]
    PointerNotFound(#[error(not(source))] String),
    /// The requested format is not supported.
    #[display("unsupported format: {_0}")]
    UnsupportedFormat(#[error(not(source))] String),
    /// The requested format is supported but not enabled.
    #[display("disabled format: {_0}")]
    DisabledFormat(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::InvalidData.to_string(), "invalid or corrupted data");
        assert_eq!(ErrorKind::UnsupportedFormat("zip".to_string()).to_string(), "unsupported format: zip");
        assert_eq!(ErrorKind::PointerNotFound("/data".to_string()).to_string(), "nothing at JSON pointer: /data");
        assert_eq!(
            ErrorKind::NotFound(PathBuf::from("AllPrintings.json")).to_string(),
            "dataset not found: AllPrintings.json"
        );
    }

    #[test]
    fn error_kind_retryable() {
        assert!(ErrorKind::Io.is_retryable());
        assert!(!ErrorKind::InvalidJson.is_retryable());
        assert!(!ErrorKind::DisabledFormat("xz".to_string()).is_retryable());
    }
}
