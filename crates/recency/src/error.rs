//! Recency Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A recency error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for recency operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The dataset lacks a `meta` object, or its `date` or `version` field.
    #[display("missing dataset metadata: {_0}")]
    MissingMetadata(#[error(not(source))] &'static str),
    /// A metadata field is present but cannot be used.
    #[display("invalid dataset metadata '{field}', found value: {value}")]
    InvalidMetadata {
        /// The offending field, e.g. `meta.date`.
        field: &'static str,
        /// What was found instead.
        value: String,
    },
    /// The dataset document could not be read as JSON.
    #[display("unreadable dataset document")]
    InvalidDocument,
    /// A record, batch or table definition is malformed. Nothing was written.
    #[display("validation failed: {_0}")]
    Validation(#[error(not(source))] String),
    /// The store is unreachable, rejected the statement, or the commit failed.
    /// The transaction has been rolled back.
    #[display("database error")]
    Persistence,
    #[display("database migration error")]
    Migration,
    /// A persisted row could not be decoded.
    #[display("invalid recency data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence)
    }
}
