//! Error taxonomy for store operations.
//!
//! Pure computations (statistics, chart shaping, formatting) never return
//! errors; everything here originates at the store boundary.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{RecordId, RecordKind};

/// Top-level error for journal store operations.
#[derive(Debug, Error)]
pub enum JournalError {
    #[error("{kind} '{id}' not found")]
    NotFound { kind: RecordKind, id: RecordId },
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("import rejected: {0}")]
    ImportFormat(#[from] ImportFormatError),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Malformed input reaching the store boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{field}: '{input}' is not a number")]
    NotANumber { field: &'static str, input: String },
    #[error("{field}: value must be finite")]
    NonFinite { field: &'static str },
    #[error("{field}: value must not be negative (got {value})")]
    Negative { field: &'static str, value: f64 },
    #[error("{field}: must not be empty")]
    Empty { field: &'static str },
}

/// An import artifact that fails structural, version or integrity checks.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImportFormatError {
    #[error("not a journal export: {0}")]
    Malformed(String),
    #[error("unrecognized format tag '{0}'")]
    UnknownFormat(String),
    #[error("unsupported schema version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error("checksum mismatch: artifact content was modified or truncated")]
    ChecksumMismatch,
    #[error("invalid record data: {0}")]
    InvalidRecord(String),
}

/// Failure of the underlying storage medium.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("stored journal at {path} is unreadable: {reason}")]
    Corrupt { path: PathBuf, reason: String },
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }
}
