//! Error taxonomy for store operations
//!
//! Every store operation resolves to one of three canonical outcomes:
//! success, `NotFound`, or `AlreadyExists` (expected data, not faults),
//! plus `Unavailable` for unrecoverable backing-store faults.
//! No raw I/O or serialization error escapes the storage layer unclassified.
//!
//! The transport adapter owns the user-visible mapping: `NotFound` → 404,
//! `AlreadyExists` → 400, `Unavailable` → 5xx. No status code lives here.

use crate::types::DocumentId;
use std::io;
use thiserror::Error;

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Canonical store outcomes
#[derive(Debug, Error)]
pub enum StoreError {
    /// The operation targeted an id that is not present in its collection
    #[error("not found: {0}")]
    NotFound(DocumentId),

    /// A create targeted an id already present in its collection
    #[error("already exists: {0}")]
    AlreadyExists(DocumentId),

    /// The backing store itself failed; terminal for the request, not the
    /// process; later requests may still succeed
    #[error("storage unavailable: {0}")]
    Unavailable(#[from] Fault),
}

impl StoreError {
    /// True for the expected, recoverable-by-caller outcomes
    pub fn is_client_outcome(&self) -> bool {
        matches!(self, StoreError::NotFound(_) | StoreError::AlreadyExists(_))
    }
}

/// Unrecoverable backing-store faults
#[derive(Debug, Error)]
pub enum Fault {
    /// I/O failure against the backing file
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Commit-log record could not be serialized or deserialized
    #[error("encoding error: {0}")]
    Encoding(String),

    /// The backing file holds data the store cannot trust
    #[error("data corruption: {0}")]
    Corruption(String),

    /// Another process holds the data directory
    #[error("data directory locked: {0}")]
    Locked(String),
}

impl From<bincode::Error> for Fault {
    fn from(e: bincode::Error) -> Self {
        Fault::Encoding(e.to_string())
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Unavailable(Fault::Io(e))
    }
}

impl From<bincode::Error> for StoreError {
    fn from(e: bincode::Error) -> Self {
        StoreError::Unavailable(Fault::from(e))
    }
}
