//! Error types for quotesync-core

use thiserror::Error;

use crate::remote::FetchError;

/// Result type alias using quotesync-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in quotesync-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// SQLite blob store error
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// No pending conflict for the given record id
    #[error("No pending conflict for record: {0}")]
    ConflictNotFound(String),

    /// Malformed import payload; the store is left unchanged
    #[error("Invalid import format: {0}")]
    ImportFormat(String),

    /// Remote fetch failed
    #[error(transparent)]
    Fetch(#[from] FetchError),
}
