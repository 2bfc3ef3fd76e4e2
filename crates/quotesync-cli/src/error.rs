use std::io;

use quotesync_core::remote::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] quotesync_core::Error),
    #[error(transparent)]
    Remote(#[from] FetchError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Quote text cannot be empty")]
    EmptyText,
    #[error("Sync interval must be at least one second")]
    InvalidInterval,
    #[error("{0}")]
    SyncFailed(String),
}
