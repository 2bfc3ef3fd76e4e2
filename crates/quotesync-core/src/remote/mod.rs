//! Remote adapter boundary.
//!
//! Adapters only move records across the wire; they never merge. Fetched
//! records arrive tagged `origin = remote, synced = true` with ids derived
//! from the remote identifier.

mod http;
mod memory;

use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{QuoteId, QuoteRecord};

pub use http::HttpRemote;
pub use memory::InMemoryRemote;

/// Fetching a batch failed; aborts the current sync cycle
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(String),
    #[error("Remote request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Server fetch failed ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("Invalid remote payload: {0}")]
    InvalidPayload(String),
    #[error("Remote unavailable: {0}")]
    Unavailable(String),
}

/// Pushing a single record failed; the record stays unsynced
#[derive(Debug, Error)]
pub enum PushItemError {
    #[error("Push request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Push rejected ({status}): {message}")]
    Status { status: u16, message: String },
    #[error("Push rejected: {0}")]
    Rejected(String),
}

/// Remote item identifier; numeric or textual on the wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RemoteIdentifier {
    Number(u64),
    Text(String),
}

impl fmt::Display for RemoteIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

/// An item as served by the remote source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteItem {
    #[serde(rename = "id")]
    pub identifier: RemoteIdentifier,
    #[serde(rename = "title", default)]
    pub title_text: String,
    #[serde(rename = "userId", default)]
    pub group_key: Option<RemoteIdentifier>,
}

impl RemoteItem {
    /// Map the wire item into a synced remote record
    #[must_use]
    pub fn into_record(self) -> QuoteRecord {
        let category = self
            .group_key
            .map_or_else(|| "Remote".to_string(), |group| format!("Remote Cat {group}"));
        QuoteRecord::from_remote(self.identifier, self.title_text.trim(), category)
    }
}

/// Transport to the authoritative remote collection
pub trait RemoteAdapter: Send + Sync {
    /// Fetch at most `limit` remote records
    fn fetch_batch(
        &self,
        limit: usize,
    ) -> impl Future<Output = Result<Vec<QuoteRecord>, FetchError>> + Send;

    /// Push one local record. `Ok` means the remote confirmed it.
    fn push_record(
        &self,
        record: &QuoteRecord,
    ) -> impl Future<Output = Result<(), PushItemError>> + Send;
}

/// Push each record independently and return the ids the remote confirmed.
///
/// A failure is logged and skipped; it never stops the remaining pushes and
/// is not retried here.
pub async fn push_local_batch<R: RemoteAdapter>(remote: &R, records: &[QuoteRecord]) -> Vec<QuoteId> {
    let mut confirmed = Vec::with_capacity(records.len());
    for record in records {
        match remote.push_record(record).await {
            Ok(()) => confirmed.push(record.id.clone()),
            Err(error) => tracing::warn!("Failed to push quote {}: {}", record.id, error),
        }
    }
    confirmed
}
