//! Sync conflict model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Origin, QuoteId, QuoteRecord};

/// Outcome recorded on a conflict entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Resolution {
    /// Awaiting a user decision
    #[default]
    Unresolved,
    /// Remote content was applied
    ResolvedRemote,
    /// Local content was kept
    ResolvedLocal,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unresolved => f.write_str("unresolved"),
            Self::ResolvedRemote => f.write_str("resolved-remote"),
            Self::ResolvedLocal => f.write_str("resolved-local"),
        }
    }
}

/// Which side a user picks when resolving a conflict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionChoice {
    Local,
    Remote,
}

impl From<ResolutionChoice> for Resolution {
    fn from(choice: ResolutionChoice) -> Self {
        match choice {
            ResolutionChoice::Local => Self::ResolvedLocal,
            ResolutionChoice::Remote => Self::ResolvedRemote,
        }
    }
}

/// A detected divergence between local and remote content for one id.
///
/// Entries are append-only history: resolving one updates its
/// `resolution`, it is never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConflictEntry {
    /// Record id in contention
    pub id: QuoteId,
    /// Local record as it was at detection time
    pub local: QuoteRecord,
    /// Incoming remote record
    pub remote: QuoteRecord,
    pub resolution: Resolution,
    pub detected_at: DateTime<Utc>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl ConflictEntry {
    /// Snapshot both sides into a new unresolved entry
    #[must_use]
    pub fn detect(local: &QuoteRecord, remote: &QuoteRecord) -> Self {
        Self {
            id: local.id.clone(),
            local: local.clone(),
            remote: remote.clone(),
            resolution: Resolution::Unresolved,
            detected_at: Utc::now(),
            resolved_at: None,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.resolution == Resolution::Unresolved
    }

    /// Mark this entry resolved
    pub fn close(&mut self, resolution: Resolution) {
        self.resolution = resolution;
        self.resolved_at = Some(Utc::now());
    }

    /// The record content to write back for `choice`.
    ///
    /// Keeping local content marks it unsynced again so the next cycle
    /// pushes it; taking remote content marks it confirmed.
    #[must_use]
    pub fn chosen(&self, choice: ResolutionChoice) -> QuoteRecord {
        let mut chosen = match choice {
            ResolutionChoice::Local => self.local.clone(),
            ResolutionChoice::Remote => self.remote.clone(),
        };
        chosen.id = self.id.clone();
        match choice {
            ResolutionChoice::Local => {
                chosen.origin = Origin::Local;
                chosen.synced = false;
            }
            ResolutionChoice::Remote => {
                chosen.origin = Origin::Remote;
                chosen.synced = true;
            }
        }
        chosen
    }
}
