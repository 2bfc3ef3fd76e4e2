//! Quote record model

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Id prefix for records authored on this device.
pub const LOCAL_ID_PREFIX: &str = "local";
/// Id prefix for records that originate from the remote source.
pub const REMOTE_ID_PREFIX: &str = "remote";

/// Stable identifier of a quote record.
///
/// Local ids embed a UUID v7; remote ids are derived from the remote
/// identifier so the same remote item maps to the same id on every sync.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(String);

impl QuoteId {
    /// Create a fresh id for a locally authored record
    #[must_use]
    pub fn local() -> Self {
        Self(format!("{LOCAL_ID_PREFIX}-{}", Uuid::now_v7()))
    }

    /// Derive the id of a remote item from its remote identifier
    #[must_use]
    pub fn remote(identifier: impl fmt::Display) -> Self {
        Self(format!("{REMOTE_ID_PREFIX}-{identifier}"))
    }

    /// Get the string representation of this ID
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this id lives in the remote namespace
    #[must_use]
    pub fn is_remote(&self) -> bool {
        self.0
            .strip_prefix(REMOTE_ID_PREFIX)
            .is_some_and(|rest| rest.starts_with('-'))
    }
}

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QuoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Where a record's content last came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    /// Authored or imported on this device
    #[default]
    Local,
    /// Fetched from the remote source
    #[serde(alias = "server")]
    Remote,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// A quote in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRecord {
    /// Unique identifier within the store
    pub id: QuoteId,
    /// Quote text
    pub text: String,
    /// Free-form category label
    pub category: String,
    /// Last modification time. Advisory only; never used to pick a winner.
    pub updated_at: DateTime<Utc>,
    /// Provenance of the current content
    pub origin: Origin,
    /// True iff the current content is confirmed present on the remote side
    pub synced: bool,
}

impl QuoteRecord {
    /// Create a new unsynced local record
    #[must_use]
    pub fn new_local(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: QuoteId::local(),
            text: text.into(),
            category: category.into(),
            updated_at: Utc::now(),
            origin: Origin::Local,
            synced: false,
        }
    }

    /// Create a record for a remote item, already confirmed synced
    #[must_use]
    pub fn from_remote(
        identifier: impl fmt::Display,
        text: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: QuoteId::remote(identifier),
            text: text.into(),
            category: category.into(),
            updated_at: Utc::now(),
            origin: Origin::Remote,
            synced: true,
        }
    }

    /// Whether both records carry the same text and category
    #[must_use]
    pub fn same_content(&self, other: &Self) -> bool {
        self.text == other.text && self.category == other.category
    }

    /// Local edit that has not been pushed yet
    #[must_use]
    pub fn is_pending_push(&self) -> bool {
        self.origin == Origin::Local && !self.synced
    }

    /// Overwrite the mutable fields with `other`'s, keeping this record's id
    pub fn adopt(&mut self, other: &Self) {
        self.text.clone_from(&other.text);
        self.category.clone_from(&other.category);
        self.updated_at = other.updated_at;
        self.origin = other.origin;
        self.synced = other.synced;
    }
}

/// Lenient on-disk shape of a quote.
///
/// Older blobs and hand-written import files may lack any of these fields,
/// or use `source` instead of `origin`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredQuote {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default, alias = "source")]
    pub origin: Option<Origin>,
    #[serde(default)]
    pub synced: Option<bool>,
}

impl StoredQuote {
    /// Origin of the stored shape, defaulting to local
    #[must_use]
    pub fn origin(&self) -> Origin {
        self.origin.unwrap_or_default()
    }

    /// Fill in missing fields and produce a full record.
    ///
    /// `fallback_id` and `default_synced` are only consulted when the
    /// corresponding field is absent.
    pub fn into_record(
        self,
        fallback_id: impl FnOnce(Origin) -> QuoteId,
        default_synced: impl FnOnce(Origin) -> bool,
    ) -> QuoteRecord {
        let origin = self.origin();
        let id = crate::util::normalize_text_option(self.id)
            .map_or_else(|| fallback_id(origin), QuoteId::from);
        let updated_at = self
            .updated_at
            .as_deref()
            .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
            .map(|parsed| parsed.with_timezone(&Utc))
            .unwrap_or_default();

        QuoteRecord {
            id,
            text: self.text.unwrap_or_default(),
            category: self.category.unwrap_or_default(),
            updated_at,
            origin,
            synced: self.synced.unwrap_or_else(|| default_synced(origin)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_ids_unique_and_namespaced() {
        let id1 = QuoteId::local();
        let id2 = QuoteId::local();
        assert_ne!(id1, id2);
        assert!(id1.as_str().starts_with("local-"));
        assert!(!id1.is_remote());
    }

    #[test]
    fn test_remote_id_is_deterministic() {
        assert_eq!(QuoteId::remote(9), QuoteId::remote(9));
        assert_eq!(QuoteId::remote(9).as_str(), "remote-9");
        assert!(QuoteId::remote(9).is_remote());
        assert!(!QuoteId::from("remoteish").is_remote());
    }

    #[test]
    fn test_new_local_is_pending_push() {
        let quote = QuoteRecord::new_local("A", "X");
        assert_eq!(quote.origin, Origin::Local);
        assert!(!quote.synced);
        assert!(quote.is_pending_push());
    }

    #[test]
    fn test_adopt_keeps_id() {
        let mut local = QuoteRecord::new_local("A", "X");
        let remote = QuoteRecord::from_remote(3, "B", "Y");
        let id = local.id.clone();

        local.adopt(&remote);
        assert_eq!(local.id, id);
        assert!(local.same_content(&remote));
        assert_eq!(local.origin, Origin::Remote);
        assert!(local.synced);
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let quote = QuoteRecord::from_remote(1, "text", "cat");
        let json = serde_json::to_value(&quote).unwrap();
        assert_eq!(json["id"], "remote-1");
        assert_eq!(json["origin"], "remote");
        assert!(json.get("updatedAt").is_some());
    }

    #[test]
    fn test_stored_quote_accepts_legacy_source_field() {
        let stored: StoredQuote =
            serde_json::from_str(r#"{"text":"t","category":"c","source":"server"}"#).unwrap();
        assert_eq!(stored.origin(), Origin::Remote);

        let record = stored.into_record(|_| QuoteId::from("remote-legacy-0"), |origin| {
            origin == Origin::Remote
        });
        assert_eq!(record.id.as_str(), "remote-legacy-0");
        assert!(record.synced);
        assert_eq!(record.updated_at, DateTime::<Utc>::default());
    }

    #[test]
    fn test_stored_quote_keeps_present_fields() {
        let stored: StoredQuote = serde_json::from_str(
            r#"{"id":"local-7","text":"t","category":"c","updatedAt":"2024-05-01T10:00:00Z","origin":"local","synced":true}"#,
        )
        .unwrap();
        let record = stored.into_record(|_| QuoteId::local(), |_| false);

        assert_eq!(record.id.as_str(), "local-7");
        assert!(record.synced);
        assert_eq!(record.updated_at.to_rfc3339(), "2024-05-01T10:00:00+00:00");
    }
}
