//! Ordered in-memory quote collection backed by a persisted blob

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use super::{BlobStore, QUOTES_KEY};
use crate::error::{Error, Result};
use crate::models::{Origin, QuoteId, QuoteRecord, StoredQuote, LOCAL_ID_PREFIX, REMOTE_ID_PREFIX};
use crate::util::normalize_text_option;

const SEED_QUOTES: [(&str, &str); 5] = [
    (
        "The best way to get started is to quit talking and begin doing.",
        "Motivation",
    ),
    (
        "Don\u{2019}t let yesterday take up too much of today.",
        "Motivation",
    ),
    (
        "Your time is limited, so don\u{2019}t waste it living someone else\u{2019}s life.",
        "Life",
    ),
    (
        "If life were predictable it would cease to be life, and be without flavor.",
        "Life",
    ),
    (
        "The greatest glory in living lies not in never falling, but in rising every time we fall.",
        "Inspiration",
    ),
];

/// The fixed starter collection used when nothing (valid) is persisted
#[must_use]
pub fn seed_quotes() -> Vec<QuoteRecord> {
    SEED_QUOTES
        .iter()
        .map(|(text, category)| QuoteRecord::new_local(*text, *category))
        .collect()
}

/// Counts produced by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Records with ids new to the store
    pub added: usize,
    /// Existing records replaced in place
    pub replaced: usize,
}

/// Quote collection in insertion order.
///
/// Mutating methods that are complete operations persist before returning.
/// Lower-level mutators (`insert`, `get_mut`) leave persisting to the caller,
/// which must call [`RecordStore::save`] before the change is durable.
pub struct RecordStore {
    blobs: Arc<dyn BlobStore>,
    records: Vec<QuoteRecord>,
}

impl RecordStore {
    /// Restore the collection from the blob store.
    ///
    /// A missing or unreadable blob is replaced by the seed set, which is
    /// written back immediately.
    pub fn load(blobs: Arc<dyn BlobStore>) -> Result<Self> {
        let restored = match blobs.get(QUOTES_KEY)? {
            Some(raw) => match decode_records(&raw) {
                Ok(records) => Some(records),
                Err(error) => {
                    tracing::warn!("Stored quotes are corrupt, reseeding: {}", error);
                    None
                }
            },
            None => None,
        };

        let store = if let Some(records) = restored {
            tracing::info!("Loaded {} quotes from storage", records.len());
            Self { blobs, records }
        } else {
            let store = Self {
                blobs,
                records: seed_quotes(),
            };
            store.save()?;
            store
        };
        Ok(store)
    }

    /// Persist the full collection, overwriting prior state
    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.records)?;
        self.blobs.put(QUOTES_KEY, &raw)
    }

    pub fn records(&self) -> &[QuoteRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &QuoteId) -> Option<&QuoteRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn get_mut(&mut self, id: &QuoteId) -> Option<&mut QuoteRecord> {
        self.records.iter_mut().find(|record| &record.id == id)
    }

    /// Append a record without persisting. The caller guarantees the id is new.
    pub fn insert(&mut self, record: QuoteRecord) {
        debug_assert!(self.get(&record.id).is_none(), "duplicate id {}", record.id);
        self.records.push(record);
    }

    /// Position of every record by id
    pub fn index(&self) -> HashMap<QuoteId, usize> {
        self.records
            .iter()
            .enumerate()
            .map(|(position, record)| (record.id.clone(), position))
            .collect()
    }

    pub(crate) fn record_at_mut(&mut self, position: usize) -> Option<&mut QuoteRecord> {
        self.records.get_mut(position)
    }

    /// Author a new local record and persist it
    pub fn add(&mut self, text: &str, category: &str) -> Result<QuoteRecord> {
        let text = normalize_text_option(Some(text.to_string()))
            .ok_or_else(|| Error::InvalidInput("quote text cannot be empty".to_string()))?;
        let category = normalize_text_option(Some(category.to_string()))
            .ok_or_else(|| Error::InvalidInput("quote category cannot be empty".to_string()))?;

        let record = QuoteRecord::new_local(text, category);
        self.records.push(record.clone());
        self.save()?;
        Ok(record)
    }

    /// Upsert a batch of records by id, then persist once
    pub fn upsert_batch(&mut self, batch: Vec<QuoteRecord>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();
        let mut index = self.index();

        for record in batch {
            if let Some(&position) = index.get(&record.id) {
                self.records[position] = record;
                summary.replaced += 1;
            } else {
                index.insert(record.id.clone(), self.records.len());
                self.records.push(record);
                summary.added += 1;
            }
        }

        self.save()?;
        Ok(summary)
    }

    /// Distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        self.records
            .iter()
            .map(|record| record.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Records in the given category, or all of them for `None`
    pub fn filtered(&self, category: Option<&str>) -> Vec<QuoteRecord> {
        self.records
            .iter()
            .filter(|record| category.is_none_or(|category| record.category == category))
            .cloned()
            .collect()
    }

    /// Local records that still need to be pushed
    pub fn pending_push(&self) -> Vec<QuoteRecord> {
        self.records
            .iter()
            .filter(|record| record.is_pending_push())
            .cloned()
            .collect()
    }

    /// Mark the given records as confirmed on the remote side, without persisting.
    ///
    /// Returns how many records were found.
    pub fn mark_synced(&mut self, ids: &[QuoteId]) -> usize {
        let ids = ids.iter().collect::<HashSet<_>>();
        let mut marked = 0;
        for record in &mut self.records {
            if ids.contains(&record.id) {
                record.synced = true;
                marked += 1;
            }
        }
        marked
    }
}

/// Decode a persisted collection, filling in fields older shapes lack.
///
/// Missing ids become `local-legacy-N` / `remote-legacy-N` from the record's
/// position, and duplicate ids keep their first occurrence.
pub(crate) fn decode_records(raw: &str) -> serde_json::Result<Vec<QuoteRecord>> {
    let stored = serde_json::from_str::<Vec<StoredQuote>>(raw)?;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(stored.len());

    for (position, quote) in stored.into_iter().enumerate() {
        let record = quote.into_record(
            |origin| {
                let prefix = match origin {
                    Origin::Local => LOCAL_ID_PREFIX,
                    Origin::Remote => REMOTE_ID_PREFIX,
                };
                QuoteId::from(format!("{prefix}-legacy-{position}"))
            },
            |origin| origin == Origin::Remote,
        );

        if seen.insert(record.id.clone()) {
            records.push(record);
        } else {
            tracing::warn!("Dropping duplicate stored quote {}", record.id);
        }
    }

    Ok(records)
}
