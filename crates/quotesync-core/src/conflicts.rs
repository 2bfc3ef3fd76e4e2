//! Conflict queue: pending and resolved conflict entries in detection order

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::models::{ConflictEntry, QuoteId, QuoteRecord, Resolution, ResolutionChoice};
use crate::store::{BlobStore, RecordStore, CONFLICTS_KEY};

/// Append-only conflict history, persisted after every mutation.
///
/// At most one entry per record id is unresolved at any time.
pub struct ConflictQueue {
    blobs: Arc<dyn BlobStore>,
    entries: Vec<ConflictEntry>,
}

impl ConflictQueue {
    /// Restore the queue; an unreadable blob starts an empty history
    pub fn load(blobs: Arc<dyn BlobStore>) -> Result<Self> {
        let entries = match blobs.get(CONFLICTS_KEY)? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                tracing::warn!("Stored conflict history is corrupt, starting empty: {}", error);
                Vec::new()
            }),
            None => Vec::new(),
        };
        Ok(Self { blobs, entries })
    }

    pub fn save(&self) -> Result<()> {
        let raw = serde_json::to_string(&self.entries)?;
        self.blobs.put(CONFLICTS_KEY, &raw)
    }

    /// Unresolved entries in detection order
    pub fn pending(&self) -> Vec<ConflictEntry> {
        self.entries
            .iter()
            .filter(|entry| entry.is_pending())
            .cloned()
            .collect()
    }

    pub fn pending_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_pending()).count()
    }

    /// Every entry ever recorded, resolved ones included
    pub fn history(&self) -> &[ConflictEntry] {
        &self.entries
    }

    pub fn has_pending(&self, id: &QuoteId) -> bool {
        self.pending_position(id).is_some()
    }

    fn pending_position(&self, id: &QuoteId) -> Option<usize> {
        self.entries
            .iter()
            .position(|entry| entry.is_pending() && &entry.id == id)
    }

    /// Queue a divergence for manual review.
    ///
    /// Returns `false` when the id already has a pending entry, in which case
    /// nothing is appended.
    pub(crate) fn queue(&mut self, local: &QuoteRecord, remote: &QuoteRecord) -> bool {
        if self.has_pending(&local.id) {
            return false;
        }
        self.entries.push(ConflictEntry::detect(local, remote));
        true
    }

    /// Log a divergence that was settled automatically in favour of remote.
    ///
    /// A pending entry for the same id is closed too, since the record now
    /// matches remote.
    pub(crate) fn record_remote_wins(&mut self, local: &QuoteRecord, remote: &QuoteRecord) {
        if let Some(position) = self.pending_position(&local.id) {
            self.entries[position].close(Resolution::ResolvedRemote);
        }
        let mut entry = ConflictEntry::detect(local, remote);
        entry.close(Resolution::ResolvedRemote);
        self.entries.push(entry);
    }

    /// Resolve the pending conflict for `id`, write the chosen content into
    /// the store, and persist both.
    pub fn resolve_one(
        &mut self,
        store: &mut RecordStore,
        id: &QuoteId,
        choice: ResolutionChoice,
    ) -> Result<Resolution> {
        let position = self
            .pending_position(id)
            .ok_or_else(|| Error::ConflictNotFound(id.to_string()))?;

        let resolution = self.apply(store, position, choice);
        store.save()?;
        self.save()?;
        Ok(resolution)
    }

    /// Resolve every pending conflict with the same choice, in detection
    /// order, persisting once. Returns the number resolved; zero is a no-op.
    pub fn resolve_all(&mut self, store: &mut RecordStore, choice: ResolutionChoice) -> Result<usize> {
        let positions = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.is_pending())
            .map(|(position, _)| position)
            .collect::<Vec<_>>();

        if positions.is_empty() {
            return Ok(0);
        }

        for &position in &positions {
            self.apply(store, position, choice);
        }
        store.save()?;
        self.save()?;
        Ok(positions.len())
    }

    fn apply(&mut self, store: &mut RecordStore, position: usize, choice: ResolutionChoice) -> Resolution {
        let entry = &mut self.entries[position];
        let chosen = entry.chosen(choice);
        match store.get_mut(&entry.id) {
            Some(record) => *record = chosen,
            None => {
                tracing::warn!("Conflict {} refers to a missing record, restoring it", entry.id);
                store.insert(chosen);
            }
        }

        let resolution = Resolution::from(choice);
        entry.close(resolution);
        tracing::debug!("Resolved conflict {} as {}", entry.id, resolution);
        resolution
    }
}
