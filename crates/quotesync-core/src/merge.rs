//! Merge engine: folds a batch of remote records into the local collection

use serde::Serialize;

use crate::conflicts::ConflictQueue;
use crate::error::Result;
use crate::models::{Origin, QuoteRecord};
use crate::store::RecordStore;
use crate::sync::ConflictPolicy;

/// Counts produced by one merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeOutcome {
    /// Remote records with ids new to the store
    pub added: usize,
    /// Local records overwritten by remote content
    pub updated: usize,
    /// Shared ids whose content differed
    pub conflicts_found: usize,
}

/// Merge `batch` into `store`, recording divergences in `conflicts`.
///
/// Content equality compares text and category only. Under
/// [`ConflictPolicy::RemoteWins`] every divergence is settled in favour of
/// the remote record; under [`ConflictPolicy::Manual`] the local record is
/// left untouched and the divergence is queued once per id. The store and
/// the queue are persisted afterwards, whether or not anything changed.
pub fn merge_remote_batch(
    store: &mut RecordStore,
    conflicts: &mut ConflictQueue,
    batch: Vec<QuoteRecord>,
    policy: ConflictPolicy,
) -> Result<MergeOutcome> {
    let mut outcome = MergeOutcome::default();
    let mut index = store.index();

    for incoming in batch {
        let Some(&position) = index.get(&incoming.id) else {
            tracing::debug!("Adding remote quote {}", incoming.id);
            index.insert(incoming.id.clone(), store.len());
            store.insert(incoming);
            outcome.added += 1;
            continue;
        };
        let Some(local) = store.record_at_mut(position) else {
            continue;
        };

        if local.same_content(&incoming) {
            local.synced = true;
            local.origin = Origin::Remote;
            continue;
        }

        outcome.conflicts_found += 1;
        match policy {
            ConflictPolicy::RemoteWins => {
                tracing::debug!("Remote wins for {}", incoming.id);
                conflicts.record_remote_wins(local, &incoming);
                local.adopt(&incoming);
                outcome.updated += 1;
            }
            ConflictPolicy::Manual => {
                if conflicts.queue(local, &incoming) {
                    tracing::debug!("Queued conflict for {}", incoming.id);
                }
            }
        }
    }

    store.save()?;
    conflicts.save()?;
    Ok(outcome)
}
