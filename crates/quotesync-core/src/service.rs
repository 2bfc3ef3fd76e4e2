//! Quote service: the single owner of engine state.
//!
//! Presentation layers construct one [`QuoteService`], read through its
//! accessors, and act through its command methods. State-change
//! notifications are published on `tokio::sync::watch` channels.

use std::ops::ControlFlow;
use std::sync::Arc;

use chrono::Utc;
use rand::seq::SliceRandom;
use tokio::sync::{watch, Mutex};

use crate::config::SyncConfig;
use crate::conflicts::ConflictQueue;
use crate::error::Result;
use crate::export::{parse_import, render_json_export};
use crate::merge::merge_remote_batch;
use crate::models::{
    ConflictEntry, Preferences, QuoteId, QuoteRecord, Resolution, ResolutionChoice,
    ALL_CATEGORIES,
};
use crate::remote::{push_local_batch, RemoteAdapter};
use crate::store::{BlobStore, ImportSummary, PreferencesRepository, RecordStore};
use crate::sync::{
    format_sync_timestamp, ConflictPolicy, PeriodicHandle, SyncPhase, SyncReport, SyncSummary,
};

struct EngineState {
    records: RecordStore,
    conflicts: ConflictQueue,
    preferences: Preferences,
}

/// Offline-first quote collection synchronised against a remote adapter
pub struct QuoteService<R> {
    remote: R,
    config: SyncConfig,
    preferences_repo: PreferencesRepository,
    state: Mutex<EngineState>,
    /// Held for the whole of a sync cycle; at most one cycle runs at a time.
    cycle: Mutex<()>,
    periodic: Mutex<Option<PeriodicHandle>>,
    phase: watch::Sender<SyncPhase>,
    revision: watch::Sender<u64>,
    /// Outcome of the most recent cycle that actually ran
    last_report: watch::Sender<Option<SyncReport>>,
}

impl<R: RemoteAdapter> QuoteService<R> {
    /// Load the collection, conflict history, and preferences from `blobs`
    pub fn open(blobs: Arc<dyn BlobStore>, remote: R, config: SyncConfig) -> Result<Self> {
        config.validate()?;

        let records = RecordStore::load(Arc::clone(&blobs))?;
        let conflicts = ConflictQueue::load(Arc::clone(&blobs))?;
        let preferences_repo = PreferencesRepository::new(blobs);
        let preferences = preferences_repo.load()?;

        Ok(Self {
            remote,
            config,
            preferences_repo,
            state: Mutex::new(EngineState {
                records,
                conflicts,
                preferences,
            }),
            cycle: Mutex::new(()),
            periodic: Mutex::new(None),
            phase: watch::channel(SyncPhase::Idle).0,
            revision: watch::channel(0).0,
            last_report: watch::channel(None).0,
        })
    }

    pub const fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub const fn remote(&self) -> &R {
        &self.remote
    }

    /// Current cycle phase
    pub fn phase(&self) -> SyncPhase {
        *self.phase.borrow()
    }

    /// Observe cycle phase transitions
    pub fn subscribe_phase(&self) -> watch::Receiver<SyncPhase> {
        self.phase.subscribe()
    }

    /// Observe persisted mutations; the value increases after each one
    pub fn subscribe_changes(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Observe the report of every finished cycle, periodic ones included
    pub fn subscribe_reports(&self) -> watch::Receiver<Option<SyncReport>> {
        self.last_report.subscribe()
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.send_replace(phase);
    }

    fn notify_changed(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }

    // ----------------------------------------------------------------------
    // Read accessors
    // ----------------------------------------------------------------------

    /// Every record, in store order
    pub async fn records(&self) -> Vec<QuoteRecord> {
        self.state.lock().await.records.records().to_vec()
    }

    /// Distinct categories, sorted
    pub async fn categories(&self) -> Vec<String> {
        self.state.lock().await.records.categories()
    }

    /// Records in `category`, or all records for `None`
    pub async fn filtered_records(&self, category: Option<&str>) -> Vec<QuoteRecord> {
        self.state.lock().await.records.filtered(category)
    }

    /// A random record in `category` (`None` or `All` picks from every
    /// record), `None` when there is nothing to pick from
    pub async fn random_record(&self, category: Option<&str>) -> Option<QuoteRecord> {
        let category = category.filter(|category| *category != ALL_CATEGORIES);
        let candidates = self.filtered_records(category).await;
        candidates.choose(&mut rand::thread_rng()).cloned()
    }

    /// Records matching the persisted category filter
    pub async fn visible_records(&self) -> Vec<QuoteRecord> {
        let state = self.state.lock().await;
        state.records.filtered(state.preferences.category_filter())
    }

    /// Local records waiting to be pushed
    pub async fn pending_push_count(&self) -> usize {
        self.state.lock().await.records.pending_push().len()
    }

    /// Unresolved conflicts in detection order
    pub async fn pending_conflicts(&self) -> Vec<ConflictEntry> {
        self.state.lock().await.conflicts.pending()
    }

    /// Every conflict entry, resolved ones included
    pub async fn conflict_history(&self) -> Vec<ConflictEntry> {
        self.state.lock().await.conflicts.history().to_vec()
    }

    pub async fn preferences(&self) -> Preferences {
        self.state.lock().await.preferences.clone()
    }

    /// Persisted category filter, `None` when unfiltered
    pub async fn selected_category(&self) -> Option<String> {
        self.state
            .lock()
            .await
            .preferences
            .category_filter()
            .map(str::to_string)
    }

    pub async fn last_sync(&self) -> Option<String> {
        self.state.lock().await.preferences.last_sync.clone()
    }

    pub async fn auto_sync_enabled(&self) -> bool {
        self.state.lock().await.preferences.auto_sync
    }

    // ----------------------------------------------------------------------
    // Commands
    // ----------------------------------------------------------------------

    /// Author a new local record
    pub async fn add_record(&self, text: &str, category: &str) -> Result<QuoteRecord> {
        let record = self.state.lock().await.records.add(text, category)?;
        tracing::info!("Added quote {}", record.id);
        self.notify_changed();
        Ok(record)
    }

    /// Import a JSON array of records. A malformed payload leaves the store
    /// unchanged.
    pub async fn import_batch(&self, payload: &str) -> Result<ImportSummary> {
        let batch = parse_import(payload)?;
        let summary = self.state.lock().await.records.upsert_batch(batch)?;
        tracing::info!(
            "Imported quotes: {} added, {} replaced",
            summary.added,
            summary.replaced
        );
        self.notify_changed();
        Ok(summary)
    }

    /// Pretty JSON snapshot of the full collection
    pub async fn export_snapshot(&self) -> Result<String> {
        let state = self.state.lock().await;
        Ok(render_json_export(state.records.records())?)
    }

    /// Persist the category filter (`None` clears it)
    pub async fn set_selected_category(&self, category: Option<&str>) -> Result<()> {
        let mut state = self.state.lock().await;
        self.preferences_repo.save_selected_category(category)?;
        state.preferences.selected_category = category.map(str::to_string);
        Ok(())
    }

    /// Resolve the pending conflict for `id`
    pub async fn resolve_conflict(
        &self,
        id: &QuoteId,
        choice: ResolutionChoice,
    ) -> Result<Resolution> {
        let resolution = {
            let mut state = self.state.lock().await;
            let EngineState {
                records, conflicts, ..
            } = &mut *state;
            conflicts.resolve_one(records, id, choice)?
        };
        self.notify_changed();
        Ok(resolution)
    }

    /// Resolve every pending conflict the same way. Returns how many were
    /// resolved; with nothing pending this is a no-op.
    pub async fn resolve_all_conflicts(&self, choice: ResolutionChoice) -> Result<usize> {
        let resolved = {
            let mut state = self.state.lock().await;
            let EngineState {
                records, conflicts, ..
            } = &mut *state;
            conflicts.resolve_all(records, choice)?
        };
        if resolved > 0 {
            tracing::info!("Resolved {} conflicts", resolved);
            self.notify_changed();
        }
        Ok(resolved)
    }

    // ----------------------------------------------------------------------
    // Sync cycles
    // ----------------------------------------------------------------------

    /// Run one push → fetch → merge → summarize cycle.
    ///
    /// Returns [`SyncReport::Skipped`] when another cycle is in flight.
    /// Failures abort the remaining steps, keep whatever earlier steps
    /// persisted, and come back as [`SyncReport::Failed`].
    pub async fn sync_now(&self, policy: ConflictPolicy) -> SyncReport {
        let Ok(_cycle) = self.cycle.try_lock() else {
            tracing::info!("Sync already in progress, skipping request");
            return SyncReport::Skipped;
        };

        tracing::info!("Starting sync cycle ({})", policy);
        let report = match self.run_cycle(policy).await {
            Ok(report) => report,
            Err(error) => {
                tracing::warn!("Sync cycle failed: {}", error);
                self.set_phase(SyncPhase::Failed);
                SyncReport::Failed {
                    message: format!("Sync failed: {error}"),
                }
            }
        };
        self.set_phase(SyncPhase::Idle);
        tracing::info!("{}", report.describe());
        self.last_report.send_replace(Some(report.clone()));
        report
    }

    async fn run_cycle(&self, policy: ConflictPolicy) -> Result<SyncReport> {
        self.set_phase(SyncPhase::Pushing);
        let unsynced = self.state.lock().await.records.pending_push();
        let confirmed = push_local_batch(&self.remote, &unsynced).await;
        if !confirmed.is_empty() {
            let mut state = self.state.lock().await;
            state.records.mark_synced(&confirmed);
            state.records.save()?;
            self.notify_changed();
        }

        self.set_phase(SyncPhase::Fetching);
        let batch = self.remote.fetch_batch(self.config.batch_size).await?;

        self.set_phase(SyncPhase::Merging);
        let outcome = {
            let mut state = self.state.lock().await;
            let EngineState {
                records, conflicts, ..
            } = &mut *state;
            merge_remote_batch(records, conflicts, batch, policy)?
        };
        self.notify_changed();

        self.set_phase(SyncPhase::Summarizing);
        let last_sync = format_sync_timestamp(Utc::now());
        {
            let mut state = self.state.lock().await;
            self.preferences_repo.save_last_sync(Some(&last_sync))?;
            state.preferences.last_sync = Some(last_sync.clone());
        }

        Ok(SyncReport::Completed {
            summary: SyncSummary::new(confirmed.len(), outcome),
            last_sync,
        })
    }
}

impl<R: RemoteAdapter + 'static> QuoteService<R> {
    /// Start periodic remote-wins cycles, replacing any running timer
    pub async fn start_periodic(self: &Arc<Self>) {
        let mut periodic = self.periodic.lock().await;
        if let Some(existing) = periodic.take() {
            existing.stop();
        }

        let service = Arc::downgrade(self);
        let handle = PeriodicHandle::spawn(self.config.sync_interval, move || {
            let service = service.clone();
            async move {
                let Some(service) = service.upgrade() else {
                    return ControlFlow::Break(());
                };
                service.sync_now(ConflictPolicy::RemoteWins).await;
                ControlFlow::Continue(())
            }
        });
        *periodic = Some(handle);
        tracing::info!(
            "Periodic sync started (every {}s)",
            self.config.sync_interval.as_secs()
        );
    }

    /// Stop periodic cycles. A cycle already running is not interrupted.
    /// Returns whether a timer was running; calling it again is harmless.
    pub async fn stop_periodic(&self) -> bool {
        let Some(handle) = self.periodic.lock().await.take() else {
            return false;
        };
        handle.stop();
        tracing::info!("Periodic sync stopped");
        true
    }

    pub async fn is_periodic_running(&self) -> bool {
        self.periodic
            .lock()
            .await
            .as_ref()
            .is_some_and(PeriodicHandle::is_running)
    }

    /// Persist the auto-sync preference and start or stop periodic mode
    pub async fn set_auto_sync(self: &Arc<Self>, enabled: bool) -> Result<()> {
        {
            let mut state = self.state.lock().await;
            self.preferences_repo.save_auto_sync(enabled)?;
            state.preferences.auto_sync = enabled;
        }

        if enabled {
            self.start_periodic().await;
        } else {
            self.stop_periodic().await;
        }
        Ok(())
    }

    /// Start periodic mode when the persisted preference asks for it
    pub async fn restore_auto_sync(self: &Arc<Self>) -> bool {
        let enabled = self.auto_sync_enabled().await;
        if enabled {
            self.start_periodic().await;
        }
        enabled
    }
}
