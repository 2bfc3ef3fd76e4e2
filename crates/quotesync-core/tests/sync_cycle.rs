//! End-to-end sync cycle tests against the in-memory remote.

use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use quotesync_core::models::Origin;
use quotesync_core::remote::{InMemoryRemote, RemoteIdentifier, RemoteItem};
use quotesync_core::store::{BlobStore, MemoryBlobStore, SqliteBlobStore, QUOTES_KEY};
use quotesync_core::{
    ConflictPolicy, QuoteId, QuoteRecord, QuoteService, Resolution, ResolutionChoice, SyncConfig,
    SyncPhase, SyncReport, SyncSummary,
};

fn item(id: u64, title: &str, group: u64) -> RemoteItem {
    RemoteItem {
        identifier: RemoteIdentifier::Number(id),
        title_text: title.to_string(),
        group_key: Some(RemoteIdentifier::Number(group)),
    }
}

fn local_record(id: &str, text: &str, category: &str) -> QuoteRecord {
    QuoteRecord {
        id: QuoteId::from(id),
        ..QuoteRecord::new_local(text, category)
    }
}

fn blobs_with(records: &[QuoteRecord]) -> Arc<dyn BlobStore> {
    let raw = serde_json::to_string(records).unwrap();
    Arc::new(MemoryBlobStore::with_entries([(QUOTES_KEY, raw)]))
}

fn service(records: &[QuoteRecord], remote: InMemoryRemote) -> Arc<QuoteService<InMemoryRemote>> {
    Arc::new(QuoteService::open(blobs_with(records), remote, SyncConfig::default()).unwrap())
}

fn summary(report: &SyncReport) -> SyncSummary {
    *report
        .summary()
        .unwrap_or_else(|| panic!("expected completed sync, got {report:?}"))
}

#[tokio::test]
async fn new_remote_record_is_added_next_to_local() {
    let service = service(
        &[local_record("local-1", "A", "X")],
        InMemoryRemote::with_items(vec![item(9, "B", 2)]),
    );

    let report = service.sync_now(ConflictPolicy::RemoteWins).await;

    let summary = summary(&report);
    assert_eq!(summary.added, 1);
    assert_eq!(summary.conflicts, 0);
    let records = service.records().await;
    assert_eq!(records.len(), 2);
    let added = records.iter().find(|r| r.id.as_str() == "remote-9").unwrap();
    assert!(added.synced);
    assert_eq!(added.origin, Origin::Remote);
}

#[tokio::test]
async fn remote_wins_overwrites_divergent_record() {
    let existing = QuoteRecord::from_remote(9, "B", "Remote Cat 2");
    let service = service(
        &[existing],
        InMemoryRemote::with_items(vec![item(9, "B2", 2)]),
    );

    let report = service.sync_now(ConflictPolicy::RemoteWins).await;

    assert_eq!(summary(&report).updated, 1);
    let records = service.records().await;
    assert_eq!(records[0].text, "B2");
    let history = service.conflict_history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].resolution, Resolution::ResolvedRemote);
    assert!(service.pending_conflicts().await.is_empty());
}

#[tokio::test]
async fn pushes_unsynced_local_records_first() {
    let first = local_record("local-1", "A", "X");
    let second = local_record("local-2", "B", "X");
    let remote = InMemoryRemote::new();
    remote.reject_push(&second.id);
    let service = service(&[first.clone(), second.clone()], remote);

    let report = service.sync_now(ConflictPolicy::RemoteWins).await;

    assert_eq!(summary(&report).pushed, 1);
    let records = service.records().await;
    assert!(records[0].synced);
    assert_eq!(records[0].origin, Origin::Local);
    assert!(!records[1].synced);
    assert_eq!(service.remote().pushed(), vec![first]);
    assert_eq!(service.pending_push_count().await, 1);
}

#[tokio::test]
async fn fetch_failure_reports_message_and_keeps_pushed_state() {
    let remote = InMemoryRemote::new();
    remote.fail_fetches("status 503");
    let service = service(&[local_record("local-1", "A", "X")], remote);

    let report = service.sync_now(ConflictPolicy::RemoteWins).await;

    assert_eq!(
        report,
        SyncReport::Failed {
            message: "Sync failed: Remote unavailable: status 503".to_string()
        }
    );
    assert!(service.records().await[0].synced);
    assert_eq!(service.last_sync().await, None);
    assert_eq!(service.phase(), SyncPhase::Idle);
}

#[tokio::test]
async fn manual_review_then_resolve_all_remote() {
    let mut first = QuoteRecord::from_remote(1, "one", "Remote Cat 1");
    first.text = "one (edited)".to_string();
    let mut second = QuoteRecord::from_remote(2, "two", "Remote Cat 1");
    second.text = "two (edited)".to_string();
    let service = service(
        &[first, second],
        InMemoryRemote::with_items(vec![item(1, "one", 1), item(2, "two", 1)]),
    );

    let report = service.sync_now(ConflictPolicy::Manual).await;
    assert_eq!(summary(&report).conflicts, 2);
    assert_eq!(summary(&report).updated, 0);
    assert_eq!(service.records().await[0].text, "one (edited)");

    let again = service.sync_now(ConflictPolicy::Manual).await;
    assert_eq!(summary(&again).conflicts, 2);
    assert_eq!(service.pending_conflicts().await.len(), 2);

    let resolved = service
        .resolve_all_conflicts(ResolutionChoice::Remote)
        .await
        .unwrap();
    assert_eq!(resolved, 2);
    assert!(service.pending_conflicts().await.is_empty());
    let records = service.records().await;
    assert!(records.iter().all(|record| record.synced));
    assert_eq!(records[0].text, "one");

    assert_eq!(
        service
            .resolve_all_conflicts(ResolutionChoice::Remote)
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn keeping_local_schedules_a_push() {
    let mut edited = QuoteRecord::from_remote(1, "one", "Remote Cat 1");
    edited.text = "mine".to_string();
    let service = service(
        &[edited],
        InMemoryRemote::with_items(vec![item(1, "one", 1)]),
    );

    service.sync_now(ConflictPolicy::Manual).await;
    service
        .resolve_conflict(&QuoteId::remote(1), ResolutionChoice::Local)
        .await
        .unwrap();

    assert_eq!(service.pending_push_count().await, 1);
    let report = service.sync_now(ConflictPolicy::Manual).await;
    assert_eq!(summary(&report).pushed, 1);
    assert_eq!(service.remote().pushed()[0].text, "mine");
}

#[tokio::test(start_paused = true)]
async fn concurrent_sync_request_is_skipped() {
    let remote = InMemoryRemote::with_items(vec![item(1, "one", 1)]);
    remote.set_fetch_delay(Duration::from_secs(5));
    let service = service(&[], remote);
    let mut phase = service.subscribe_phase();

    let background = tokio::spawn({
        let service = Arc::clone(&service);
        async move { service.sync_now(ConflictPolicy::RemoteWins).await }
    });
    phase
        .wait_for(|phase| *phase == SyncPhase::Fetching)
        .await
        .unwrap();

    assert_eq!(
        service.sync_now(ConflictPolicy::Manual).await,
        SyncReport::Skipped
    );

    let report = background.await.unwrap();
    assert_eq!(summary(&report).added, 1);
    assert_eq!(service.remote().fetch_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn periodic_mode_runs_remote_wins_cycles_until_stopped() {
    let existing = QuoteRecord::from_remote(1, "old", "Remote Cat 1");
    let service = service(
        &[existing],
        InMemoryRemote::with_items(vec![item(1, "new", 1)]),
    );

    service.start_periodic().await;
    assert!(service.is_periodic_running().await);

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(service.remote().fetch_calls(), 1);
    assert_eq!(service.records().await[0].text, "new");
    assert!(service.pending_conflicts().await.is_empty());

    // Restarting replaces the timer instead of adding a second one
    service.start_periodic().await;
    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(service.remote().fetch_calls(), 2);

    assert!(service.stop_periodic().await);
    assert!(!service.stop_periodic().await);
    tokio::time::sleep(Duration::from_secs(120)).await;
    assert_eq!(service.remote().fetch_calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn periodic_cycles_publish_their_reports() {
    let service = service(&[], InMemoryRemote::with_items(vec![item(1, "one", 1)]));
    let mut reports = service.subscribe_reports();
    assert_eq!(*reports.borrow_and_update(), None);

    service.start_periodic().await;
    reports.changed().await.unwrap();

    let report = reports.borrow_and_update().clone().unwrap();
    assert_eq!(summary(&report).added, 1);
    assert!(report.describe().contains("added 1"));

    service.remote().set_items(vec![item(1, "one (edited)", 1)]);
    reports.changed().await.unwrap();
    let report = reports.borrow_and_update().clone().unwrap();
    assert_eq!(summary(&report).updated, 1);
    service.stop_periodic().await;
}

#[tokio::test(start_paused = true)]
async fn auto_sync_preference_persists_and_controls_timer() {
    let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
    let service = Arc::new(
        QuoteService::open(Arc::clone(&blobs), InMemoryRemote::new(), SyncConfig::default())
            .unwrap(),
    );

    service.set_auto_sync(true).await.unwrap();
    assert!(service.is_periodic_running().await);
    service.stop_periodic().await;

    let reopened = Arc::new(
        QuoteService::open(blobs, InMemoryRemote::new(), SyncConfig::default()).unwrap(),
    );
    assert!(reopened.restore_auto_sync().await);
    assert!(reopened.is_periodic_running().await);

    reopened.set_auto_sync(false).await.unwrap();
    assert!(!reopened.is_periodic_running().await);
    assert!(!reopened.auto_sync_enabled().await);
}

#[tokio::test]
async fn export_then_import_preserves_ids_without_duplicates() {
    let source = service(&[], InMemoryRemote::new());
    source.add_record("Stay hungry", "Motivation").await.unwrap();
    let snapshot = source.export_snapshot().await.unwrap();
    let exported = source.records().await;

    let target = service(&[], InMemoryRemote::new());
    let first = target.import_batch(&snapshot).await.unwrap();
    assert_eq!(first.added, exported.len());
    assert_eq!(target.records().await, exported);

    let second = target.import_batch(&snapshot).await.unwrap();
    assert_eq!(second.added, 0);
    assert_eq!(second.replaced, exported.len());
    assert_eq!(target.records().await.len(), exported.len());
}

#[tokio::test]
async fn malformed_import_leaves_store_unchanged() {
    let service = service(&[local_record("local-1", "A", "X")], InMemoryRemote::new());

    let error = service.import_batch(r#"{"not": "an array"}"#).await.unwrap_err();

    assert!(matches!(error, quotesync_core::Error::ImportFormat(_)));
    assert_eq!(service.records().await.len(), 1);
}

#[tokio::test]
async fn mutations_publish_change_notifications() {
    let service = service(&[], InMemoryRemote::new());
    let changes = service.subscribe_changes();
    let before = *changes.borrow();

    service.add_record("text", "cat").await.unwrap();

    assert!(*changes.borrow() > before);
}

#[tokio::test]
async fn category_filter_is_persisted() {
    let blobs = blobs_with(&[
        local_record("local-1", "A", "X"),
        local_record("local-2", "B", "Y"),
    ]);
    let service = QuoteService::open(Arc::clone(&blobs), InMemoryRemote::new(), SyncConfig::default())
        .unwrap();

    service.set_selected_category(Some("Y")).await.unwrap();
    assert_eq!(service.visible_records().await.len(), 1);
    assert_eq!(service.categories().await, vec!["X", "Y"]);

    let reopened = QuoteService::open(blobs, InMemoryRemote::new(), SyncConfig::default()).unwrap();
    assert_eq!(reopened.visible_records().await[0].text, "B");

    assert_eq!(reopened.selected_category().await.as_deref(), Some("Y"));

    reopened.set_selected_category(Some("All")).await.unwrap();
    assert_eq!(reopened.visible_records().await.len(), 2);
    assert_eq!(reopened.selected_category().await, None);
}

#[tokio::test]
async fn state_survives_reopen_on_sqlite() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quotesync.db");

    let added = {
        let blobs: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::open(&path).unwrap());
        let service = QuoteService::open(
            blobs,
            InMemoryRemote::with_items(vec![item(3, "three", 1)]),
            SyncConfig::default(),
        )
        .unwrap();
        let added = service.add_record("persisted", "Life").await.unwrap();
        service.sync_now(ConflictPolicy::RemoteWins).await;
        added
    };

    let blobs: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::open(&path).unwrap());
    let reopened = QuoteService::open(blobs, InMemoryRemote::new(), SyncConfig::default()).unwrap();
    let records = reopened.records().await;

    // five seed quotes, the added one, and the fetched one
    assert_eq!(records.len(), 7);
    assert!(records.iter().any(|record| record.id == added.id && record.synced));
    assert!(reopened.last_sync().await.is_some());
}

#[tokio::test]
async fn random_record_picks_within_category() {
    let collection = service(
        &[
            local_record("local-1", "A", "X"),
            local_record("local-2", "B", "Y"),
        ],
        InMemoryRemote::new(),
    );

    for _ in 0..10 {
        assert_eq!(collection.random_record(Some("Y")).await.unwrap().text, "B");
    }
    assert!(collection.random_record(Some("All")).await.is_some());
    assert!(collection.random_record(None).await.is_some());
    assert_eq!(collection.random_record(Some("Z")).await, None);

    let empty = service(&[], InMemoryRemote::new());
    assert_eq!(empty.random_record(None).await, None);
}
