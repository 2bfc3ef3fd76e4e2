//! Scriptable in-memory remote
//!
//! Serves a fixed list of items and records every push. Used by tests and
//! for offline demos; failures can be injected per call kind.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use super::{FetchError, PushItemError, RemoteAdapter, RemoteItem};
use crate::models::{QuoteId, QuoteRecord};

#[derive(Default)]
struct RemoteState {
    items: Vec<RemoteItem>,
    fetch_failure: Option<String>,
    fetch_delay: Option<Duration>,
    rejected: HashSet<QuoteId>,
    pushed: Vec<QuoteRecord>,
    fetch_calls: usize,
}

#[derive(Default)]
pub struct InMemoryRemote {
    state: Mutex<RemoteState>,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<RemoteItem>) -> Self {
        let remote = Self::new();
        remote.set_items(items);
        remote
    }

    fn state(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the served items
    pub fn set_items(&self, items: Vec<RemoteItem>) {
        self.state().items = items;
    }

    /// Make every fetch fail with `message` until cleared
    pub fn fail_fetches(&self, message: impl Into<String>) {
        self.state().fetch_failure = Some(message.into());
    }

    pub fn clear_fetch_failure(&self) {
        self.state().fetch_failure = None;
    }

    /// Delay each fetch, to keep a cycle in flight
    pub fn set_fetch_delay(&self, delay: Duration) {
        self.state().fetch_delay = Some(delay);
    }

    /// Reject pushes of the record with `id`
    pub fn reject_push(&self, id: &QuoteId) {
        self.state().rejected.insert(id.clone());
    }

    /// Records the remote accepted, in push order
    pub fn pushed(&self) -> Vec<QuoteRecord> {
        self.state().pushed.clone()
    }

    pub fn fetch_calls(&self) -> usize {
        self.state().fetch_calls
    }
}

impl RemoteAdapter for InMemoryRemote {
    async fn fetch_batch(&self, limit: usize) -> Result<Vec<QuoteRecord>, FetchError> {
        let delay = {
            let mut state = self.state();
            state.fetch_calls += 1;
            state.fetch_delay
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let state = self.state();
        if let Some(message) = &state.fetch_failure {
            return Err(FetchError::Unavailable(message.clone()));
        }
        Ok(state
            .items
            .iter()
            .take(limit)
            .cloned()
            .map(RemoteItem::into_record)
            .collect())
    }

    async fn push_record(&self, record: &QuoteRecord) -> Result<(), PushItemError> {
        let mut state = self.state();
        if state.rejected.contains(&record.id) {
            return Err(PushItemError::Rejected(format!("{} refused", record.id)));
        }
        state.pushed.push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteIdentifier;

    fn item(id: u64, title: &str) -> RemoteItem {
        RemoteItem {
            identifier: RemoteIdentifier::Number(id),
            title_text: title.to_string(),
            group_key: Some(RemoteIdentifier::Number(1)),
        }
    }

    #[tokio::test]
    async fn fetch_respects_limit_and_counts_calls() {
        let remote = InMemoryRemote::with_items(vec![item(1, "a"), item(2, "b"), item(3, "c")]);

        let batch = remote.fetch_batch(2).await.unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(remote.fetch_calls(), 1);
    }

    #[tokio::test]
    async fn injected_fetch_failure_surfaces() {
        let remote = InMemoryRemote::with_items(vec![item(1, "a")]);
        remote.fail_fetches("offline");
        assert!(matches!(
            remote.fetch_batch(5).await,
            Err(FetchError::Unavailable(message)) if message == "offline"
        ));

        remote.clear_fetch_failure();
        assert_eq!(remote.fetch_batch(5).await.unwrap().len(), 1);
    }
}
