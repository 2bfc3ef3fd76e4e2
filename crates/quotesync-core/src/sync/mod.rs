//! Sync cycle vocabulary: policies, phases, and reports

mod periodic;

use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::merge::MergeOutcome;

pub(crate) use periodic::PeriodicHandle;

/// How divergent content is handled during a merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Overwrite local content with remote content. Periodic cycles always
    /// use this policy.
    RemoteWins,
    /// Leave local content alone and queue the conflict for review
    Manual,
}

impl ConflictPolicy {
    /// Map the `auto_resolve` flag of a sync request onto a policy
    #[must_use]
    pub const fn from_auto_resolve(auto_resolve: bool) -> Self {
        if auto_resolve {
            Self::RemoteWins
        } else {
            Self::Manual
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RemoteWins => f.write_str("remote-wins"),
            Self::Manual => f.write_str("manual"),
        }
    }
}

/// Where the orchestrator currently is in a cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncPhase {
    #[default]
    Idle,
    Pushing,
    Fetching,
    Merging,
    Summarizing,
    Failed,
}

/// Counts from one completed cycle
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncSummary {
    pub added: usize,
    pub updated: usize,
    pub pushed: usize,
    pub conflicts: usize,
}

impl SyncSummary {
    pub(crate) const fn new(pushed: usize, merge: MergeOutcome) -> Self {
        Self {
            added: merge.added,
            updated: merge.updated,
            pushed,
            conflicts: merge.conflicts_found,
        }
    }

    /// One-line summary, e.g. `Last sync <ts>: added 2, pushed 1 local.`
    #[must_use]
    pub fn describe(&self, last_sync: &str) -> String {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("added {}", self.added));
        }
        if self.updated > 0 {
            parts.push(format!("updated {}", self.updated));
        }
        if self.pushed > 0 {
            parts.push(format!("pushed {} local", self.pushed));
        }
        if self.conflicts > 0 {
            parts.push(format!("conflicts {}", self.conflicts));
        }

        if parts.is_empty() {
            format!("Last sync {last_sync}: no changes.")
        } else {
            format!("Last sync {last_sync}: {}.", parts.join(", "))
        }
    }
}

/// Result of a sync request. Never an error: failures are reported as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SyncReport {
    Completed {
        summary: SyncSummary,
        last_sync: String,
    },
    Failed {
        message: String,
    },
    /// Another cycle was already in flight
    Skipped,
}

impl SyncReport {
    /// Human-readable status line
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::Completed { summary, last_sync } => summary.describe(last_sync),
            Self::Failed { message } => message.clone(),
            Self::Skipped => "Sync already in progress.".to_string(),
        }
    }

    #[must_use]
    pub const fn summary(&self) -> Option<&SyncSummary> {
        match self {
            Self::Completed { summary, .. } => Some(summary),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Format a sync time the way it is stored and displayed
#[must_use]
pub fn format_sync_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_lists_only_nonzero_counts() {
        let summary = SyncSummary {
            added: 2,
            updated: 0,
            pushed: 1,
            conflicts: 3,
        };
        assert_eq!(
            summary.describe("now"),
            "Last sync now: added 2, pushed 1 local, conflicts 3."
        );
    }

    #[test]
    fn describe_reports_no_changes() {
        assert_eq!(
            SyncSummary::default().describe("now"),
            "Last sync now: no changes."
        );
    }

    #[test]
    fn failed_report_describes_message() {
        let report = SyncReport::Failed {
            message: "Sync failed: offline".to_string(),
        };
        assert!(report.is_failed());
        assert_eq!(report.summary(), None);
        assert_eq!(report.describe(), "Sync failed: offline");
    }

    #[test]
    fn auto_resolve_flag_maps_to_policy() {
        assert_eq!(ConflictPolicy::from_auto_resolve(true), ConflictPolicy::RemoteWins);
        assert_eq!(ConflictPolicy::from_auto_resolve(false), ConflictPolicy::Manual);
    }

    #[test]
    fn format_sync_timestamp_returns_utc_label() {
        let epoch = DateTime::<Utc>::default();
        assert_eq!(format_sync_timestamp(epoch), "1970-01-01 00:00:00 UTC");
    }
}
