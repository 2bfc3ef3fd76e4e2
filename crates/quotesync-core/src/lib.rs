//! quotesync-core - Core library for quotesync
//!
//! This crate contains the offline-first sync engine behind quotesync: the
//! quote record store, the remote adapter boundary, the merge engine, the
//! conflict queue, and the service object that sequences sync cycles.
//! Presentation layers (the CLI, or any UI) only talk to [`QuoteService`].

pub mod config;
pub mod conflicts;
pub mod error;
pub mod export;
pub mod merge;
pub mod models;
pub mod remote;
pub mod service;
pub mod store;
pub mod sync;
pub mod util;

pub use config::SyncConfig;
pub use conflicts::ConflictQueue;
pub use error::{Error, Result};
pub use models::{
    ConflictEntry, Origin, Preferences, QuoteId, QuoteRecord, Resolution, ResolutionChoice,
};
pub use service::QuoteService;
pub use sync::{ConflictPolicy, SyncPhase, SyncReport, SyncSummary};
