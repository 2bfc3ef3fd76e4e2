//! Persistence layer for quotesync
//!
//! Everything is stored as opaque text blobs under a handful of fixed keys,
//! so any key-value backend can host a quotesync collection.

mod blob;
mod preferences;
mod record_store;

pub use blob::{BlobStore, MemoryBlobStore, SqliteBlobStore};
pub use preferences::PreferencesRepository;
pub use record_store::{seed_quotes, ImportSummary, RecordStore};

/// Blob key holding the record collection
pub const QUOTES_KEY: &str = "quotes";
/// Blob key holding the conflict history
pub const CONFLICTS_KEY: &str = "conflicts";
/// Blob key holding the selected category filter
pub const SELECTED_CATEGORY_KEY: &str = "selectedCategory";
/// Blob key holding the auto-sync preference
pub const AUTO_SYNC_KEY: &str = "autoSync";
/// Blob key holding the last-sync timestamp string
pub const LAST_SYNC_KEY: &str = "lastSync";
