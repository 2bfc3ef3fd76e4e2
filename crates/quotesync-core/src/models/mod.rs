//! Data models for quotesync

mod conflict;
mod preferences;
mod quote;

pub use conflict::{ConflictEntry, Resolution, ResolutionChoice};
pub use preferences::{Preferences, ALL_CATEGORIES};
pub use quote::{Origin, QuoteId, QuoteRecord, StoredQuote, LOCAL_ID_PREFIX, REMOTE_ID_PREFIX};
