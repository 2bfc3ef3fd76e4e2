//! Snapshot export and import of the quote collection.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::models::{QuoteId, QuoteRecord, StoredQuote};

/// Default file name for exported snapshots
pub const EXPORT_FILE_NAME: &str = "quotes.json";

/// Render records as pretty-printed JSON, the same shape as the stored blob.
pub fn render_json_export(records: &[QuoteRecord]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(records)
}

/// Suggested file name for export flows.
#[must_use]
pub const fn suggested_export_file_name() -> &'static str {
    EXPORT_FILE_NAME
}

/// Parse an import payload into normalized records.
///
/// The payload must be a JSON array. Entries without an id get a fresh
/// local id; entries without `synced` are treated as unsynced. Any entry
/// that is not an object, or that lacks text or category, rejects the whole
/// payload.
pub fn parse_import(payload: &str) -> Result<Vec<QuoteRecord>> {
    let value = serde_json::from_str::<serde_json::Value>(payload)
        .map_err(|error| Error::ImportFormat(error.to_string()))?;
    let serde_json::Value::Array(items) = value else {
        return Err(Error::ImportFormat(
            "expected a JSON array of quotes".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            let stored = StoredQuote::deserialize(item)
                .map_err(|error| Error::ImportFormat(format!("entry {position}: {error}")))?;
            let mut record = stored.into_record(|_| QuoteId::local(), |_| false);
            record.text = record.text.trim().to_string();
            record.category = record.category.trim().to_string();
            if record.text.is_empty() || record.category.is_empty() {
                return Err(Error::ImportFormat(format!(
                    "entry {position} is missing text or category"
                )));
            }
            Ok(record)
        })
        .collect()
}
