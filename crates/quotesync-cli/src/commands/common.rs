use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quotesync_core::remote::HttpRemote;
use quotesync_core::store::{BlobStore, SqliteBlobStore};
use quotesync_core::util::{compact_text, normalize_text_option};
use quotesync_core::{ConflictEntry, QuoteRecord, QuoteService, SyncConfig};
use serde::Serialize;

use crate::error::CliError;

pub type CliService = QuoteService<HttpRemote>;

/// Where the store lives and which endpoint to talk to
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    pub db_path: PathBuf,
    pub endpoint: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct QuoteListItem {
    pub id: String,
    pub text: String,
    pub category: String,
    pub origin: String,
    pub synced: bool,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct ConflictItem {
    pub id: String,
    pub resolution: String,
    pub local_text: String,
    pub local_category: String,
    pub remote_text: String,
    pub remote_category: String,
    pub detected_at: String,
    pub resolved_at: Option<String>,
}

pub fn resolve_db_path(cli_db_path: Option<PathBuf>) -> PathBuf {
    cli_db_path
        .or_else(|| env::var_os("QUOTESYNC_DB_PATH").map(PathBuf::from))
        .unwrap_or_else(default_db_path)
}

pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("quotesync")
        .join("quotesync.db")
}

pub fn load_config(endpoint: Option<&str>) -> Result<SyncConfig, CliError> {
    let mut config = SyncConfig::from_env()?;
    if let Some(endpoint) = endpoint {
        config = config.with_endpoint(endpoint);
    }
    config.validate()?;
    Ok(config)
}

pub fn open_service(options: &ServiceOptions) -> Result<Arc<CliService>, CliError> {
    let config = load_config(options.endpoint.as_deref())?;
    open_service_with(&options.db_path, config)
}

pub fn open_service_with(path: &Path, config: SyncConfig) -> Result<Arc<CliService>, CliError> {
    let blobs: Arc<dyn BlobStore> = Arc::new(SqliteBlobStore::open(path)?);
    let remote = HttpRemote::new(&config)?;
    Ok(Arc::new(QuoteService::open(blobs, remote, config)?))
}

/// Join the words of a quote given on the command line
pub fn normalize_quote_text(parts: &[String]) -> Option<String> {
    normalize_text_option(Some(parts.join(" ")))
}

pub fn short_id(id: &str) -> String {
    id.chars().take(20).collect()
}

pub fn quote_marker(record: &QuoteRecord) -> char {
    if record.synced {
        ' '
    } else {
        '*'
    }
}

pub fn format_quote_lines(records: &[QuoteRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| {
            let id = short_id(record.id.as_str());
            let marker = quote_marker(record);
            let text = compact_text(&record.text);
            format!("{marker} {id:<20}  {:<14}  {text}", record.category)
        })
        .collect()
}

pub fn quote_to_list_item(record: &QuoteRecord) -> QuoteListItem {
    QuoteListItem {
        id: record.id.to_string(),
        text: record.text.clone(),
        category: record.category.clone(),
        origin: record.origin.to_string(),
        synced: record.synced,
        updated_at: record.updated_at.to_rfc3339(),
    }
}

pub fn conflict_to_item(entry: &ConflictEntry) -> ConflictItem {
    ConflictItem {
        id: entry.id.to_string(),
        resolution: entry.resolution.to_string(),
        local_text: entry.local.text.clone(),
        local_category: entry.local.category.clone(),
        remote_text: entry.remote.text.clone(),
        remote_category: entry.remote.category.clone(),
        detected_at: entry.detected_at.to_rfc3339(),
        resolved_at: entry.resolved_at.map(|at| at.to_rfc3339()),
    }
}

pub fn format_conflict_lines(entries: &[ConflictEntry]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| {
            [
                format!("{}  [{}]", entry.id, entry.resolution),
                format!(
                    "    local:  {} ({})",
                    compact_text(&entry.local.text),
                    entry.local.category
                ),
                format!(
                    "    remote: {} ({})",
                    compact_text(&entry.remote.text),
                    entry.remote.category
                ),
            ]
        })
        .collect()
}
