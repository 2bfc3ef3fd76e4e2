use serde::Serialize;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct StatusReport {
    pub endpoint: String,
    pub quotes: usize,
    pub pending_push: usize,
    pub pending_conflicts: usize,
    pub selected_category: Option<String>,
    pub auto_sync: bool,
    pub last_sync: Option<String>,
}

impl StatusReport {
    pub fn lines(&self) -> Vec<String> {
        vec![
            format!("Endpoint:          {}", self.endpoint),
            format!("Quotes:            {}", self.quotes),
            format!("Pending push:      {}", self.pending_push),
            format!("Pending conflicts: {}", self.pending_conflicts),
            format!(
                "Category filter:   {}",
                self.selected_category.as_deref().unwrap_or("All")
            ),
            format!(
                "Auto-sync:         {}",
                if self.auto_sync { "on" } else { "off" }
            ),
            format!(
                "Last sync:         {}",
                self.last_sync.as_deref().unwrap_or("never")
            ),
        ]
    }
}

pub async fn run_status(as_json: bool, options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    let preferences = service.preferences().await;
    let report = StatusReport {
        endpoint: service.config().endpoint.clone(),
        quotes: service.records().await.len(),
        pending_push: service.pending_push_count().await,
        pending_conflicts: service.pending_conflicts().await.len(),
        selected_category: preferences.selected_category,
        auto_sync: preferences.auto_sync,
        last_sync: preferences.last_sync,
    };

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for line in report.lines() {
            println!("{line}");
        }
    }
    Ok(())
}
