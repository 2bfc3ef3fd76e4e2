use quotesync_core::QuoteRecord;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

pub fn format_random_quote(record: &QuoteRecord) -> String {
    format!("\"{}\"\n  ({})", record.text, record.category)
}

/// Print one quote picked at random. Without `--category` the saved filter
/// applies.
pub async fn run_random(category: Option<&str>, options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    let selected = match category {
        Some(category) => Some(category.to_string()),
        None => service.selected_category().await,
    };

    match service.random_record(selected.as_deref()).await {
        Some(record) => println!("{}", format_random_quote(&record)),
        None => println!("No quotes available for this category."),
    }
    Ok(())
}
