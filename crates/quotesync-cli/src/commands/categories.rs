use quotesync_core::models::ALL_CATEGORIES;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

pub async fn run_categories(options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    let selected = service.selected_category().await;
    let selected = selected.as_deref().unwrap_or(ALL_CATEGORIES);

    for category in std::iter::once(ALL_CATEGORIES.to_string()).chain(service.categories().await) {
        let marker = if category == selected { '>' } else { ' ' };
        println!("{marker} {category}");
    }
    Ok(())
}
