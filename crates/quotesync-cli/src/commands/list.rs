use crate::commands::common::{
    format_quote_lines, open_service, quote_to_list_item, QuoteListItem, ServiceOptions,
};
use crate::error::CliError;

/// List quotes matching the saved category filter. Passing a category
/// replaces the saved filter first.
pub async fn run_list(
    category: Option<&str>,
    as_json: bool,
    options: &ServiceOptions,
) -> Result<(), CliError> {
    let service = open_service(options)?;
    if let Some(category) = category {
        service.set_selected_category(Some(category)).await?;
    }
    let records = service.visible_records().await;

    if as_json {
        let json_items = records
            .iter()
            .map(quote_to_list_item)
            .collect::<Vec<QuoteListItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
    } else if records.is_empty() {
        println!("No quotes to show.");
    } else {
        for line in format_quote_lines(&records) {
            println!("{line}");
        }
    }

    Ok(())
}
