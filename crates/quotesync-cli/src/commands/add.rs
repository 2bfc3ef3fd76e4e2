use crate::commands::common::{normalize_quote_text, open_service, ServiceOptions};
use crate::error::CliError;

pub async fn run_add(
    text_parts: &[String],
    category: &str,
    options: &ServiceOptions,
) -> Result<(), CliError> {
    let text = normalize_quote_text(text_parts).ok_or(CliError::EmptyText)?;

    let service = open_service(options)?;
    let record = service.add_record(&text, category).await?;

    println!("{}", record.id);
    Ok(())
}
