use std::path::Path;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

pub async fn run_import(path: &Path, options: &ServiceOptions) -> Result<(), CliError> {
    let payload = std::fs::read_to_string(path)?;

    let service = open_service(options)?;
    let summary = service.import_batch(&payload).await?;

    println!(
        "Imported {} new and {} replaced quotes.",
        summary.added, summary.replaced
    );
    Ok(())
}
