use std::path::Path;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    let rendered = service.export_snapshot().await?;

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}
