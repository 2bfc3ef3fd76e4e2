use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

pub async fn run_auto_sync(enabled: bool, options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    service.set_auto_sync(enabled).await?;
    // This process exits right away; `watch` owns the long-running timer
    service.stop_periodic().await;

    if enabled {
        println!("Auto-sync enabled. Run `quotesync watch` to keep syncing.");
    } else {
        println!("Auto-sync disabled.");
    }
    Ok(())
}

pub async fn run_auto_sync_status(options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;
    let state = if service.auto_sync_enabled().await {
        "on"
    } else {
        "off"
    };
    println!("{state}");
    Ok(())
}
