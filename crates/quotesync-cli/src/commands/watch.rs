use std::time::Duration;

use quotesync_core::{ConflictPolicy, SyncReport};

use crate::commands::common::{load_config, open_service_with, ServiceOptions};
use crate::error::CliError;

/// Run remote-wins cycles on a fixed interval until Ctrl-C
pub async fn run_watch(interval_secs: Option<u64>, options: &ServiceOptions) -> Result<(), CliError> {
    let mut config = load_config(options.endpoint.as_deref())?;
    if let Some(secs) = interval_secs {
        if secs == 0 {
            return Err(CliError::InvalidInterval);
        }
        config = config.with_sync_interval(Duration::from_secs(secs));
    }
    let period = config.sync_interval;

    let service = open_service_with(&options.db_path, config)?;
    println!(
        "{}",
        service.sync_now(ConflictPolicy::RemoteWins).await.describe()
    );

    service.start_periodic().await;
    println!(
        "Syncing every {}s; press Ctrl-C to stop.",
        period.as_secs()
    );

    let mut reports = service.subscribe_reports();
    reports.borrow_and_update();
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = &mut shutdown => {
                result?;
                break;
            }
            changed = reports.changed() => {
                if changed.is_err() {
                    break;
                }
                let line = reports.borrow_and_update().as_ref().map(SyncReport::describe);
                if let Some(line) = line {
                    println!("{line}");
                }
            }
        }
    }

    service.stop_periodic().await;
    println!("Stopped.");
    Ok(())
}
