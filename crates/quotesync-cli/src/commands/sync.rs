use quotesync_core::ConflictPolicy;

use crate::commands::common::{open_service, ServiceOptions};
use crate::error::CliError;

/// One sync cycle. Divergences are settled remote-wins unless `--manual`
/// asks for them to be queued for review.
pub async fn run_sync(manual: bool, options: &ServiceOptions) -> Result<(), CliError> {
    let service = open_service(options)?;

    let report = service
        .sync_now(ConflictPolicy::from_auto_resolve(!manual))
        .await;
    if report.is_failed() {
        return Err(CliError::SyncFailed(report.describe()));
    }
    println!("{}", report.describe());

    let pending = service.pending_conflicts().await.len();
    if pending > 0 {
        println!("{pending} conflict(s) waiting; run `quotesync conflicts list`.");
    }
    Ok(())
}
