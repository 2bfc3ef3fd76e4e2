use quotesync_core::QuoteId;

use crate::cli::KeepChoice;
use crate::commands::common::{
    conflict_to_item, format_conflict_lines, open_service, ConflictItem, ServiceOptions,
};
use crate::error::CliError;

pub async fn run_conflicts_list(
    include_resolved: bool,
    as_json: bool,
    options: &ServiceOptions,
) -> Result<(), CliError> {
    let service = open_service(options)?;
    let entries = if include_resolved {
        service.conflict_history().await
    } else {
        service.pending_conflicts().await
    };

    if as_json {
        let json_items = entries
            .iter()
            .map(conflict_to_item)
            .collect::<Vec<ConflictItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!("No conflicts to review.");
        return Ok(());
    }

    for line in format_conflict_lines(&entries) {
        println!("{line}");
    }
    Ok(())
}

pub async fn run_conflicts_resolve(
    id: &str,
    keep: KeepChoice,
    options: &ServiceOptions,
) -> Result<(), CliError> {
    let service = open_service(options)?;
    let id = QuoteId::from(id.trim());
    let resolution = service.resolve_conflict(&id, keep.into()).await?;

    println!("{id}: {resolution}");
    Ok(())
}

pub async fn run_conflicts_resolve_all(
    keep: KeepChoice,
    options: &ServiceOptions,
) -> Result<(), CliError> {
    let service = open_service(options)?;
    let resolved = service.resolve_all_conflicts(keep.into()).await?;

    if resolved == 0 {
        println!("No conflicts to resolve.");
    } else {
        println!("Resolved {resolved} conflict(s).");
    }
    Ok(())
}
