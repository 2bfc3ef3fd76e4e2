//! quotesync CLI - keep a local quote collection in step with a remote feed
//!
//! Every command opens the local store, does one thing, and exits; `watch`
//! keeps periodic sync running until interrupted.

mod cli;
mod commands;
mod error;

use clap::{CommandFactory, Parser};

use crate::cli::{AutoSyncState, Cli, Commands, ConflictCommands};
use crate::commands::common::{resolve_db_path, ServiceOptions};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "quotesync=info".parse() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let options = ServiceOptions {
        db_path: resolve_db_path(cli.db_path),
        endpoint: cli.endpoint,
    };

    match cli.command {
        Some(Commands::Add { category, text }) => {
            commands::add::run_add(&text, &category, &options).await?;
        }
        Some(Commands::List { category, json }) => {
            commands::list::run_list(category.as_deref(), json, &options).await?;
        }
        Some(Commands::Random { category }) => {
            commands::random::run_random(category.as_deref(), &options).await?;
        }
        Some(Commands::Categories) => commands::categories::run_categories(&options).await?,
        Some(Commands::Export { output }) => {
            commands::export::run_export(output.as_deref(), &options).await?;
        }
        Some(Commands::Import { path }) => commands::import::run_import(&path, &options).await?,
        Some(Commands::Sync { manual }) => commands::sync::run_sync(manual, &options).await?,
        Some(Commands::Conflicts { command }) => match command {
            ConflictCommands::List { all, json } => {
                commands::conflicts::run_conflicts_list(all, json, &options).await?;
            }
            ConflictCommands::Resolve { id, keep } => {
                commands::conflicts::run_conflicts_resolve(&id, keep, &options).await?;
            }
            ConflictCommands::ResolveAll { keep } => {
                commands::conflicts::run_conflicts_resolve_all(keep, &options).await?;
            }
        },
        Some(Commands::AutoSync { state }) => match state {
            AutoSyncState::On => commands::auto_sync::run_auto_sync(true, &options).await?,
            AutoSyncState::Off => commands::auto_sync::run_auto_sync(false, &options).await?,
            AutoSyncState::Status => commands::auto_sync::run_auto_sync_status(&options).await?,
        },
        Some(Commands::Watch { interval }) => commands::watch::run_watch(interval, &options).await?,
        Some(Commands::Status { json }) => commands::status::run_status(json, &options).await?,
        Some(Commands::Completions { shell, output }) => {
            commands::completions::run_completions(shell, output.as_deref())?;
        }
        None => {
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
