use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use quotesync_core::ResolutionChoice;

#[derive(Parser)]
#[command(name = "quotesync")]
#[command(about = "Keep a local quote collection in sync with a remote feed")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Optional path to local database file
    #[arg(long, value_name = "PATH", global = true)]
    pub db_path: Option<PathBuf>,

    /// Remote endpoint (overrides QUOTESYNC_ENDPOINT)
    #[arg(long, value_name = "URL", global = true)]
    pub endpoint: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a quote to the local collection
    #[command(alias = "new")]
    Add {
        /// Category of the quote
        #[arg(short, long)]
        category: String,
        /// Quote text
        #[arg(required = true)]
        text: Vec<String>,
    },
    /// List quotes, optionally filtered by category
    List {
        /// Only show this category ("All" clears the saved filter)
        #[arg(short, long)]
        category: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a random quote
    Random {
        /// Pick from this category instead of the saved filter
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List known categories
    Categories,
    /// Export every quote as JSON
    Export {
        /// Output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
    /// Import quotes from a JSON export
    Import {
        /// File produced by `quotesync export`
        path: PathBuf,
    },
    /// Push pending quotes, then fetch and merge the remote batch
    Sync {
        /// Queue divergent quotes for review instead of taking the remote copy
        #[arg(long)]
        manual: bool,
    },
    /// Review and resolve sync conflicts
    Conflicts {
        #[command(subcommand)]
        command: ConflictCommands,
    },
    /// Toggle automatic remote-wins sync
    AutoSync {
        #[arg(value_enum)]
        state: AutoSyncState,
    },
    /// Sync periodically until interrupted
    Watch {
        /// Seconds between cycles (defaults to the configured interval)
        #[arg(short, long, value_name = "SECS")]
        interval: Option<u64>,
    },
    /// Show collection and sync status
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum ConflictCommands {
    /// List pending conflicts
    List {
        /// Include resolved conflicts
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the pending conflict for one quote
    Resolve {
        /// Quote id, e.g. remote-9
        id: String,
        /// Which side to keep
        #[arg(long, value_enum)]
        keep: KeepChoice,
    },
    /// Resolve every pending conflict the same way
    ResolveAll {
        /// Which side to keep
        #[arg(long, value_enum)]
        keep: KeepChoice,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum KeepChoice {
    Local,
    Remote,
}

impl From<KeepChoice> for ResolutionChoice {
    fn from(choice: KeepChoice) -> Self {
        match choice {
            KeepChoice::Local => Self::Local,
            KeepChoice::Remote => Self::Remote,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AutoSyncState {
    On,
    Off,
    Status,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}
