use clap::{Args, Parser, Subcommand};

use crate::cli::output::parse_status;
use crate::model::board::TimeFilter;
use crate::model::task::Status;

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - a kanban board over your notes"), version)]
pub struct Cli {
    /// Defaults to `board` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different vault directory
    #[arg(short = 'C', long = "vault", global = true)]
    pub vault: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the board
    Board(BoardArgs),
    /// Move a task to a column, optionally at a position
    Move(MoveArgs),
    /// Create a new task document
    Add(AddArgs),
    /// Show or set the saved time filter
    Filter(FilterArgs),
    /// Print the board and reprint it whenever the vault changes
    Watch(WatchArgs),
}

#[derive(Args, Default)]
pub struct BoardArgs {
    /// Time filter for this run only (all, today, week)
    #[arg(long)]
    pub filter: Option<TimeFilter>,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Vault-relative path of the task document
    pub path: String,
    /// Target column (backlog, todo, doing, done)
    #[arg(value_parser = parse_status)]
    pub status: Status,
    /// Position in the target column (0 = top)
    #[arg(long)]
    pub index: Option<usize>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Column for the new task
    #[arg(long, default_value = "todo", value_parser = parse_status)]
    pub status: Status,
}

#[derive(Args)]
pub struct FilterArgs {
    /// New filter (all, today, week); omit to show the current one
    pub mode: Option<TimeFilter>,
}

#[derive(Args)]
pub struct WatchArgs {
    /// Polling interval in milliseconds
    #[arg(long, default_value = "250")]
    pub interval: u64,
}
