//! CLI argument parsing for revin.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "revin",
    about = "Bulk-edit a reminders list in your text editor",
    version,
    after_help = "Logs are written to: ~/.local/share/revin/logs/revin.log"
)]
pub struct Cli {
    /// Config file (default: ~/.config/revin/config.yaml)
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// List to operate on (default: Inbox)
    #[arg(short = 'l', long, global = true)]
    pub list: Option<String>,

    /// Editor command line (default: $VISUAL, then $EDITOR, then vi)
    #[arg(short = 'e', long, global = true)]
    pub editor: Option<String>,

    /// Application directory holding tmp/ and backup/ (default: ~/revin)
    #[arg(long, global = true)]
    pub home: Option<PathBuf>,

    /// Path to the reminders program
    #[arg(long, global = true)]
    pub reminders: Option<PathBuf>,

    /// Disable coloured output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit the list in your editor and apply the changes (default)
    Edit,

    /// Show all reminder lists
    Lists,

    /// Print the list in the editable buffer format
    Show,

    /// Mark a completed task as not completed
    Uncomplete {
        /// Task ID as shown by the reminders program
        id: u64,
    },
}
