//! Command-line argument model.
//!
//! One typed struct per subcommand; clap validates ids as `u64` before any
//! handler runs.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// boltodo - a todo list kept in a local database file
#[derive(Parser, Debug)]
#[command(name = "boltodo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Database file, created on first use
    #[arg(long, global = true, env = "BOLTODO_DB", default_value = "my.db")]
    pub db: PathBuf,

    /// Directory for rolling log files; logging is off when unset
    #[arg(long, global = true, env = "BOLTODO_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error); needs --log-dir
    #[arg(long, global = true, env = "BOLTODO_LOG_LEVEL", requires = "log_dir")]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Add a todo item
    Add(AddArgs),
    /// Show one todo item
    Get(GetArgs),
    /// Replace the text of a todo item
    Edit(EditArgs),
    /// Remove a todo item
    Remove(RemoveArgs),
    /// List all todo items
    List,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddArgs {
    /// Todo text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct GetArgs {
    /// Todo item id
    pub id: u64,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct EditArgs {
    /// Todo item id
    pub id: u64,
    /// Updated text; multiple words are joined with spaces
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub text: Vec<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct RemoveArgs {
    /// Todo item id
    pub id: u64,
}

impl AddArgs {
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}

impl EditArgs {
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}
