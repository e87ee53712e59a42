//! `boltodo` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments, open the database once, and run one subcommand.
//! - Translate outcomes into the process exit status.
//!
//! # Invariants
//! - The connection is owned by `main` and lent to the dispatcher.
//! - Any failed operation exits non-zero.

mod args;
mod dispatch;

use args::Cli;
use boltodo_core::{default_log_level, init_logging, open_db, SqliteTodoRepository, TodoService};
use clap::Parser;
use dispatch::{dispatch, Outcome};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        let setup = std::path::absolute(log_dir)
            .map_err(|err| format!("cannot resolve log dir `{}`: {err}", log_dir.display()))
            .and_then(|dir| init_logging(level, &dir));
        if let Err(err) = setup {
            eprintln!("warning: logging disabled: {err}");
        }
    }

    let conn = match open_db(&cli.db) {
        Ok(conn) => conn,
        Err(err) => {
            eprintln!("Error opening database `{}`: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };
    let repo = match SqliteTodoRepository::try_new(&conn) {
        Ok(repo) => repo,
        Err(err) => {
            eprintln!("Error preparing database `{}`: {err}", cli.db.display());
            return ExitCode::FAILURE;
        }
    };
    let service = TodoService::new(repo);

    let mut stdout = io::stdout().lock();
    match dispatch(&service, &cli.command, &mut stdout) {
        Ok(Outcome::Success) => ExitCode::SUCCESS,
        Ok(Outcome::Failed) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("Error writing output: {err}");
            ExitCode::FAILURE
        }
    }
}
