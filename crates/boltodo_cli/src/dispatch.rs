//! Maps parsed subcommands onto `TodoService` calls and renders output.
//!
//! # Invariants
//! - Each invocation performs exactly one service call.
//! - Operation failures are written to `out` and reported as
//!   `Outcome::Failed`; only writer I/O errors are returned as `Err`.

use crate::args::Command;
use boltodo_core::{RemoveOutcome, TodoRepository, TodoService};
use log::{info, warn};
use std::io::{self, Write};

/// Result of one dispatched command, mapped to the process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failed,
}

pub fn dispatch<R, W>(
    service: &TodoService<R>,
    command: &Command,
    out: &mut W,
) -> io::Result<Outcome>
where
    R: TodoRepository,
    W: Write,
{
    match command {
        Command::Add(args) => match service.add(args.text()) {
            Ok(todo) => {
                writeln!(out, "{todo}")?;
                writeln!(out, "Todo successfully added")?;
                info!("event=cmd_add module=cli status=ok id={}", todo.id);
                Ok(Outcome::Success)
            }
            Err(err) => failed(out, "cmd_add", format_args!("Error adding todo: {err}")),
        },
        Command::Get(args) => match service.get(args.id) {
            Ok(todo) => {
                writeln!(out, "{})  {}", todo.id, todo.text)?;
                Ok(Outcome::Success)
            }
            Err(err) => failed(out, "cmd_get", format_args!("Error getting todo: {err}")),
        },
        Command::Edit(args) => match service.edit(args.id, args.text()) {
            Ok(todo) => {
                writeln!(out, "Todo successfully edited")?;
                info!("event=cmd_edit module=cli status=ok id={}", todo.id);
                Ok(Outcome::Success)
            }
            Err(err) => failed(out, "cmd_edit", format_args!("Error editing todo: {err}")),
        },
        Command::Remove(args) => match service.remove(args.id) {
            Ok(outcome) => {
                writeln!(out, "Removed, todo - {}", args.id)?;
                info!(
                    "event=cmd_remove module=cli status=ok id={} already_absent={}",
                    args.id,
                    outcome == RemoveOutcome::AlreadyAbsent
                );
                Ok(Outcome::Success)
            }
            Err(err) => failed(out, "cmd_remove", format_args!("Error removing todo: {err}")),
        },
        Command::List => {
            writeln!(out, "Listing all items")?;
            let listing = match service.list() {
                Ok(listing) => listing,
                Err(err) => {
                    return failed(out, "cmd_list", format_args!("Error listing todos: {err}"));
                }
            };
            for entry in &listing.entries {
                match entry {
                    Ok(todo) => writeln!(out, "{todo}")?,
                    Err(corrupt) => writeln!(out, "error: {corrupt}")?,
                }
            }
            writeln!(out, "End of list")?;

            if listing.is_clean() {
                Ok(Outcome::Success)
            } else {
                Ok(Outcome::Failed)
            }
        }
    }
}

fn failed<W: Write>(
    out: &mut W,
    event: &str,
    message: std::fmt::Arguments<'_>,
) -> io::Result<Outcome> {
    warn!("event={event} module=cli status=error message={message}");
    writeln!(out, "{message}")?;
    Ok(Outcome::Failed)
}
