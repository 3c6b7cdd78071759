use clap::{Parser, Subcommand};
use std::io::Write;
use thiserror::Error;

use crate::models::Category;
use crate::session::{Session, SessionError};
use crate::storage::StorageError;
use crate::store::StoreError;

/// Text shown by the "Upgrade to Pro" affordance. It changes nothing.
pub const UPGRADE_MESSAGE: &str = "FocusList Pro is not available yet.\n\
In a full release this could unlock:\n\
- Cloud sync\n\
- Extra themes\n\
- More features\n\n\
For now, it's just a demo.";

#[derive(Parser)]
#[command(name = "focuslist")]
#[command(about = "FocusList - a small checklist manager")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Task file to use instead of the one named in the config
    #[arg(short, long)]
    pub file: Option<String>,

    /// Use development mode (uses separate dev config/data)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Add a new task
    Add {
        /// Task text
        text: String,
        /// Work, Study, Personal or Other
        #[arg(long, short)]
        category: Option<Category>,
        /// 1 (highest) to 3
        #[arg(long, short, value_parser = clap::value_parser!(i64).range(1..=3))]
        priority: Option<i64>,
    },
    /// List tasks, optionally only those whose text contains QUERY
    List {
        #[arg(long, short)]
        query: Option<String>,
    },
    /// Toggle done on task N (as numbered by `list`)
    Done { number: usize },
    /// Delete task N (as numbered by `list`)
    Delete { number: usize },
    /// Show task totals
    Stats,
    /// About FocusList Pro
    Upgrade,
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

/// Turn a 1-based task number into a full-list index; 0 means nothing was selected
fn index_from_number(number: usize) -> Option<usize> {
    number.checked_sub(1)
}

/// Handle the add command
pub fn handle_add(
    session: &mut Session,
    text: &str,
    category: Category,
    priority: i64,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let index = session.add(text, category, priority)?;
    if let Some(task) = session.store().get(index) {
        writeln!(out, "Added {}. {}", index + 1, task.display_line())?;
    }
    Ok(())
}

/// Handle the list command
pub fn handle_list(session: &Session, query: Option<&str>, out: &mut impl Write) -> Result<(), CliError> {
    for (index, task) in session.search(query.unwrap_or_default()) {
        writeln!(out, "{}. {}", index + 1, task.display_line())?;
    }
    writeln!(out, "{}", session.stats())?;
    Ok(())
}

/// Handle the done command
pub fn handle_done(session: &mut Session, number: usize, out: &mut impl Write) -> Result<(), CliError> {
    let index = index_from_number(number);
    let done = session.toggle_done(index)?;
    if let Some(task) = index.and_then(|i| session.store().get(i)) {
        let state = if done { "done" } else { "not done" };
        writeln!(out, "Marked {} as {}: {}", number, state, task.text)?;
    }
    Ok(())
}

/// Handle the delete command
pub fn handle_delete(session: &mut Session, number: usize, out: &mut impl Write) -> Result<(), CliError> {
    let removed = session.delete(index_from_number(number))?;
    writeln!(out, "Deleted: {}", removed.text)?;
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(session: &Session, out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", session.stats())?;
    Ok(())
}

/// Handle the upgrade command
pub fn handle_upgrade(out: &mut impl Write) -> Result<(), CliError> {
    writeln!(out, "{}", UPGRADE_MESSAGE)?;
    Ok(())
}
