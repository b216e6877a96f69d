pub mod backup;
pub mod capture;
pub mod categories;
pub mod check;
pub mod clear;
pub mod init;
pub mod resume;
pub mod status;

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::db::{get_connection, CategorySource};
use crate::error::{LedgerError, Result};
use crate::paths::{resolve_dropdown_list, PATH_SEPARATOR};
use crate::settings::{shellexpand_path, Settings};
use crate::store::SnapshotStore;

#[derive(Parser)]
#[command(
    name = "smart-ledger",
    about = "Classify imported transactions across sessions without losing work."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and initialize the category database.
    Init {
        /// Path for smart-ledger data (default: ~/Documents/smart-ledger)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// List category paths available for classification.
    Categories,
    /// Save classification progress for a transactions file.
    Capture {
        /// CSV file with a header row
        file: String,
        /// Confirm a category for a row: ROW=CATEGORY (repeatable)
        #[arg(long = "set", value_name = "ROW=CATEGORY")]
        set: Vec<String>,
        /// Record a suggested category for a row: ROW=CATEGORY (repeatable)
        #[arg(long = "suggest", value_name = "ROW=CATEGORY")]
        suggest: Vec<String>,
        /// Keep categories already saved for this file and apply these on top
        #[arg(long)]
        merge: bool,
    },
    /// Check whether saved progress still matches a file.
    Check {
        /// CSV file the progress was saved for
        file: String,
    },
    /// Restore saved progress for a file.
    Resume {
        /// CSV file to resume
        file: String,
        /// Resume even if the file changed since progress was saved
        #[arg(long)]
        force: bool,
    },
    /// Show a summary of saved progress.
    Status,
    /// Back up the saved progress file.
    Backup,
    /// List backups of the saved progress file.
    Backups,
    /// Read progress back from a backup.
    Restore {
        /// Backup file path (see `smart-ledger backups`)
        path: String,
        /// Make the restored progress the saved progress
        #[arg(long)]
        apply: bool,
    },
    /// Delete saved progress.
    Clear,
}

pub(crate) fn open_store(settings: &Settings) -> SnapshotStore {
    SnapshotStore::new(settings.progress_path())
}

/// Absolute form of a user-supplied file path, as recorded in snapshots.
pub(crate) fn source_path(file: &str) -> PathBuf {
    PathBuf::from(shellexpand_path(file))
}

/// Category paths from the database, or `None` when it hasn't been initialized.
pub(crate) fn known_category_paths(settings: &Settings) -> Result<Option<Vec<String>>> {
    let db_path = settings.db_path();
    if !db_path.exists() {
        return Ok(None);
    }
    let conn = get_connection(&db_path)?;
    Ok(Some(resolve_dropdown_list(&conn.categories()?)))
}

/// Parse repeated `ROW=CATEGORY` arguments.
pub(crate) fn parse_assignments(args: &[String]) -> Result<BTreeMap<usize, String>> {
    let mut out = BTreeMap::new();
    for arg in args {
        let (row, category) = arg
            .split_once('=')
            .ok_or_else(|| LedgerError::Other(format!("Expected ROW=CATEGORY, got '{arg}'")))?;
        let row: usize = row
            .trim()
            .parse()
            .map_err(|_| LedgerError::Other(format!("Invalid row number '{}'", row.trim())))?;
        out.insert(row, category.trim().to_string());
    }
    Ok(out)
}

/// Match user input against known category paths: exact path first, then a
/// unique leaf name (case-insensitive).
pub(crate) fn match_category(input: &str, paths: &[String]) -> Result<String> {
    if let Some(path) = paths.iter().find(|p| p.as_str() == input) {
        return Ok(path.clone());
    }
    let wanted = input.to_lowercase();
    let leaf_matches: Vec<&String> = paths
        .iter()
        .filter(|p| {
            p.rsplit(PATH_SEPARATOR)
                .next()
                .map(|leaf| leaf.to_lowercase() == wanted)
                .unwrap_or(false)
        })
        .collect();
    match leaf_matches.as_slice() {
        [only] => Ok((*only).clone()),
        [] => Err(LedgerError::UnknownCategory(input.to_string())),
        many => Err(LedgerError::Other(format!(
            "Category '{input}' is ambiguous: {}",
            many.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
        ))),
    }
}

/// Ask a yes/no question on stdin. Anything but y/yes is a no.
pub(crate) fn confirm(prompt: &str) -> bool {
    println!("{prompt} [y/N]: ");
    let mut input = String::new();
    if std::io::stdin().read_line(&mut input).is_err() {
        return false;
    }
    matches!(input.trim().to_lowercase().as_str(), "y" | "yes")
}
