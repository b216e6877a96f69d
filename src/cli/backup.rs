use std::path::PathBuf;

use comfy_table::{Cell, Table};

use crate::backup::{create_backup, list_backups, restore_from_backup};
use crate::error::{LedgerError, Result};
use crate::fmt::format_bytes;
use crate::settings::load_settings;

use super::open_store;

pub fn create() -> Result<()> {
    let store = open_store(&load_settings());
    match create_backup(&store) {
        Some(path) => {
            let size = std::fs::metadata(&path)?.len();
            println!("Backup saved to {}", path.display());
            println!("Size: {}", format_bytes(size));
        }
        None if !store.exists() => println!("No saved progress to back up."),
        None => {
            return Err(LedgerError::Other(format!(
                "Could not back up {}",
                store.path().display()
            )))
        }
    }
    Ok(())
}

pub fn list() -> Result<()> {
    let store = open_store(&load_settings());
    let backups = list_backups(&store);
    if backups.is_empty() {
        println!("No backups.");
        return Ok(());
    }
    let mut table = Table::new();
    table.set_header(vec!["Backup", "Size"]);
    for path in backups {
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);
        table.add_row(vec![
            Cell::new(path.display()),
            Cell::new(format_bytes(size)),
        ]);
    }
    println!("Backups\n{table}");
    Ok(())
}

pub fn restore(path: &str, apply: bool) -> Result<()> {
    let backup_path = PathBuf::from(path);
    let snapshot = restore_from_backup(&backup_path).ok_or_else(|| {
        LedgerError::Other(format!("Backup {} is missing or unreadable", backup_path.display()))
    })?;

    println!(
        "Backup of {}: {}/{} rows classified, saved {}",
        snapshot.file_path, snapshot.processed_rows, snapshot.total_rows, snapshot.timestamp
    );

    if apply {
        let store = open_store(&load_settings());
        if !store.save(&snapshot)? {
            return Err(LedgerError::Other(format!(
                "Could not write progress to {}",
                store.path().display()
            )));
        }
        println!("Restored as current progress.");
    }
    Ok(())
}
