use std::collections::BTreeSet;

use colored::Colorize;

use crate::consistency::{file_digest, is_consistent};
use crate::error::{LedgerError, Result};
use crate::merge::merge_snapshots;
use crate::session::ClassificationSession;
use crate::settings::load_settings;
use crate::table::read_csv_rows;

use super::{known_category_paths, match_category, open_store, parse_assignments, source_path};

pub fn run(file: &str, set: &[String], suggest: &[String], merge: bool) -> Result<()> {
    let settings = load_settings();
    let path = source_path(file);
    let file_path = path.to_string_lossy().to_string();
    let hash = file_digest(&path)?;
    let rows = read_csv_rows(&path)?;

    let mut session = ClassificationSession::new(settings.undo_limit);
    session.open_file(&file_path, &hash, rows);

    let store = open_store(&settings);
    let mut existing = None;
    if merge {
        if is_consistent(&store, &file_path, &hash) {
            existing = store.load();
            if let Some(saved) = &existing {
                session.apply_snapshot(saved);
            }
        } else if store.exists() {
            println!(
                "{}",
                "Saved progress belongs to a different file or version; starting fresh.".yellow()
            );
        }
    }

    let known = known_category_paths(&settings)?;
    let resolve = |input: &str| -> Result<String> {
        match &known {
            Some(paths) => match_category(input, paths),
            None => Ok(input.to_string()),
        }
    };

    // Edits apply on top of the restored rows.
    let mut touched = BTreeSet::new();
    for (row, category) in parse_assignments(set)? {
        session.set_category(row, &resolve(&category)?)?;
        touched.insert(row);
    }
    for (row, category) in parse_assignments(suggest)? {
        session.set_suggestion(row, &resolve(&category)?)?;
        touched.insert(row);
    }

    let mut snapshot = session.snapshot();
    if let Some(existing) = existing {
        snapshot.transactions.retain(|t| touched.contains(&t.row_index));
        snapshot = merge_snapshots(&existing, &snapshot);
        snapshot.recount_processed();
    }

    if !store.save(&snapshot)? {
        return Err(LedgerError::Other(format!(
            "Could not write progress to {}",
            store.path().display()
        )));
    }
    println!(
        "Saved progress for {}: {}/{} rows classified",
        file_path, snapshot.processed_rows, snapshot.total_rows
    );
    Ok(())
}
