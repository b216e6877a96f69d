use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::consistency::{file_digest, is_consistent};
use crate::error::Result;
use crate::session::ClassificationSession;
use crate::settings::load_settings;
use crate::table::read_csv_rows;

use super::{confirm, open_store, source_path};

pub fn run(file: &str, force: bool) -> Result<()> {
    let settings = load_settings();
    let store = open_store(&settings);
    let Some(snapshot) = store.load() else {
        println!("No saved progress. Starting fresh.");
        return Ok(());
    };

    let path = source_path(file);
    let file_path = path.to_string_lossy().to_string();
    let hash = file_digest(&path)?;

    if !is_consistent(&store, &file_path, &hash) {
        println!(
            "{}",
            "Saved progress was taken against a different file or an older version of it.".yellow()
        );
        if !force && !confirm("Resume anyway?") {
            println!("Starting fresh.");
            return Ok(());
        }
    }

    let rows = read_csv_rows(&path)?;
    let mut session = ClassificationSession::new(settings.undo_limit);
    session.open_file(&file_path, &hash, rows);
    let restored = session.apply_snapshot(&snapshot);

    let mut table = Table::new();
    table.set_header(vec!["Row", "Category", "Suggested"]);
    for row in 0..session.row_count() {
        let category = session.category(row);
        let suggested = session.suggestions().get(&row);
        if category.is_none() && suggested.is_none() {
            continue;
        }
        table.add_row(vec![
            Cell::new(row),
            Cell::new(category.unwrap_or_default()),
            Cell::new(suggested.map(String::as_str).unwrap_or_default()),
        ]);
    }
    println!("Restored progress\n{table}");
    println!(
        "{restored} of {} rows classified. Last row: {}",
        session.row_count(),
        snapshot.current_row_index
    );
    Ok(())
}
