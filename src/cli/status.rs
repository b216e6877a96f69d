use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::{format_bytes, percent};
use crate::settings::load_settings;

use super::open_store;

pub fn run() -> Result<()> {
    let settings = load_settings();
    let store = open_store(&settings);

    println!("Data dir:   {}", settings.data_dir);
    println!("Progress:   {}", store.path().display());

    let Some(summary) = store.summary() else {
        println!();
        println!("No saved progress.");
        return Ok(());
    };
    let size = std::fs::metadata(store.path())?.len();

    let mut table = Table::new();
    table.set_header(vec!["File", "Progress", "Classified", "Remaining", "Saved"]);
    table.add_row(vec![
        Cell::new(&summary.file_name),
        Cell::new(percent(summary.progress_percentage)),
        Cell::new(format!("{}/{}", summary.processed_rows, summary.total_rows)),
        Cell::new(summary.remaining_rows),
        Cell::new(&summary.last_saved_time),
    ]);
    println!("Size:       {}", format_bytes(size));
    println!();
    println!("{table}");
    Ok(())
}
