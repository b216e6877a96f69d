use comfy_table::{Cell, Table};

use crate::db::{get_connection, CategorySource};
use crate::error::{LedgerError, Result};
use crate::paths::resolve_all;
use crate::settings::load_settings;

pub fn list() -> Result<()> {
    let settings = load_settings();
    let db_path = settings.db_path();
    if !db_path.exists() {
        return Err(LedgerError::Other(
            "Database not found. Run `smart-ledger init` to set up.".to_string(),
        ));
    }
    let conn = get_connection(&db_path)?;
    let categories = conn.categories()?;
    let paths = resolve_all(&categories);

    let mut rows: Vec<_> = categories
        .iter()
        .map(|c| (paths.get(&c.id).cloned().unwrap_or_default(), c))
        .collect();
    rows.sort_by(|a, b| a.0.cmp(&b.0));

    let mut table = Table::new();
    table.set_header(vec!["ID", "Category", "Type", "Level"]);
    for (path, cat) in rows {
        table.add_row(vec![
            Cell::new(cat.id),
            Cell::new(path),
            Cell::new(&cat.category_type),
            Cell::new(cat.level),
        ]);
    }
    println!("Categories\n{table}");
    Ok(())
}
