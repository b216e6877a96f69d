use std::collections::HashMap;
use std::path::Path;

use rusqlite::Connection;

use crate::error::Result;
use crate::models::CategoryRecord;

pub const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS categories (
    category_id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_name TEXT NOT NULL,
    parent_category_id INTEGER,
    type TEXT NOT NULL CHECK (type IN ('income', 'expense', 'transfer')),
    level INTEGER NOT NULL CHECK (level >= 1 AND level <= 3),
    is_default INTEGER NOT NULL DEFAULT 1,
    created_at TEXT DEFAULT (datetime('now')),
    FOREIGN KEY (parent_category_id) REFERENCES categories(category_id),
    UNIQUE (category_name, parent_category_id)
);
";

// (parent name, name, type, level)
const DEFAULT_CATEGORIES: &[(Option<&str>, &str, &str, u8)] = &[
    (None, "Income", "income", 1),
    (None, "Expense", "expense", 1),
    (None, "Transfer", "transfer", 1),
    // Income
    (Some("Income"), "Earned Income", "income", 2),
    (Some("Income"), "Business Income", "income", 2),
    (Some("Income"), "Investment Income", "income", 2),
    (Some("Income"), "Side Income", "income", 2),
    (Some("Earned Income"), "Salary", "income", 3),
    (Some("Earned Income"), "Bonus", "income", 3),
    (Some("Investment Income"), "Interest", "income", 3),
    (Some("Investment Income"), "Dividends", "income", 3),
    (Some("Side Income"), "Cashback", "income", 3),
    // Expense
    (Some("Expense"), "Food", "expense", 2),
    (Some("Expense"), "Housing", "expense", 2),
    (Some("Expense"), "Transport", "expense", 2),
    (Some("Expense"), "Health", "expense", 2),
    (Some("Expense"), "Leisure", "expense", 2),
    (Some("Food"), "Groceries", "expense", 3),
    (Some("Food"), "Dining Out", "expense", 3),
    (Some("Food"), "Cafe", "expense", 3),
    (Some("Housing"), "Rent", "expense", 3),
    (Some("Housing"), "Utilities", "expense", 3),
    (Some("Transport"), "Public Transit", "expense", 3),
    (Some("Transport"), "Fuel", "expense", 3),
    (Some("Health"), "Medical", "expense", 3),
    (Some("Leisure"), "Subscriptions", "expense", 3),
    (Some("Leisure"), "Travel", "expense", 3),
    // Transfer
    (Some("Transfer"), "Between Own Accounts", "transfer", 2),
    (Some("Transfer"), "Savings", "transfer", 2),
];

/// Supplies the flat category records the path resolver works on.
pub trait CategorySource {
    fn categories(&self) -> Result<Vec<CategoryRecord>>;
}

impl CategorySource for Connection {
    fn categories(&self) -> Result<Vec<CategoryRecord>> {
        list_categories(self)
    }
}

impl CategorySource for [CategoryRecord] {
    fn categories(&self) -> Result<Vec<CategoryRecord>> {
        Ok(self.to_vec())
    }
}

pub fn get_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
    Ok(conn)
}

pub fn init_db(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;

    let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |row| row.get(0))?;
    if count == 0 {
        let mut ids: HashMap<&str, i64> = HashMap::new();
        for (parent, name, category_type, level) in DEFAULT_CATEGORIES {
            let parent_id = parent.and_then(|p| ids.get(p).copied());
            conn.execute(
                "INSERT INTO categories (category_name, parent_category_id, type, level) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![name, parent_id, category_type, level],
            )?;
            ids.insert(*name, conn.last_insert_rowid());
        }
        tracing::info!(count = DEFAULT_CATEGORIES.len(), "seeded default categories");
    }
    Ok(())
}

pub fn list_categories(conn: &Connection) -> Result<Vec<CategoryRecord>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, category_name, parent_category_id, type, level \
         FROM categories ORDER BY level, category_id",
    )?;
    let rows = stmt
        .query_map([], |row| {
            Ok(CategoryRecord {
                id: row.get(0)?,
                name: row.get(1)?,
                parent_id: row.get(2)?,
                category_type: row.get(3)?,
                level: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::{resolve_all, resolve_dropdown_list};

    fn test_db() -> (tempfile::TempDir, Connection) {
        let dir = tempfile::tempdir().unwrap();
        let conn = get_connection(&dir.path().join("test.db")).unwrap();
        init_db(&conn).unwrap();
        (dir, conn)
    }

    #[test]
    fn test_init_db_is_idempotent() {
        let (_dir, conn) = test_db();
        init_db(&conn).unwrap();
        let count: i64 = conn.query_row("SELECT count(*) FROM categories", [], |r| r.get(0)).unwrap();
        assert_eq!(count as usize, DEFAULT_CATEGORIES.len());
    }

    #[test]
    fn test_seeded_tree_resolves() {
        let (_dir, conn) = test_db();
        let cats = conn.categories().unwrap();
        let paths = resolve_all(&cats);
        let cafe = cats.iter().find(|c| c.name == "Cafe").unwrap();
        assert_eq!(cafe.level, 3);
        assert_eq!(paths[&cafe.id], "Expense > Food > Cafe");
        assert!(cats.iter().all(|c| c.level <= crate::paths::MAX_CATEGORY_DEPTH));
    }

    #[test]
    fn test_dropdown_from_db() {
        let (_dir, conn) = test_db();
        let list = resolve_dropdown_list(&conn.categories().unwrap());
        assert_eq!(list.len(), DEFAULT_CATEGORIES.len());
        assert!(list.contains(&"Income > Earned Income > Salary".to_string()));
        let mut sorted = list.clone();
        sorted.sort();
        assert_eq!(list, sorted);
    }

    #[test]
    fn test_level_check_constraint() {
        let (_dir, conn) = test_db();
        let err = conn.execute(
            "INSERT INTO categories (category_name, type, level) VALUES ('Too Deep', 'expense', 4)",
            [],
        );
        assert!(err.is_err());
    }

    #[test]
    fn test_slice_source() {
        let cats = vec![CategoryRecord {
            id: 1,
            name: "Expense".into(),
            parent_id: None,
            category_type: "expense".into(),
            level: 1,
        }];
        assert_eq!(cats.as_slice().categories().unwrap(), cats);
    }
}
