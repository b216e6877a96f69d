use std::collections::BTreeMap;

use crate::builder::build_snapshot;
use crate::error::{LedgerError, Result};
use crate::history::EditHistory;
use crate::models::{normalize_category, EditHistoryEntry, ProgressSnapshot, TableRow};

/// In-memory state of one classification sitting: the loaded table, the
/// user's confirmed categories, advisory suggestions and the undo history.
#[derive(Debug, Clone)]
pub struct ClassificationSession {
    file_path: String,
    file_hash: String,
    rows: Vec<TableRow>,
    confirmed: BTreeMap<usize, String>,
    suggested: BTreeMap<usize, String>,
    history: EditHistory,
}

impl ClassificationSession {
    pub fn new(undo_limit: usize) -> Self {
        Self {
            file_path: String::new(),
            file_hash: String::new(),
            rows: Vec::new(),
            confirmed: BTreeMap::new(),
            suggested: BTreeMap::new(),
            history: EditHistory::new(undo_limit),
        }
    }

    /// Start over on a newly loaded file. Prior decisions and undo history are dropped.
    pub fn open_file(&mut self, file_path: &str, file_hash: &str, rows: Vec<TableRow>) {
        self.file_path = file_path.to_string();
        self.file_hash = file_hash.to_string();
        self.rows = rows;
        self.confirmed.clear();
        self.suggested.clear();
        self.history.clear();
        tracing::debug!(path = file_path, rows = self.rows.len(), "classification session opened");
    }

    pub fn file_path(&self) -> &str {
        &self.file_path
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn category(&self, row: usize) -> Option<&str> {
        self.confirmed.get(&row).map(String::as_str)
    }

    pub fn categories(&self) -> &BTreeMap<usize, String> {
        &self.confirmed
    }

    pub fn suggestions(&self) -> &BTreeMap<usize, String> {
        &self.suggested
    }

    /// Apply a dropdown selection to `row`. The placeholder clears the row.
    /// Returns whether anything changed.
    pub fn set_category(&mut self, row: usize, selection: &str) -> Result<bool> {
        self.check_row(row)?;
        let previous = self.confirmed.get(&row).cloned().unwrap_or_default();
        if !self.history.push(row, &previous, selection) {
            return Ok(false);
        }
        self.assign(row, normalize_category(selection));
        Ok(true)
    }

    /// Record an advisory category. Confirmed categories are never touched.
    pub fn set_suggestion(&mut self, row: usize, category: &str) -> Result<()> {
        self.check_row(row)?;
        match normalize_category(category) {
            Some(c) => self.suggested.insert(row, c),
            None => self.suggested.remove(&row),
        };
        Ok(())
    }

    /// Revert the most recent category change.
    pub fn undo(&mut self) -> Option<EditHistoryEntry> {
        let entry = self.history.pop()?;
        self.assign(entry.row, entry.previous_category.clone());
        Some(entry)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        build_snapshot(
            &self.file_path,
            &self.file_hash,
            &self.rows,
            &self.confirmed,
            &self.suggested,
        )
    }

    /// Load confirmed categories and suggestions from a saved snapshot.
    /// Rows past the end of the current table are skipped. Returns the number
    /// of confirmed categories restored.
    pub fn apply_snapshot(&mut self, snapshot: &ProgressSnapshot) -> usize {
        let row_count = self.rows.len();
        let mut restored = 0;
        for t in &snapshot.transactions {
            if t.row_index >= row_count {
                tracing::warn!(row = t.row_index, row_count, "snapshot row outside current table");
                continue;
            }
            if let Some(category) = &t.user_confirmed_category {
                self.confirmed.insert(t.row_index, category.clone());
                restored += 1;
            }
            if let Some(suggestion) = &t.ai_suggested_category {
                self.suggested.insert(t.row_index, suggestion.clone());
            }
        }
        restored
    }

    fn assign(&mut self, row: usize, category: Option<String>) {
        match category {
            Some(c) => self.confirmed.insert(row, c),
            None => self.confirmed.remove(&row),
        };
    }

    fn check_row(&self, row: usize) -> Result<()> {
        if row < self.rows.len() {
            Ok(())
        } else {
            Err(LedgerError::Other(format!(
                "row {row} is out of range ({} rows loaded)",
                self.rows.len()
            )))
        }
    }
}
