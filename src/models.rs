use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Version written into every snapshot. Files without the field are read as this version.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Text shown by the category dropdown before the user picks anything.
pub const PLACEHOLDER_CATEGORY: &str = "Select a category";

/// Keys a transaction record writes itself; display columns must not reuse them.
pub const RECORD_FIELD_NAMES: [&str; 5] = [
    "row_index",
    "transaction_id",
    "is_confirmed",
    "user_confirmed_category",
    "ai_suggested_category",
];

fn current_schema_version() -> u32 {
    SNAPSHOT_SCHEMA_VERSION
}

/// Map a dropdown selection to a category. The placeholder and blank text mean "none".
pub fn normalize_category(selection: &str) -> Option<String> {
    let trimmed = selection.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_CATEGORY {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Durable description of classification progress against one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressSnapshot {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,
    pub file_path: String,
    pub file_hash: String,
    pub total_rows: usize,
    pub processed_rows: usize,
    /// Last row the user classified, -1 when none.
    pub current_row_index: i64,
    pub timestamp: String,
    pub transactions: Vec<TransactionRecord>,
}

impl ProgressSnapshot {
    pub fn confirmed_count(&self) -> usize {
        self.transactions
            .iter()
            .filter(|t| t.user_confirmed_category.is_some())
            .count()
    }

    /// Reset `processed_rows` to the number of confirmed transactions.
    pub fn recount_processed(&mut self) {
        self.processed_rows = self.confirmed_count();
    }

    /// Row index to confirmed category, for handing back to the table.
    pub fn category_map(&self) -> BTreeMap<usize, String> {
        self.transactions
            .iter()
            .filter_map(|t| {
                t.user_confirmed_category
                    .as_ref()
                    .map(|c| (t.row_index, c.clone()))
            })
            .collect()
    }

    pub fn suggestion_map(&self) -> BTreeMap<usize, String> {
        self.transactions
            .iter()
            .filter_map(|t| {
                t.ai_suggested_category
                    .as_ref()
                    .map(|c| (t.row_index, c.clone()))
            })
            .collect()
    }
}

/// Classification state of one table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub row_index: usize,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub is_confirmed: bool,
    #[serde(default)]
    pub user_confirmed_category: Option<String>,
    #[serde(default)]
    pub ai_suggested_category: Option<String>,
    /// Display columns copied from the source row (description, amounts, ...).
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

/// One undoable category change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditHistoryEntry {
    pub row: usize,
    pub previous_category: Option<String>,
    pub current_category: Option<String>,
}

/// Flat category row as supplied by the category store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub category_type: String,
    pub level: u8,
}

/// A row of the displayed transaction table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableRow {
    /// Identifier of the stored transaction, if the row has been persisted.
    pub transaction_id: Option<String>,
    pub fields: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProgressSummary {
    pub file_name: String,
    pub progress_percentage: f64,
    pub remaining_rows: usize,
    pub total_rows: usize,
    pub processed_rows: usize,
    pub last_saved_time: String,
}
