use std::collections::BTreeMap;

use chrono::{DateTime, Local};

use crate::models::{ProgressSnapshot, TableRow, TransactionRecord, SNAPSHOT_SCHEMA_VERSION};

/// Capture the displayed table plus the user's decisions as a snapshot stamped now.
///
/// `confirmed` holds only rows with a user-chosen category; `suggested` holds
/// advisory categories and never affects confirmation.
pub fn build_snapshot(
    file_path: &str,
    file_hash: &str,
    rows: &[TableRow],
    confirmed: &BTreeMap<usize, String>,
    suggested: &BTreeMap<usize, String>,
) -> ProgressSnapshot {
    build_snapshot_at(file_path, file_hash, rows, confirmed, suggested, Local::now())
}

pub fn build_snapshot_at(
    file_path: &str,
    file_hash: &str,
    rows: &[TableRow],
    confirmed: &BTreeMap<usize, String>,
    suggested: &BTreeMap<usize, String>,
    at: DateTime<Local>,
) -> ProgressSnapshot {
    let transactions: Vec<TransactionRecord> = rows
        .iter()
        .enumerate()
        .map(|(row_index, row)| {
            let category = confirmed.get(&row_index).cloned();
            TransactionRecord {
                row_index,
                transaction_id: row
                    .transaction_id
                    .clone()
                    .unwrap_or_else(|| format!("row-{row_index}")),
                is_confirmed: category.is_some(),
                user_confirmed_category: category,
                ai_suggested_category: suggested.get(&row_index).cloned(),
                fields: row.fields.clone(),
            }
        })
        .collect();

    let processed_rows = transactions.iter().filter(|t| t.is_confirmed).count();
    let current_row_index = confirmed
        .keys()
        .next_back()
        .map_or(-1, |&row| row as i64);

    ProgressSnapshot {
        schema_version: SNAPSHOT_SCHEMA_VERSION,
        file_path: file_path.to_string(),
        file_hash: file_hash.to_string(),
        total_rows: rows.len(),
        processed_rows,
        current_row_index,
        timestamp: at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        transactions,
    }
}
