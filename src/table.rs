use std::collections::BTreeMap;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::models::{TableRow, RECORD_FIELD_NAMES};

/// Column that, when present, carries the stored transaction identifier.
pub const TRANSACTION_ID_COLUMN: &str = "transaction_id";

/// Prefix given to source columns whose names clash with record fields.
pub const RENAMED_COLUMN_PREFIX: &str = "source_";

/// Read a headered CSV file into display rows, one per record, columns kept as text.
pub fn read_csv_rows(file_path: &Path) -> Result<Vec<TableRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(file_path)?;
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| {
            if h != TRANSACTION_ID_COLUMN && RECORD_FIELD_NAMES.iter().any(|n| *n == h) {
                tracing::debug!(column = h, "renaming column that clashes with a record field");
                format!("{RENAMED_COLUMN_PREFIX}{h}")
            } else {
                h.to_string()
            }
        })
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let mut fields = BTreeMap::new();
        let mut transaction_id = None;
        for (header, value) in headers.iter().zip(record.iter()) {
            if header == TRANSACTION_ID_COLUMN {
                if !value.is_empty() {
                    transaction_id = Some(value.to_string());
                }
            } else if !header.is_empty() {
                fields.insert(header.clone(), Value::from(value));
            }
        }
        rows.push(TableRow {
            transaction_id,
            fields,
        });
    }
    tracing::debug!(path = %file_path.display(), rows = rows.len(), "read transaction table");
    Ok(rows)
}
