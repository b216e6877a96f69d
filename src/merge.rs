use std::collections::BTreeMap;

use crate::models::{ProgressSnapshot, TransactionRecord};

/// Fold `incoming` into `existing`, producing a new snapshot.
///
/// Scalar fields come from `incoming`. Transactions merge per `row_index`:
/// rows present in `incoming` replace the existing record, rows it doesn't
/// mention keep their existing classification. The result is ordered by
/// `row_index`.
///
/// `processed_rows` is taken from `incoming` as-is even when it no longer
/// matches the merged rows; call [`ProgressSnapshot::recount_processed`] for a
/// count that agrees with the merged transactions.
pub fn merge_snapshots(existing: &ProgressSnapshot, incoming: &ProgressSnapshot) -> ProgressSnapshot {
    let mut rows: BTreeMap<usize, TransactionRecord> = existing
        .transactions
        .iter()
        .map(|t| (t.row_index, t.clone()))
        .collect();
    for t in &incoming.transactions {
        rows.insert(t.row_index, t.clone());
    }

    let merged = ProgressSnapshot {
        transactions: rows.into_values().collect(),
        ..incoming.clone()
    };

    let confirmed = merged.confirmed_count();
    if confirmed != merged.processed_rows {
        tracing::warn!(
            processed_rows = merged.processed_rows,
            confirmed,
            "merged processed_rows disagrees with confirmed transactions"
        );
    }
    tracing::debug!(
        existing = existing.transactions.len(),
        incoming = incoming.transactions.len(),
        merged = merged.transactions.len(),
        "snapshots merged"
    );
    merged
}
