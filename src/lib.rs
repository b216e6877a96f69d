//! Resumable classification sessions for imported transactions: snapshots of
//! classification progress, consistency checks against the source file,
//! snapshot merging, backups and a bounded undo history.

pub mod backup;
pub mod builder;
pub mod cli;
pub mod consistency;
pub mod db;
pub mod error;
pub mod fmt;
pub mod history;
pub mod logging;
pub mod merge;
pub mod models;
pub mod paths;
pub mod session;
pub mod settings;
pub mod store;
pub mod table;

pub use backup::{create_backup, list_backups, restore_from_backup};
pub use builder::build_snapshot;
pub use consistency::{file_digest, is_consistent};
pub use error::{LedgerError, Result, ValidationError};
pub use history::EditHistory;
pub use merge::merge_snapshots;
pub use models::{
    CategoryRecord, EditHistoryEntry, ProgressSnapshot, ProgressSummary, TableRow,
    TransactionRecord,
};
pub use paths::{resolve_all, resolve_dropdown_list};
pub use session::ClassificationSession;
pub use store::SnapshotStore;
