use thiserror::Error;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Database error: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid snapshot: {0}")]
    Validation(#[from] ValidationError),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("{0}")]
    Other(String),
}

/// Contract violations on a snapshot handed to the store. These are caller
/// bugs and are never collapsed into a `false` return.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    #[error("duplicate row_index {0} in transactions")]
    DuplicateRow(usize),

    #[error("processed_rows ({processed}) exceeds total_rows ({total})")]
    ProcessedExceedsTotal { processed: usize, total: usize },

    #[error("current_row_index must be -1 or a row index, got {0}")]
    InvalidRowIndex(i64),

    #[error("malformed snapshot: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;
