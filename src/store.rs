use std::collections::HashSet;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{Result, ValidationError};
use crate::models::{
    ProgressSnapshot, ProgressSummary, RECORD_FIELD_NAMES, SNAPSHOT_SCHEMA_VERSION,
};

/// Fields every persisted snapshot must carry.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "file_path",
    "file_hash",
    "total_rows",
    "processed_rows",
    "current_row_index",
    "timestamp",
    "transactions",
];

/// Owns the single JSON file holding the current classification snapshot.
///
/// Contract violations come back as `Err`; filesystem trouble is logged and
/// reported as `false` / `None` so a missing or damaged file degrades to a
/// fresh start.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    pub fn save(&self, snapshot: &ProgressSnapshot) -> Result<bool> {
        validate_snapshot(snapshot)?;
        match write_snapshot(&self.path, snapshot) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), rows = snapshot.transactions.len(), "snapshot saved");
                Ok(true)
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to save snapshot");
                Ok(false)
            }
        }
    }

    /// Save an untyped snapshot document, reporting every missing required field.
    pub fn save_document(&self, document: &Value) -> Result<bool> {
        validate_document(document)?;
        let snapshot: ProgressSnapshot = serde_json::from_value(document.clone())
            .map_err(|e| ValidationError::Malformed(e.to_string()))?;
        self.save(&snapshot)
    }

    pub fn load(&self) -> Option<ProgressSnapshot> {
        read_snapshot(&self.path)
    }

    pub fn clear(&self) -> bool {
        if !self.path.exists() {
            return true;
        }
        match fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "snapshot cleared");
                true
            }
            Err(e) => {
                tracing::error!(path = %self.path.display(), error = %e, "failed to delete snapshot");
                false
            }
        }
    }

    pub fn summary(&self) -> Option<ProgressSummary> {
        let snapshot = self.load()?;
        let file_name = Path::new(&snapshot.file_path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default();
        let progress_percentage = if snapshot.total_rows > 0 {
            snapshot.processed_rows as f64 / snapshot.total_rows as f64 * 100.0
        } else {
            0.0
        };
        Some(ProgressSummary {
            file_name,
            progress_percentage,
            remaining_rows: snapshot.total_rows.saturating_sub(snapshot.processed_rows),
            total_rows: snapshot.total_rows,
            processed_rows: snapshot.processed_rows,
            last_saved_time: snapshot.timestamp,
        })
    }
}

/// Check the structural contract of a typed snapshot.
pub fn validate_snapshot(snapshot: &ProgressSnapshot) -> std::result::Result<(), ValidationError> {
    let missing: Vec<String> = [
        ("file_path", &snapshot.file_path),
        ("file_hash", &snapshot.file_hash),
        ("timestamp", &snapshot.timestamp),
    ]
    .iter()
    .filter(|(_, value)| value.trim().is_empty())
    .map(|(name, _)| name.to_string())
    .collect();
    if !missing.is_empty() {
        return Err(ValidationError::MissingFields(missing));
    }

    if snapshot.current_row_index < -1 {
        return Err(ValidationError::InvalidRowIndex(snapshot.current_row_index));
    }
    if snapshot.processed_rows > snapshot.total_rows {
        return Err(ValidationError::ProcessedExceedsTotal {
            processed: snapshot.processed_rows,
            total: snapshot.total_rows,
        });
    }

    let mut seen = HashSet::new();
    for t in &snapshot.transactions {
        if !seen.insert(t.row_index) {
            return Err(ValidationError::DuplicateRow(t.row_index));
        }
        if let Some(name) = RECORD_FIELD_NAMES.iter().find(|n| t.fields.contains_key(**n)) {
            return Err(ValidationError::Malformed(format!(
                "row {} has a display field named `{name}`",
                t.row_index
            )));
        }
    }
    Ok(())
}

/// Check that an untyped document carries every required field (null counts as missing).
pub fn validate_document(document: &Value) -> std::result::Result<(), ValidationError> {
    let Some(obj) = document.as_object() else {
        return Err(ValidationError::Malformed("snapshot must be a JSON object".into()));
    };
    let missing: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|f| obj.get(**f).map_or(true, Value::is_null))
        .map(|f| f.to_string())
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingFields(missing))
    }
}

/// Parse a snapshot file. Missing, unreadable, incomplete or too-new files yield `None`.
pub(crate) fn read_snapshot(path: &Path) -> Option<ProgressSnapshot> {
    if !path.exists() {
        return None;
    }
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "failed to read snapshot");
            return None;
        }
    };
    let document: Value = match serde_json::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot is not valid JSON");
            return None;
        }
    };
    if let Err(e) = validate_document(&document) {
        tracing::warn!(path = %path.display(), error = %e, "snapshot is incomplete");
        return None;
    }
    let version = document
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(SNAPSHOT_SCHEMA_VERSION as u64);
    if version > SNAPSHOT_SCHEMA_VERSION as u64 {
        tracing::warn!(path = %path.display(), version, "snapshot written by a newer version");
        return None;
    }
    match serde_json::from_value(document) {
        Ok(snapshot) => Some(snapshot),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "snapshot has unexpected field types");
            None
        }
    }
}

/// `<path><suffix>` next to the original file.
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write_snapshot(path: &Path, snapshot: &ProgressSnapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = sibling_path(path, ".tmp");
    let written = fs::write(&tmp, format!("{json}\n")).and_then(|()| fs::rename(&tmp, path));
    if let Err(e) = written {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }
    Ok(())
}
