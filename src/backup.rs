use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};

use crate::models::ProgressSnapshot;
use crate::store::{read_snapshot, sibling_path, SnapshotStore};

pub const BACKUP_MARKER: &str = ".backup_";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Copy the saved snapshot to `<snapshot>.backup_<YYYYMMDD_HHMMSS>`.
/// Returns `None` when there is nothing to back up or the copy fails.
pub fn create_backup(store: &SnapshotStore) -> Option<PathBuf> {
    create_backup_at(store, Local::now())
}

/// Backup names have one-second resolution. A second backup within the same
/// second replaces the first.
pub fn create_backup_at(store: &SnapshotStore, at: DateTime<Local>) -> Option<PathBuf> {
    if !store.exists() {
        return None;
    }
    let stamp = at.format(BACKUP_TIMESTAMP_FORMAT);
    let backup_path = sibling_path(store.path(), &format!("{BACKUP_MARKER}{stamp}"));
    if backup_path.exists() {
        tracing::warn!(path = %backup_path.display(), "overwriting backup taken in the same second");
    }
    match fs::copy(store.path(), &backup_path) {
        Ok(_) => {
            tracing::info!(path = %backup_path.display(), "snapshot backed up");
            Some(backup_path)
        }
        Err(e) => {
            tracing::error!(path = %backup_path.display(), error = %e, "failed to back up snapshot");
            None
        }
    }
}

/// Read a snapshot back from a backup file. The live snapshot is left alone;
/// saving the result is up to the caller.
pub fn restore_from_backup(backup_path: &Path) -> Option<ProgressSnapshot> {
    let snapshot = read_snapshot(backup_path)?;
    tracing::info!(path = %backup_path.display(), "snapshot restored from backup");
    Some(snapshot)
}

/// Backups of the store's snapshot, newest first.
pub fn list_backups(store: &SnapshotStore) -> Vec<PathBuf> {
    let Some(file_name) = store.path().file_name() else {
        return Vec::new();
    };
    let prefix = format!("{}{BACKUP_MARKER}", file_name.to_string_lossy());
    let dir = match store.path().parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let entries = match fs::read_dir(&dir) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    let mut backups: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.is_file()
                && p.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
        })
        .collect();
    backups.sort();
    backups.reverse();
    backups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::scenario_snapshot;
    use chrono::TimeZone;

    fn test_store() -> (tempfile::TempDir, SnapshotStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("progress.json"));
        (dir, store)
    }

    #[test]
    fn test_backup_without_snapshot() {
        let (_dir, store) = test_store();
        assert_eq!(create_backup(&store), None);
        assert!(list_backups(&store).is_empty());
    }

    #[test]
    fn test_backup_copies_saved_file() {
        let (_dir, store) = test_store();
        store.save(&scenario_snapshot()).unwrap();
        let at = Local.with_ymd_and_hms(2025, 5, 25, 14, 3, 9).unwrap();
        let backup = create_backup_at(&store, at).unwrap();

        assert!(backup
            .to_string_lossy()
            .ends_with("progress.json.backup_20250525_140309"));
        assert_eq!(
            fs::read_to_string(&backup).unwrap(),
            fs::read_to_string(store.path()).unwrap()
        );
        assert!(store.exists());
    }

    #[test]
    fn test_same_second_backup_replaces_earlier() {
        let (_dir, store) = test_store();
        let at = Local.with_ymd_and_hms(2025, 5, 25, 14, 3, 9).unwrap();
        store.save(&scenario_snapshot()).unwrap();
        let first = create_backup_at(&store, at).unwrap();

        let mut later = scenario_snapshot();
        later.processed_rows = 1;
        store.save(&later).unwrap();
        let second = create_backup_at(&store, at).unwrap();

        assert_eq!(first, second);
        assert_eq!(list_backups(&store), vec![second.clone()]);
        assert_eq!(restore_from_backup(&second), Some(later));
    }

    #[test]
    fn test_restore_roundtrip() {
        let (_dir, store) = test_store();
        store.save(&scenario_snapshot()).unwrap();
        let backup = create_backup(&store).unwrap();
        store.clear();

        assert_eq!(restore_from_backup(&backup), Some(scenario_snapshot()));
        assert!(!store.exists(), "restore must not rewrite the live snapshot");
    }

    #[test]
    fn test_restore_missing_or_corrupt() {
        let (dir, _store) = test_store();
        assert_eq!(restore_from_backup(&dir.path().join("nope")), None);
        let bad = dir.path().join("progress.json.backup_20250101_000000");
        fs::write(&bad, "garbage").unwrap();
        assert_eq!(restore_from_backup(&bad), None);
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (dir, store) = test_store();
        store.save(&scenario_snapshot()).unwrap();
        let older = Local.with_ymd_and_hms(2025, 1, 1, 8, 0, 0).unwrap();
        let newer = Local.with_ymd_and_hms(2025, 2, 1, 8, 0, 0).unwrap();
        create_backup_at(&store, older).unwrap();
        create_backup_at(&store, newer).unwrap();
        fs::write(dir.path().join("unrelated.json"), "{}").unwrap();

        let backups = list_backups(&store);
        assert_eq!(backups.len(), 2);
        assert!(backups[0].to_string_lossy().ends_with("backup_20250201_080000"));
        assert!(backups[1].to_string_lossy().ends_with("backup_20250101_080000"));
    }
}
