use std::io::Read;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::Result;
use crate::store::SnapshotStore;

/// Hex SHA-256 of the file's bytes. Any edit to the source file changes it.
pub fn file_digest(file_path: &Path) -> Result<String> {
    let mut file = std::fs::File::open(file_path)?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(hex::encode(hasher.finalize()))
}

/// True only when a saved snapshot exists and was taken against exactly this
/// path and content hash.
///
/// Row indexes are positional, so a snapshot taken against different content
/// cannot be replayed onto the current table.
pub fn is_consistent(store: &SnapshotStore, file_path: &str, current_hash: &str) -> bool {
    let Some(snapshot) = store.load() else {
        return false;
    };
    let consistent = snapshot.file_path == file_path && snapshot.file_hash == current_hash;
    if !consistent {
        tracing::info!(
            saved_path = %snapshot.file_path,
            path = file_path,
            hash_matches = snapshot.file_hash == current_hash,
            "saved snapshot does not match the current file"
        );
    }
    consistent
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::tests::scenario_snapshot;

    #[test]
    fn test_scenario_consistency() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("progress.json"));
        store.save(&scenario_snapshot()).unwrap();
        assert!(is_consistent(&store, "t.csv", "h1"));
        assert!(!is_consistent(&store, "t.csv", "h2"));
        assert!(!is_consistent(&store, "other.csv", "h1"));
    }

    #[test]
    fn test_no_snapshot_is_inconsistent() {
        let dir = tempfile::tempdir().unwrap();
        let store = SnapshotStore::new(dir.path().join("progress.json"));
        assert!(!is_consistent(&store, "t.csv", "h1"));
    }

    #[test]
    fn test_file_digest_tracks_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("stmt.csv");
        std::fs::write(&path, "date,description,amount\n2025-01-01,CAFE,-5\n").unwrap();
        let first = file_digest(&path).unwrap();
        assert_eq!(first.len(), 64);
        assert_eq!(first, file_digest(&path).unwrap());

        std::fs::write(&path, "date,description,amount\n2025-01-02,CAFE,-5\n").unwrap();
        assert_ne!(first, file_digest(&path).unwrap());
    }

    #[test]
    fn test_file_digest_known_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        std::fs::write(&path, "").unwrap();
        assert_eq!(
            file_digest(&path).unwrap(),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_file_digest_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(file_digest(&dir.path().join("nope.csv")).is_err());
    }
}
