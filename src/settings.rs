use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{LedgerError, Result};
use crate::history::DEFAULT_UNDO_LIMIT;

/// Overrides the directory holding settings.json.
pub const CONFIG_DIR_ENV: &str = "SMART_LEDGER_CONFIG_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    pub data_dir: String,
    /// Snapshot file name under `<data_dir>/progress`, or an absolute path.
    #[serde(default = "default_progress_file")]
    pub progress_file: String,
    #[serde(default = "default_undo_limit")]
    pub undo_limit: usize,
}

fn default_progress_file() -> String {
    "classification_progress.json".to_string()
}

fn default_undo_limit() -> usize {
    DEFAULT_UNDO_LIMIT
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir().to_string_lossy().to_string(),
            progress_file: default_progress_file(),
            undo_limit: default_undo_limit(),
        }
    }
}

impl Settings {
    pub fn data_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir)
    }

    pub fn progress_path(&self) -> PathBuf {
        let file = PathBuf::from(&self.progress_file);
        if file.is_absolute() {
            file
        } else {
            self.data_path().join("progress").join(file)
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_path().join("smart-ledger.db")
    }
}

fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return PathBuf::from(dir);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("smart-ledger")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_data_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("smart-ledger")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if !path.exists() {
        return Settings::default();
    }
    let content = std::fs::read_to_string(&path).unwrap_or_default();
    match serde_json::from_str(&content) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "unreadable settings, using defaults");
            Settings::default()
        }
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LedgerError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}

pub fn shellexpand_path(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(home) = dirs::home_dir() {
            return path.replacen('~', &home.to_string_lossy(), 1);
        }
    }
    std::path::absolute(path)
        .unwrap_or_else(|_| PathBuf::from(path))
        .to_string_lossy()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.undo_limit, 10);
        assert_eq!(s.progress_file, "classification_progress.json");
        assert!(!s.data_dir.is_empty());
    }

    #[test]
    fn test_load_merges_with_defaults() {
        let json = r#"{"data_dir": "/tmp/ledger"}"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.undo_limit, 10);
        assert_eq!(
            s.progress_path(),
            PathBuf::from("/tmp/ledger/progress/classification_progress.json")
        );
        assert_eq!(s.db_path(), PathBuf::from("/tmp/ledger/smart-ledger.db"));
    }

    #[test]
    fn test_absolute_progress_file() {
        let s = Settings {
            data_dir: "/tmp/ledger".into(),
            progress_file: "/var/tmp/p.json".into(),
            undo_limit: 5,
        };
        assert_eq!(s.progress_path(), PathBuf::from("/var/tmp/p.json"));
    }

    #[test]
    fn test_roundtrip_through_json() {
        let settings = Settings {
            data_dir: "/tmp/test".into(),
            progress_file: "p.json".into(),
            undo_limit: 3,
        };
        let json = serde_json::to_string_pretty(&settings).unwrap();
        let loaded: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(loaded, settings);
    }

    #[test]
    fn test_shellexpand_absolute_passthrough() {
        assert_eq!(shellexpand_path("/tmp/ledger"), "/tmp/ledger");
    }
}
