//! Durable record of what has already been published.
//!
//! The ledger is a single JSON file mapping document name to
//! `{id, hash, uploaded_at}`. It is read whole at run start and written whole
//! at run end, so a crash mid-run loses only that run's progress, never prior
//! history. It — not the remote store's own listing — is the source of truth
//! for change detection.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::Ledger;

/// Path-bound loader/saver for the ledger file.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    path: PathBuf,
}

impl LedgerStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the ledger.
    ///
    /// A missing file yields an empty ledger — the first run is not an error.
    /// A file that exists but cannot be parsed is fatal: treating it as empty
    /// would re-upload the whole corpus and orphan every previously published
    /// artifact.
    pub fn load(&self) -> Result<Ledger> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Ledger::new()),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("Failed to read ledger: {}", self.path.display()))
            }
        };

        serde_json::from_str(&content)
            .with_context(|| format!("Ledger file is corrupt: {}", self.path.display()))
    }

    /// Persist the ledger atomically: write a temp file next to the target,
    /// then rename into place. Either the whole updated mapping lands or the
    /// prior file is left untouched.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create ledger directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(ledger)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("Failed to write ledger temp file: {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to replace ledger: {}", self.path.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LedgerEntry;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_empty() {
        let tmp = TempDir::new().unwrap();
        let store = LedgerStore::new(tmp.path().join("ledger.json"));
        let ledger = store.load().unwrap();
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_save_load_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let store = LedgerStore::new(tmp.path().join("nested").join("ledger.json"));

        let mut ledger = Ledger::new();
        ledger.insert(
            "getting-started.md".to_string(),
            LedgerEntry {
                id: "file-abc123".to_string(),
                hash: "aa".repeat(32),
                uploaded_at: Utc::now(),
            },
        );

        store.save(&ledger).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded, ledger);
    }

    #[test]
    fn test_corrupt_ledger_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ledger.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = LedgerStore::new(&path);
        let err = store.load().unwrap_err();
        assert!(err.to_string().contains("corrupt"));
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("ledger.json");
        let store = LedgerStore::new(&path);
        store.save(&Ledger::new()).unwrap();

        let entries: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("ledger.json")]);
    }
}
