use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::models::RunSummary;

/// Write one run summary as a JSON file under `dir`.
///
/// Files are named by the run's start timestamp, so the reports directory is
/// an append-only log — one file per execution, never overwritten.
pub fn write_summary(dir: &Path, summary: &RunSummary) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create reports directory: {}", dir.display()))?;

    let stamp = summary.run_started.format("%Y%m%d_%H%M%S");
    let path = dir.join(format!("run_{}.json", stamp));

    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write run summary: {}", path.display()))?;

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use tempfile::TempDir;

    fn sample_summary() -> RunSummary {
        RunSummary {
            run_started: Utc::now(),
            run_ended: Utc::now(),
            total_scanned: 3,
            added: 1,
            updated: 1,
            skipped: 1,
            failed: 0,
            attached_to_collection: true,
            attach_errors: vec![],
            ledger_path: "data/upload_ledger.json".to_string(),
        }
    }

    #[test]
    fn test_write_summary_roundtrip() {
        let tmp = TempDir::new().unwrap();
        let summary = sample_summary();

        let path = write_summary(tmp.path(), &summary).unwrap();
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("run_"));

        let content = std::fs::read_to_string(&path).unwrap();
        let parsed: RunSummary = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.total_scanned, 3);
        assert_eq!(parsed.added, 1);
        assert!(parsed.attached_to_collection);
    }

    #[test]
    fn test_counts_reconcile() {
        let summary = sample_summary();
        assert_eq!(
            summary.added + summary.updated + summary.skipped + summary.failed,
            summary.total_scanned
        );
    }
}
