use anyhow::{bail, Result};
use std::path::Path;
use walkdir::WalkDir;

use crate::models::Document;

/// Enumerate the Markdown corpus under `dir`.
///
/// Names are paths relative to `dir` (forward slashes), which keeps them
/// unique and stable as the join key against the ledger. Results are sorted
/// by name so one run's logs are reproducible.
pub fn scan_documents(dir: &Path) -> Result<Vec<Document>> {
    if !dir.exists() {
        bail!("Docs directory does not exist: {}", dir.display());
    }

    let mut documents = Vec::new();

    for entry in WalkDir::new(dir) {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("md") {
            continue;
        }

        let relative = path.strip_prefix(dir).unwrap_or(path);
        let name = relative
            .to_string_lossy()
            .replace(std::path::MAIN_SEPARATOR, "/");

        let body = std::fs::read_to_string(path)?;
        documents.push(Document { name, body });
    }

    // Sort for deterministic ordering
    documents.sort_by(|a, b| a.name.cmp(&b.name));

    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_scan_filters_and_sorts() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("zeta.md"), "z").unwrap();
        std::fs::write(tmp.path().join("alpha.md"), "a").unwrap();
        std::fs::write(tmp.path().join("notes.txt"), "ignored").unwrap();
        std::fs::create_dir(tmp.path().join("guides")).unwrap();
        std::fs::write(tmp.path().join("guides").join("setup.md"), "s").unwrap();

        let docs = scan_documents(tmp.path()).unwrap();
        let names: Vec<_> = docs.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["alpha.md", "guides/setup.md", "zeta.md"]);
        assert_eq!(docs[0].body, "a");
    }

    #[test]
    fn test_scan_missing_dir_fails() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(scan_documents(&missing).is_err());
    }
}
