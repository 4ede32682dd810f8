//! Synchronization planner/executor.
//!
//! Compares the scanned corpus against the ledger, uploads what changed,
//! retires stale artifacts best-effort, persists the ledger, and attaches
//! newly uploaded artifacts to the target collection in batches. One
//! document's failure never aborts the run.

use anyhow::Result;
use chrono::Utc;

use crate::hash::fingerprint;
use crate::ledger::LedgerStore;
use crate::models::{Document, Ledger, LedgerEntry, RunSummary};
use crate::store::{RemoteStore, StoreError, ATTACH_BATCH_SIZE};

/// One document's classification against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocAction {
    /// No prior ledger entry for this name.
    Added { hash: String },
    /// Prior entry exists but its fingerprint differs.
    Updated { hash: String, prev_id: String },
    /// Prior entry matches the current fingerprint; no network call needed.
    Skipped,
}

/// Classify a document against the ledger.
///
/// The ledger is authoritative: it is the only source carrying fingerprint
/// history. Filenames are the join key — a renamed file is indistinguishable
/// from one deletion plus one addition.
pub fn classify(ledger: &Ledger, doc: &Document) -> DocAction {
    let hash = fingerprint(doc.body.as_bytes());

    match ledger.get(&doc.name) {
        None => DocAction::Added { hash },
        Some(prev) if prev.hash == hash => DocAction::Skipped,
        Some(prev) => DocAction::Updated {
            hash,
            prev_id: prev.id.clone(),
        },
    }
}

/// Run one synchronization pass.
///
/// Loads the ledger (a corrupt ledger aborts here, before any network call),
/// classifies and uploads each document, persists the updated ledger, then
/// attaches all newly uploaded artifacts to `collection` in batches of
/// [`ATTACH_BATCH_SIZE`].
///
/// Per-document upload failures are isolated: they are logged, counted in
/// `failed`, excluded from the ledger update and the attach batch, and the
/// run continues. Attach-batch failures after upload are recorded in the
/// summary's `attach_errors` — the artifacts stay orphaned from the
/// collection until attachment is retried — and remaining batches still run.
pub async fn run_sync(
    store: &dyn RemoteStore,
    ledger_store: &LedgerStore,
    documents: &[Document],
    collection: &str,
) -> Result<RunSummary> {
    let run_started = Utc::now();

    let mut ledger = ledger_store.load()?;

    // Best-effort cross-check against the remote listing. Upload labels
    // artifacts with local filenames, so this listing need not line up with
    // ledger names; it never influences classification.
    match store.list_artifacts().await {
        Ok(remote) => {
            let unknown = remote
                .keys()
                .filter(|name| !ledger.contains_key(*name))
                .count();
            println!(
                "remote store lists {} artifacts ({} unknown to the ledger)",
                remote.len(),
                unknown
            );
        }
        Err(e) => eprintln!("Warning: could not list remote artifacts: {}", e),
    }

    let mut added = 0usize;
    let mut updated = 0usize;
    let mut skipped = 0usize;
    let mut failed = 0usize;
    let mut new_ids: Vec<String> = Vec::new();

    for doc in documents {
        let (hash, prev_id) = match classify(&ledger, doc) {
            DocAction::Skipped => {
                skipped += 1;
                continue;
            }
            DocAction::Added { hash } => (hash, None),
            DocAction::Updated { hash, prev_id } => (hash, Some(prev_id)),
        };

        match store.upload_artifact(&doc.name, doc.body.as_bytes()).await {
            Ok(id) => {
                println!("uploaded {} -> {}", doc.name, id);

                if let Some(prev_id) = &prev_id {
                    // Retire the stale version. An orphaned artifact is a
                    // resource leak, not a correctness violation.
                    if let Err(e) = store.delete_artifact(prev_id).await {
                        eprintln!("Warning: failed to delete old artifact {}: {}", prev_id, e);
                    }
                    updated += 1;
                } else {
                    added += 1;
                }

                new_ids.push(id.clone());
                ledger.insert(
                    doc.name.clone(),
                    LedgerEntry {
                        id,
                        hash,
                        uploaded_at: Utc::now(),
                    },
                );
            }
            Err(e) => {
                eprintln!("Warning: failed to upload {}: {}", doc.name, e);
                failed += 1;
            }
        }
    }

    // The ledger reflects exactly the uploads that succeeded this run.
    ledger_store.save(&ledger)?;

    let mut attached = false;
    let mut attach_errors = Vec::new();

    if !new_ids.is_empty() {
        match resolve_collection(store, collection).await {
            Ok(collection_id) => {
                for (batch_no, batch) in new_ids.chunks(ATTACH_BATCH_SIZE).enumerate() {
                    match store.attach_artifacts(&collection_id, batch).await {
                        Ok(()) => {
                            attached = true;
                            println!("attached batch {}: {} artifacts", batch_no + 1, batch.len());
                        }
                        Err(e) => {
                            eprintln!("Warning: attach batch {} failed: {}", batch_no + 1, e);
                            attach_errors.push(format!(
                                "batch {} ({} artifacts): {}",
                                batch_no + 1,
                                batch.len(),
                                e
                            ));
                        }
                    }
                }
            }
            Err(e) => {
                eprintln!("Warning: could not resolve collection {}: {}", collection, e);
                attach_errors.push(format!("collection {}: {}", collection, e));
            }
        }
    }

    Ok(RunSummary {
        run_started,
        run_ended: Utc::now(),
        total_scanned: documents.len(),
        added,
        updated,
        skipped,
        failed,
        attached_to_collection: attached,
        attach_errors,
        ledger_path: ledger_store.path().display().to_string(),
    })
}

/// Resolve the target collection id, reusing an exact name match or creating
/// a new collection when none exists.
async fn resolve_collection(
    store: &dyn RemoteStore,
    name: &str,
) -> Result<String, StoreError> {
    let existing = store.list_collections().await?;

    if let Some(id) = existing.get(name) {
        println!("reusing collection {} ({})", name, id);
        return Ok(id.clone());
    }

    let id = store.create_collection(name).await?;
    println!("created collection {} ({})", name, id);
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: &str, hash: &str) -> LedgerEntry {
        LedgerEntry {
            id: id.to_string(),
            hash: hash.to_string(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_classify_added() {
        let ledger = Ledger::new();
        let doc = Document {
            name: "a.md".to_string(),
            body: "hello".to_string(),
        };
        assert!(matches!(classify(&ledger, &doc), DocAction::Added { .. }));
    }

    #[test]
    fn test_classify_skipped_and_updated() {
        let doc = Document {
            name: "a.md".to_string(),
            body: "hello".to_string(),
        };
        let hash = fingerprint(doc.body.as_bytes());

        let mut ledger = Ledger::new();
        ledger.insert("a.md".to_string(), entry("file-1", &hash));
        assert_eq!(classify(&ledger, &doc), DocAction::Skipped);

        ledger.insert("a.md".to_string(), entry("file-1", "0000"));
        assert_eq!(
            classify(&ledger, &doc),
            DocAction::Updated {
                hash,
                prev_id: "file-1".to_string()
            }
        );
    }
}
