//! Core data types for the synchronization engine.
//!
//! These types flow through the whole pipeline: documents come in from the
//! scanner, ledger entries record what has been published, and a run summary
//! comes out the other end.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A local document as produced by the scanner. Rebuilt fresh each run;
/// never persisted by the engine itself.
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique, filesystem-safe name. Acts as the join key against the ledger.
    pub name: String,
    /// Raw Markdown body.
    pub body: String,
}

/// One published document as recorded in the ledger.
///
/// The `hash` always reflects the content of the artifact currently referenced
/// by `id`. If an upload succeeds but the ledger write is never reached, the
/// entry is stale and the next run re-uploads (at-least-once semantics).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Opaque artifact id assigned by the remote store.
    pub id: String,
    /// Lowercase hex SHA-256 of the document body at upload time.
    pub hash: String,
    /// When the artifact was uploaded.
    pub uploaded_at: DateTime<Utc>,
}

/// The full mapping of document name to its last-published artifact.
///
/// Read whole at run start, written whole at run end. A `BTreeMap` keeps the
/// serialized form stable across runs. Entries are never removed: the source
/// corpus is fully regenerated each time and may legitimately omit names
/// without implying remote retirement.
pub type Ledger = BTreeMap<String, LedgerEntry>;

/// Structured record of one synchronization pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_started: DateTime<Utc>,
    pub run_ended: DateTime<Utc>,
    /// Documents seen this run (`added + updated + skipped + failed`).
    pub total_scanned: usize,
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
    /// Documents whose upload failed; excluded from the ledger update.
    pub failed: usize,
    /// Whether at least one attach batch reached the collection.
    pub attached_to_collection: bool,
    /// One entry per attach batch that failed. Uploaded artifacts from these
    /// batches remain orphaned until a future run re-attaches them.
    #[serde(default)]
    pub attach_errors: Vec<String>,
    pub ledger_path: String,
}
