//! # Corpus Sync CLI (`csync`)
//!
//! Pushes a regenerated Markdown corpus to a remote vector store, uploading
//! only what changed since the last run.
//!
//! ```bash
//! csync --config ./config/csync.toml sync
//! csync --config ./config/csync.toml sync --dry-run
//! csync --config ./config/csync.toml status
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use corpus_sync::config::load_config;
use corpus_sync::ledger::LedgerStore;
use corpus_sync::report;
use corpus_sync::scan::scan_documents;
use corpus_sync::store::OpenAiStore;
use corpus_sync::sync::{classify, run_sync, DocAction};

/// Corpus Sync — keep a remote vector store in step with a local
/// Markdown corpus.
#[derive(Parser)]
#[command(
    name = "csync",
    about = "Incremental synchronizer between a local Markdown corpus and a remote vector store",
    version
)]
struct Cli {
    /// Path to configuration file (TOML).
    #[arg(long, global = true, default_value = "./config/csync.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize the corpus with the remote store.
    ///
    /// Scans the docs directory, uploads added/changed documents, retires
    /// stale artifacts, attaches new uploads to the configured collection,
    /// and writes a run summary.
    Sync {
        /// Classify documents and print counts without any network call.
        #[arg(long)]
        dry_run: bool,

        /// Maximum number of documents to process.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show ledger status: entry count and most recent upload.
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    match cli.command {
        Commands::Sync { dry_run, limit } => {
            let mut documents = scan_documents(&config.docs.dir)?;
            if let Some(limit) = limit {
                documents.truncate(limit);
            }

            let ledger_store = LedgerStore::new(&config.ledger.path);

            if dry_run {
                let ledger = ledger_store.load()?;
                let (mut added, mut updated, mut skipped) = (0, 0, 0);
                for doc in &documents {
                    match classify(&ledger, doc) {
                        DocAction::Added { .. } => added += 1,
                        DocAction::Updated { .. } => updated += 1,
                        DocAction::Skipped => skipped += 1,
                    }
                }
                println!("sync (dry-run)");
                println!("  documents found: {}", documents.len());
                println!("  would add: {}", added);
                println!("  would update: {}", updated);
                println!("  unchanged: {}", skipped);
                return Ok(());
            }

            let store = OpenAiStore::new(&config.store)?;
            let summary = run_sync(
                &store,
                &ledger_store,
                &documents,
                &config.sync.collection,
            )
            .await?;

            let report_path = report::write_summary(&config.reports.dir, &summary)?;

            println!("sync");
            println!("  scanned: {}", summary.total_scanned);
            println!("  added: {}", summary.added);
            println!("  updated: {}", summary.updated);
            println!("  skipped: {}", summary.skipped);
            if summary.failed > 0 {
                println!("  failed: {}", summary.failed);
            }
            for err in &summary.attach_errors {
                println!("  attach error: {}", err);
            }
            println!("  report: {}", report_path.display());
            println!("ok");

            if summary.failed > 0 || !summary.attach_errors.is_empty() {
                std::process::exit(1);
            }
        }
        Commands::Status => {
            let ledger = LedgerStore::new(&config.ledger.path).load()?;
            println!("ledger: {}", config.ledger.path.display());
            println!("  entries: {}", ledger.len());
            if let Some((name, entry)) = ledger.iter().max_by_key(|(_, e)| e.uploaded_at) {
                println!("  newest upload: {} at {}", name, entry.uploaded_at);
            }
        }
    }

    Ok(())
}
