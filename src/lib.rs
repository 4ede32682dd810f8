//! # Corpus Sync
//!
//! Incremental synchronizer between a local Markdown corpus and a remote
//! vector store.
//!
//! The corpus is periodically regenerated from an external content source;
//! this crate's job is to keep the remote document index in step with it
//! while touching the network as little as possible. A persisted ledger
//! records what was last published, so each run uploads only documents whose
//! content fingerprint changed, retires the stale remote artifacts, groups
//! everything new into one named collection, and writes an auditable run
//! record.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌───────────────┐   ┌──────────────┐
//! │  scan    │──▶│     sync      │──▶│ RemoteStore  │
//! │ docs dir │   │ classify +    │   │ upload/delete│
//! └──────────┘   │ upload/attach │   │ attach       │
//!                └──────┬────────┘   └──────────────┘
//!                       │
//!              ┌────────┴────────┐
//!              ▼                 ▼
//!        ┌──────────┐      ┌──────────┐
//!        │  ledger  │      │  report  │
//!        │  (JSON)  │      │ (1/run)  │
//!        └──────────┘      └──────────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`hash`] | Content fingerprinting (SHA-256) |
//! | [`scan`] | Markdown corpus enumeration |
//! | [`ledger`] | Durable upload ledger |
//! | [`store`] | Remote vector-store client |
//! | [`sync`] | Planner/executor for one sync pass |
//! | [`report`] | Per-run summary files |

pub mod config;
pub mod hash;
pub mod ledger;
pub mod models;
pub mod report;
pub mod scan;
pub mod store;
pub mod sync;
