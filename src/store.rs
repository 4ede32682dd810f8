//! Remote vector-store client.
//!
//! Defines the [`RemoteStore`] trait — the capability seam the sync engine
//! talks through — and [`OpenAiStore`], the production implementation against
//! the OpenAI Files + Vector Stores API.
//!
//! # Retry Strategy
//!
//! Transient failures are retried inside the client with exponential backoff:
//! - HTTP 429 (rate limited) and 5xx (server error) → retry
//! - HTTP 4xx (client error, not 429) → fail immediately
//! - Network errors → retry
//! - Backoff: 1s, 2s, 4s, 8s, 16s, 32s (capped at 2^5)
//!
//! When retries are exhausted the last error surfaces as a [`StoreError`];
//! the caller decides whether that fails one document or the whole run.

use async_trait::async_trait;
use reqwest::multipart;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

use crate::config::StoreConfig;

/// Upper bound on ids per attach call. The remote API bounds batch
/// cardinality; callers chunk larger id lists into batches of this size.
pub const ATTACH_BATCH_SIZE: usize = 50;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("api key environment variable {0} not set")]
    MissingApiKey(String),

    #[error("remote store returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response shape: {0}")]
    InvalidResponse(String),
}

/// Operations the sync engine needs from the remote store.
///
/// Implementations must be safe to call repeatedly: upload creates a new
/// artifact each time (the ledger deduplicates), while the listing, lookup,
/// and delete operations are idempotent on the remote side.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// List remote artifacts as name → id.
    ///
    /// Best-effort diagnostic only: upload labels artifacts with the local
    /// filename, so this listing is not guaranteed to line up with ledger
    /// names. The ledger, not this listing, drives sync decisions.
    async fn list_artifacts(&self) -> Result<HashMap<String, String>, StoreError>;

    /// Upload a document body as a new artifact and return its id.
    async fn upload_artifact(&self, name: &str, content: &[u8]) -> Result<String, StoreError>;

    /// Delete an artifact. Callers treat failure as a resource leak, not a
    /// correctness violation.
    async fn delete_artifact(&self, id: &str) -> Result<(), StoreError>;

    /// List collections as name → id.
    async fn list_collections(&self) -> Result<HashMap<String, String>, StoreError>;

    /// Create a collection and return its id.
    async fn create_collection(&self, name: &str) -> Result<String, StoreError>;

    /// Attach one batch of artifacts (at most [`ATTACH_BATCH_SIZE`] ids) to a
    /// collection. Each batch call is independent of the others.
    async fn attach_artifacts(
        &self,
        collection_id: &str,
        artifact_ids: &[String],
    ) -> Result<(), StoreError>;
}

/// [`RemoteStore`] backed by the OpenAI Files + Vector Stores API.
///
/// All configuration — endpoint, credentials, retry limit, timeout — is
/// passed in at construction; the client holds no process-wide state.
pub struct OpenAiStore {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    max_retries: u32,
}

impl OpenAiStore {
    /// Build a client from configuration, resolving the API key from the
    /// environment variable the config names.
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let api_key = std::env::var(&config.api_key_env)
            .map_err(|_| StoreError::MissingApiKey(config.api_key_env.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            max_retries: config.max_retries,
        })
    }

    /// Send a request, retrying transient failures, and parse the JSON body.
    ///
    /// The request is rebuilt by `make` on every attempt because multipart
    /// bodies cannot be cloned.
    async fn request_json<F>(&self, make: F) -> Result<Value, StoreError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s, 4s, 8s, ...
                let delay = Duration::from_secs(1 << (attempt - 1).min(5));
                tokio::time::sleep(delay).await;
            }

            let resp = make()
                .header("Authorization", format!("Bearer {}", self.api_key))
                .header("OpenAI-Beta", "assistants=v2")
                .send()
                .await;

            match resp {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.json().await?);
                    }

                    let body = response.text().await.unwrap_or_default();

                    // Rate limited or server error — retry
                    if status.as_u16() == 429 || status.is_server_error() {
                        last_err = Some(StoreError::Api {
                            status: status.as_u16(),
                            body,
                        });
                        continue;
                    }

                    // Client error (not 429) — don't retry
                    return Err(StoreError::Api {
                        status: status.as_u16(),
                        body,
                    });
                }
                Err(e) => {
                    last_err = Some(e.into());
                    continue;
                }
            }
        }

        Err(last_err
            .unwrap_or_else(|| StoreError::InvalidResponse("retries exhausted".to_string())))
    }

    /// Walk a cursor-paginated list endpoint and collect name → id.
    async fn list_paginated(&self, path: &str) -> Result<HashMap<String, String>, StoreError> {
        let mut out = HashMap::new();
        let mut after: Option<String> = None;

        loop {
            let url = match &after {
                Some(cursor) => format!("{}{}?limit=100&after={}", self.base_url, path, cursor),
                None => format!("{}{}?limit=100", self.base_url, path),
            };
            let json = self.request_json(|| self.client.get(&url)).await?;

            let data = json
                .get("data")
                .and_then(|d| d.as_array())
                .ok_or_else(|| StoreError::InvalidResponse("missing data array".to_string()))?;

            let mut last_id = None;
            for item in data {
                let id = item
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| StoreError::InvalidResponse("item missing id".to_string()))?;
                // Files carry `filename`; vector stores carry `name`.
                let label = item
                    .get("filename")
                    .or_else(|| item.get("name"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                out.insert(label.to_string(), id.to_string());
                last_id = Some(id.to_string());
            }

            let has_more = json.get("has_more").and_then(|v| v.as_bool()).unwrap_or(false);
            match (has_more, last_id) {
                (true, Some(cursor)) => after = Some(cursor),
                _ => break,
            }
        }

        Ok(out)
    }
}

/// Pull the opaque `id` field out of a JSON response.
fn extract_id(json: &Value) -> Result<String, StoreError> {
    json.get("id")
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
        .ok_or_else(|| StoreError::InvalidResponse("missing id".to_string()))
}

#[async_trait]
impl RemoteStore for OpenAiStore {
    async fn list_artifacts(&self) -> Result<HashMap<String, String>, StoreError> {
        self.list_paginated("/files").await
    }

    async fn upload_artifact(&self, name: &str, content: &[u8]) -> Result<String, StoreError> {
        let url = format!("{}/files", self.base_url);
        let name = name.to_string();
        let content = content.to_vec();

        let json = self
            .request_json(|| {
                let form = multipart::Form::new()
                    .part(
                        "file",
                        multipart::Part::bytes(content.clone()).file_name(name.clone()),
                    )
                    .text("purpose", "assistants");
                self.client.post(&url).multipart(form)
            })
            .await?;

        extract_id(&json)
    }

    async fn delete_artifact(&self, id: &str) -> Result<(), StoreError> {
        let url = format!("{}/files/{}", self.base_url, id);
        self.request_json(|| self.client.delete(&url)).await?;
        Ok(())
    }

    async fn list_collections(&self) -> Result<HashMap<String, String>, StoreError> {
        self.list_paginated("/vector_stores").await
    }

    async fn create_collection(&self, name: &str) -> Result<String, StoreError> {
        let url = format!("{}/vector_stores", self.base_url);
        let body = serde_json::json!({ "name": name });
        let json = self
            .request_json(|| self.client.post(&url).json(&body))
            .await?;
        extract_id(&json)
    }

    async fn attach_artifacts(
        &self,
        collection_id: &str,
        artifact_ids: &[String],
    ) -> Result<(), StoreError> {
        debug_assert!(artifact_ids.len() <= ATTACH_BATCH_SIZE);

        let url = format!("{}/vector_stores/{}/file_batches", self.base_url, collection_id);
        let body = serde_json::json!({ "file_ids": artifact_ids });
        self.request_json(|| self.client.post(&url).json(&body))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_id() {
        let json = serde_json::json!({ "id": "file-abc", "object": "file" });
        assert_eq!(extract_id(&json).unwrap(), "file-abc");

        let json = serde_json::json!({ "object": "file" });
        assert!(extract_id(&json).is_err());
    }

    #[test]
    fn test_missing_api_key() {
        let config = StoreConfig {
            api_key_env: "CORPUS_SYNC_TEST_KEY_THAT_DOES_NOT_EXIST".to_string(),
            ..StoreConfig::default()
        };
        match OpenAiStore::new(&config) {
            Err(StoreError::MissingApiKey(var)) => {
                assert_eq!(var, "CORPUS_SYNC_TEST_KEY_THAT_DOES_NOT_EXIST")
            }
            other => panic!("expected MissingApiKey, got {:?}", other.map(|_| ())),
        }
    }
}
