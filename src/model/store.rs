//! Remote per-user record store
//!
//! The feed only ever talks to the store through [`RemoteStore`]. The
//! bundled [`JsonFileStore`] keeps user documents in memory and mirrors them
//! to a JSON file, optionally delaying every call to behave like a network
//! round trip.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use tokio::sync::RwLock;

/// Field of the user document holding the liked clip keys
pub const LIKED_CLIPS_FIELD: &str = "liked_clips";

/// Raw user document as returned by the store
pub type UserDocument = Value;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Fetch the document of `user_key`, `None` when no such user exists
    async fn read_user_record(&self, user_key: &str) -> Result<Option<UserDocument>>;

    /// Replace the liked clip list of `user_key`
    async fn write_user_record(&self, user_key: &str, liked_clips: &[String]) -> Result<()>;
}

#[derive(Clone)]
pub struct JsonFileStore {
    documents: Arc<RwLock<HashMap<String, UserDocument>>>,
    path: Option<PathBuf>,
    latency: Duration,
}

impl JsonFileStore {
    /// Store that never touches the disk
    pub fn in_memory() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
            path: None,
            latency: Duration::ZERO,
        }
    }

    /// Open the store backed by `path`, loading it when the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            path: Some(path.into()),
            ..Self::in_memory()
        };
        store.load_from_disk().await?;
        Ok(store)
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    async fn load_from_disk(&self) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if path.exists() {
            let content = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("reading store file {}", path.display()))?;
            let loaded: HashMap<String, UserDocument> =
                serde_json::from_str(&content).context("parsing store file")?;
            tracing::debug!(users = loaded.len(), path = %path.display(), "Store loaded from disk");
            *self.documents.write().await = loaded;
        }
        Ok(())
    }

    async fn save_to_disk(&self, documents: &HashMap<String, UserDocument>) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };

        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            if !dir.exists() {
                tokio::fs::create_dir_all(dir).await?;
            }
        }

        let content = serde_json::to_string_pretty(documents)?;
        tokio::fs::write(path, content)
            .await
            .with_context(|| format!("writing store file {}", path.display()))?;
        Ok(())
    }

    /// Create an empty document for `user_key` unless one exists
    pub async fn ensure_user(&self, user_key: &str) -> Result<()> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(user_key) {
            return Ok(());
        }

        tracing::info!(user = user_key, "Creating user record");
        documents.insert(user_key.to_string(), new_document(user_key, &[]));
        let saved = self.save_to_disk(&documents).await;
        crate::log_result!("save_to_disk", saved);
        saved
    }

    /// Insert a raw document, bypassing the record shape
    pub async fn put_document(&self, user_key: &str, document: UserDocument) {
        self.documents
            .write()
            .await
            .insert(user_key.to_string(), document);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

fn new_document(user_key: &str, liked_clips: &[String]) -> UserDocument {
    json!({
        "username": user_key,
        LIKED_CLIPS_FIELD: liked_clips,
        "updated_at": chrono::Utc::now().to_rfc3339(),
    })
}

#[async_trait]
impl RemoteStore for JsonFileStore {
    async fn read_user_record(&self, user_key: &str) -> Result<Option<UserDocument>> {
        self.simulate_latency().await;
        let documents = self.documents.read().await;
        Ok(documents.get(user_key).cloned())
    }

    async fn write_user_record(&self, user_key: &str, liked_clips: &[String]) -> Result<()> {
        self.simulate_latency().await;
        let mut documents = self.documents.write().await;

        match documents.get_mut(user_key).and_then(Value::as_object_mut) {
            Some(document) => {
                document.insert(LIKED_CLIPS_FIELD.to_string(), json!(liked_clips));
                document.insert(
                    "updated_at".to_string(),
                    json!(chrono::Utc::now().to_rfc3339()),
                );
            }
            None => {
                documents.insert(user_key.to_string(), new_document(user_key, liked_clips));
            }
        }

        let saved = self.save_to_disk(&documents).await;
        crate::log_result!("save_to_disk", saved);
        saved?;
        tracing::debug!(user = user_key, liked = liked_clips.len(), "User record written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unknown_user_reads_none() {
        let store = JsonFileStore::in_memory();
        assert!(store.read_user_record("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn ensure_user_creates_empty_record_once() {
        let store = JsonFileStore::in_memory();
        store.ensure_user("alice").await.unwrap();
        store
            .write_user_record("alice", &["clip".to_string()])
            .await
            .unwrap();
        store.ensure_user("alice").await.unwrap();

        let document = store.read_user_record("alice").await.unwrap().unwrap();
        assert_eq!(document["username"], "alice");
        assert_eq!(document[LIKED_CLIPS_FIELD], json!(["clip"]));
    }

    #[tokio::test]
    async fn documents_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("likes.json");

        let store = JsonFileStore::open(&path).await.unwrap();
        store
            .write_user_record("bob", &["a".to_string(), "b".to_string()])
            .await
            .unwrap();
        assert!(path.exists());

        let reopened = JsonFileStore::open(&path).await.unwrap();
        let document = reopened.read_user_record("bob").await.unwrap().unwrap();
        assert_eq!(document[LIKED_CLIPS_FIELD], json!(["a", "b"]));
    }

    #[tokio::test]
    async fn corrupt_file_fails_to_open() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("likes.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(JsonFileStore::open(&path).await.is_err());
    }
}
