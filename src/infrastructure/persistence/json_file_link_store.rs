//! Link store backed by a single JSON document on disk.
//!
//! The document has the shape `{ "links": [ ... ] }` and is rewritten in full on every
//! mutation: serialized to a sibling `.tmp` file, flushed, then renamed over the original.
//!
//! # Consistency
//!
//! A mutation runs against a copy of the collection while the write lock is held. The copy
//! replaces the live collection only after the document has been renamed into place, so a
//! failed write leaves memory and disk as they were. The write and the commit run on a
//! spawned task holding an owned guard, which lets them finish even if the caller goes away.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

use super::collection::LinkCollection;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// File-backed link store.
pub struct JsonFileLinkStore {
    path: PathBuf,
    links: Arc<RwLock<LinkCollection>>,
}

impl JsonFileLinkStore {
    /// Opens the document at `path`, creating it (and its directory) if missing.
    ///
    /// An existing empty file is treated as an empty collection.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Storage`] if the file cannot be read, parsed or created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();

        let collection = match tokio::fs::read(&path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => LinkCollection::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                AppError::storage(
                    "Failed to parse link document",
                    json!({ "path": path.display().to_string(), "reason": e.to_string() }),
                )
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|e| io_error("Failed to create data directory", parent, e))?;
                }
                let empty = LinkCollection::new();
                write_document(&path, &empty).await?;
                info!(path = %path.display(), "Created empty link document");
                empty
            }
            Err(e) => return Err(io_error("Failed to read link document", &path, e)),
        };

        info!(path = %path.display(), links = collection.len(), "Link document loaded");

        Ok(Self {
            path,
            links: Arc::new(RwLock::new(collection)),
        })
    }

    /// Location of the backing document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Applies `change` to a copy of the collection and commits it once persisted.
    ///
    /// `change` returns `Ok(None)` when it left the collection untouched; nothing is written
    /// in that case.
    async fn mutate<T, F>(&self, change: F) -> Result<Option<T>, AppError>
    where
        T: Send + 'static,
        F: FnOnce(&mut LinkCollection) -> Result<Option<T>, AppError> + Send,
    {
        let mut guard = self.links.clone().write_owned().await;

        let mut working = (*guard).clone();
        let Some(output) = change(&mut working)? else {
            return Ok(None);
        };

        let path = self.path.clone();
        let commit = tokio::spawn(async move {
            write_document(&path, &working).await?;
            *guard = working;
            Ok::<_, AppError>(())
        });

        commit.await.map_err(|e| {
            AppError::storage("Link document write aborted", json!({ "reason": e.to_string() }))
        })??;

        Ok(Some(output))
    }
}

/// Serializes `collection` to `<path>.tmp`, syncs it and renames it over `path`.
async fn write_document(path: &Path, collection: &LinkCollection) -> Result<(), AppError> {
    let bytes = serde_json::to_vec_pretty(collection).map_err(|e| {
        AppError::storage(
            "Failed to serialize link document",
            json!({ "reason": e.to_string() }),
        )
    })?;

    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    let result: std::io::Result<()> = async {
        let mut file = tokio::fs::File::create(&tmp_path).await?;
        file.write_all(&bytes).await?;
        file.sync_all().await?;
        tokio::fs::rename(&tmp_path, path).await
    }
    .await;

    if let Err(e) = result {
        let _ = tokio::fs::remove_file(&tmp_path).await;
        error!(path = %path.display(), error = %e, "Failed to write link document");
        return Err(io_error("Failed to write link document", path, e));
    }

    debug!(path = %path.display(), links = collection.len(), "Link document written");
    Ok(())
}

fn io_error(message: &str, path: &Path, e: std::io::Error) -> AppError {
    AppError::storage(
        message,
        json!({ "path": path.display().to_string(), "reason": e.to_string() }),
    )
}

#[async_trait]
impl LinkStore for JsonFileLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.find(code).cloned())
    }

    async fn insert(&self, link: Link) -> Result<Link, AppError> {
        let inserted = self
            .mutate(move |links| links.insert(link).map(Some))
            .await?;

        inserted.ok_or_else(|| AppError::storage("Insert produced no record", json!({})))
    }

    async fn increment_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        self.mutate(|links| Ok(links.increment_click(code, at)))
            .await
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let removed = self.mutate(|links| Ok(links.remove(code))).await?;
        Ok(removed.is_some())
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.links.read().await.links().to_vec())
    }

    async fn health_check(&self) -> bool {
        tokio::fs::metadata(&self.path).await.is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn link(code: &str) -> Link {
        Link::new(code.to_string(), "https://example.com".to_string(), Utc::now())
    }

    async fn read_document(path: &Path) -> serde_json::Value {
        let bytes = tokio::fs::read(path).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_open_creates_missing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("db.json");

        let store = JsonFileLinkStore::open(&path).await.unwrap();

        assert!(path.exists());
        assert_eq!(read_document(&path).await, json!({ "links": [] }));
        assert!(store.list().await.unwrap().is_empty());
        assert!(store.health_check().await);
    }

    #[tokio::test]
    async fn test_open_treats_empty_file_as_empty_collection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(&path, "").await.unwrap();

        let store = JsonFileLinkStore::open(&path).await.unwrap();

        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_corrupt_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        tokio::fs::write(&path, "{ not json").await.unwrap();

        let result = JsonFileLinkStore::open(&path).await;

        assert!(matches!(result, Err(AppError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_mutations_survive_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");

        {
            let store = JsonFileLinkStore::open(&path).await.unwrap();
            store.insert(link("first1")).await.unwrap();
            store.insert(link("Second")).await.unwrap();
            store.insert(link("third3")).await.unwrap();
            store.increment_click("SECOND", Utc::now()).await.unwrap();
            assert!(store.delete("first1").await.unwrap());
        }

        let reopened = JsonFileLinkStore::open(&path).await.unwrap();
        let links = reopened.list().await.unwrap();

        let codes: Vec<_> = links.iter().map(|l| l.code.as_str()).collect();
        assert_eq!(codes, ["Second", "third3"]);
        assert_eq!(links[0].clicks, 1);
        assert!(links[0].last_clicked_at.is_some());
    }

    #[tokio::test]
    async fn test_reads_existing_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        let document = json!({
            "links": [{
                "code": "Legacy1",
                "target": "https://example.com/old",
                "createdAt": "2024-03-01T12:30:00.123Z",
                "clicks": 7,
                "lastClickedAt": "2024-03-02T08:00:00.000Z"
            }]
        });
        tokio::fs::write(&path, document.to_string()).await.unwrap();

        let store = JsonFileLinkStore::open(&path).await.unwrap();
        let found = store.find_by_code("legacy1").await.unwrap().unwrap();

        assert_eq!(found.code, "Legacy1");
        assert_eq!(found.clicks, 7);
    }

    #[tokio::test]
    async fn test_noop_mutations_do_not_fail() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileLinkStore::open(dir.path().join("db.json"))
            .await
            .unwrap();

        assert!(!store.delete("missing").await.unwrap());
        assert!(
            store
                .increment_click("missing", Utc::now())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_failed_write_rolls_back() {
        let dir = TempDir::new().unwrap();
        let data_dir = dir.path().join("data");
        let path = data_dir.join("db.json");

        let store = JsonFileLinkStore::open(&path).await.unwrap();
        store.insert(link("keeper")).await.unwrap();

        // Replace the data directory with a plain file so every write fails.
        tokio::fs::remove_dir_all(&data_dir).await.unwrap();
        tokio::fs::write(&data_dir, "blocker").await.unwrap();

        let insert = store.insert(link("orphan")).await;
        assert!(matches!(insert, Err(AppError::Storage { .. })));

        let increment = store.increment_click("keeper", Utc::now()).await;
        assert!(matches!(increment, Err(AppError::Storage { .. })));

        let delete = store.delete("keeper").await;
        assert!(matches!(delete, Err(AppError::Storage { .. })));

        let links = store.list().await.unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].code, "keeper");
        assert_eq!(links[0].clicks, 0);
        assert!(!store.health_check().await);
    }

    #[tokio::test]
    async fn test_conflict_does_not_touch_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        let store = JsonFileLinkStore::open(&path).await.unwrap();
        store.insert(link("MyCode1")).await.unwrap();
        let before = read_document(&path).await;

        let result = store.insert(link("mycode1")).await;

        assert!(matches!(result, Err(AppError::CodeConflict { .. })));
        assert_eq!(read_document(&path).await, before);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_persisted() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("db.json");
        let store = Arc::new(JsonFileLinkStore::open(&path).await.unwrap());
        store.insert(link("hotlink")).await.unwrap();

        let tasks: Vec<_> = (0..50)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move {
                    store.increment_click("hotlink", Utc::now()).await.unwrap();
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(
            store.find_by_code("hotlink").await.unwrap().unwrap().clicks,
            50
        );
        assert_eq!(read_document(&path).await["links"][0]["clicks"], 50);
    }
}
