//! Volatile link store for tests and throwaway runs.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::collection::LinkCollection;
use crate::domain::entities::Link;
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// Link store kept entirely in memory.
///
/// One [`RwLock`] guards the collection: readers share it, every mutation takes it
/// exclusively for the whole check-then-write.
#[derive(Default)]
pub struct InMemoryLinkStore {
    links: RwLock<LinkCollection>,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `links`, in order.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if two of the links share a code.
    pub fn with_links(links: impl IntoIterator<Item = Link>) -> Result<Self, AppError> {
        let mut collection = LinkCollection::new();
        for link in links {
            collection.insert(link)?;
        }
        Ok(Self {
            links: RwLock::new(collection),
        })
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError> {
        Ok(self.links.read().await.find(code).cloned())
    }

    async fn insert(&self, link: Link) -> Result<Link, AppError> {
        self.links.write().await.insert(link)
    }

    async fn increment_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError> {
        Ok(self.links.write().await.increment_click(code, at))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        Ok(self.links.write().await.remove(code).is_some())
    }

    async fn list(&self) -> Result<Vec<Link>, AppError> {
        Ok(self.links.read().await.links().to_vec())
    }

    async fn health_check(&self) -> bool {
        true
    }
}
