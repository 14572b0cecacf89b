//! Storage trait for link records.

use crate::domain::entities::Link;
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Owner of the link collection.
///
/// Lookups by code are case-insensitive. Every mutating call is serialized against every other
/// mutating call on the same store, and either persists completely or leaves the collection
/// untouched. Records handed out are owned copies.
///
/// # Errors
///
/// Every method returns [`AppError::Storage`] when the backing storage fails.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Finds a link by code, ignoring case.
    async fn find_by_code(&self, code: &str) -> Result<Option<Link>, AppError>;

    /// Appends a new link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::CodeConflict`] if a link with the same code (ignoring case)
    /// already exists.
    async fn insert(&self, link: Link) -> Result<Link, AppError>;

    /// Adds one click and sets the last-click timestamp, atomically.
    ///
    /// Returns the updated record, or `Ok(None)` if the code does not exist.
    async fn increment_click(
        &self,
        code: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Link>, AppError>;

    /// Removes a link. Returns `Ok(false)` if it did not exist.
    async fn delete(&self, code: &str) -> Result<bool, AppError>;

    /// All links in insertion order.
    async fn list(&self) -> Result<Vec<Link>, AppError>;

    /// Reports whether the backing storage is reachable.
    async fn health_check(&self) -> bool;
}
