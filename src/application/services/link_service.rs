//! Link creation, lookup and redirect accounting.

use std::sync::Arc;

use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, is_reserved, validate_code};
use crate::utils::url_validator::validate_target;

/// Totals across every stored link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LinkSummary {
    pub links: usize,
    pub clicks: u64,
}

/// Service for creating, resolving and deleting short links.
///
/// Validates input before it reaches the store and decides which code a new link gets.
/// Uniqueness and click counting are left to the store, which performs them atomically.
pub struct LinkService<S: LinkStore + ?Sized> {
    store: Arc<S>,
}

impl<S: LinkStore + ?Sized> LinkService<S> {
    /// Creates a new link service on top of `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Creates a short link.
    ///
    /// With `requested_code`, that exact code (casing preserved) is used. Without one, a
    /// random 7-character code is generated and regenerated until the store accepts it.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidTarget`] if `target` is not an absolute http(s) URL
    /// - [`AppError::InvalidCodeFormat`] if `requested_code` is not 6-8 letters/digits or is
    ///   a reserved word
    /// - [`AppError::CodeConflict`] if `requested_code` is taken, ignoring case
    /// - [`AppError::Storage`] if the store fails
    pub async fn create_link(
        &self,
        target: String,
        requested_code: Option<String>,
    ) -> Result<Link, AppError> {
        if let Err(e) = validate_target(&target) {
            return Err(AppError::invalid_target(
                "Invalid target URL. Must be http(s).",
                json!({ "target": target, "reason": e.to_string() }),
            ));
        }

        let link = match requested_code {
            Some(code) => {
                validate_code(&code)?;
                let new_link = NewLink { code, target };
                self.store.insert(new_link.into_link(Utc::now())).await?
            }
            None => self.insert_with_generated_code(target).await?,
        };

        info!(code = %link.code, target = %link.target, "Link created");
        Ok(link)
    }

    /// Retrieves a link by code, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn get_link(&self, code: &str) -> Result<Link, AppError> {
        self.store
            .find_by_code(code)
            .await?
            .ok_or_else(|| not_found(code))
    }

    /// All links in creation order.
    pub async fn list_links(&self) -> Result<Vec<Link>, AppError> {
        self.store.list().await
    }

    /// Deletes a link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code.
    pub async fn delete_link(&self, code: &str) -> Result<(), AppError> {
        if !self.store.delete(code).await? {
            return Err(not_found(code));
        }

        info!(code, "Link deleted");
        Ok(())
    }

    /// Counts a redirect on `code` and returns the updated link.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no link has this code; nothing is created.
    pub async fn record_click(&self, code: &str) -> Result<Link, AppError> {
        let link = self
            .store
            .increment_click(code, Utc::now())
            .await?
            .ok_or_else(|| not_found(code))?;

        debug!(code = %link.code, clicks = link.clicks, "Click recorded");
        Ok(link)
    }

    /// Resolves `code` to its target URL, counting the visit.
    ///
    /// The caller answers with a temporary (302) redirect to the returned URL.
    ///
    /// # Errors
    ///
    /// See [`Self::record_click`].
    pub async fn resolve_and_record_click(&self, code: &str) -> Result<String, AppError> {
        self.record_click(code).await.map(|link| link.target)
    }

    /// Number of links and the sum of their clicks.
    pub async fn summary(&self) -> Result<LinkSummary, AppError> {
        let links = self.store.list().await?;

        Ok(LinkSummary {
            links: links.len(),
            clicks: links.iter().map(|link| link.clicks).sum(),
        })
    }

    /// Reports whether the underlying store is reachable.
    pub async fn store_healthy(&self) -> bool {
        self.store.health_check().await
    }

    /// Inserts a link under a fresh random code.
    ///
    /// Collisions are retried without limit: with 62^7 possible codes a conflict is a
    /// transient event, and the store's insert is the uniqueness check.
    async fn insert_with_generated_code(&self, target: String) -> Result<Link, AppError> {
        let mut attempt: u64 = 0;

        loop {
            let code = generate_code();
            if is_reserved(&code) {
                continue;
            }
            attempt += 1;

            let candidate = NewLink {
                code,
                target: target.clone(),
            };

            match self.store.insert(candidate.into_link(Utc::now())).await {
                Ok(link) => return Ok(link),
                Err(AppError::CodeConflict { .. }) => {
                    debug!(attempt, "Generated code already taken, retrying");
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn not_found(code: &str) -> AppError {
    AppError::not_found("Not found", json!({ "code": code }))
}
