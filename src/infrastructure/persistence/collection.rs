//! In-process link collection shared by the memory and file stores.
//!
//! The collection is a plain ordered list. Lookups scan it with [`Link::matches`], so the
//! case-insensitive key is always derived from the stored code.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::entities::Link;
use crate::error::AppError;

/// The persisted document: `{ "links": [ ... ] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCollection {
    #[serde(default)]
    links: Vec<Link>,
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    pub fn find(&self, code: &str) -> Option<&Link> {
        self.links.iter().find(|link| link.matches(code))
    }

    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Appends `link` unless its code is already taken.
    pub fn insert(&mut self, link: Link) -> Result<Link, AppError> {
        if let Some(existing) = self.find(&link.code) {
            return Err(AppError::code_conflict(
                "Code already exists.",
                json!({ "code": link.code, "existing": existing.code }),
            ));
        }

        self.links.push(link.clone());
        Ok(link)
    }

    /// Counts a click on `code`. Returns the updated copy.
    pub fn increment_click(&mut self, code: &str, at: DateTime<Utc>) -> Option<Link> {
        let link = self.links.iter_mut().find(|link| link.matches(code))?;
        link.record_click(at);
        Some(link.clone())
    }

    /// Removes `code`. Returns `None` if it was absent.
    pub fn remove(&mut self, code: &str) -> Option<Link> {
        let index = self.links.iter().position(|link| link.matches(code))?;
        Some(self.links.remove(index))
    }
}
