//! # TinyLink
//!
//! A small URL shortener: short alphanumeric codes map to target URLs, visitors are
//! redirected, and every redirect is counted.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - The [`Link`](domain::entities::Link) entity and the
//!   [`LinkStore`](domain::repositories::LinkStore) contract
//! - **Application Layer** ([`application`]) - Validation, code assignment and redirect
//!   accounting in [`LinkService`](application::services::LinkService)
//! - **Infrastructure Layer** ([`infrastructure`]) - JSON file, in-memory and PostgreSQL
//!   stores
//! - **API Layer** ([`api`]) - REST handlers, DTOs and middleware
//!
//! ## Quick Start
//!
//! ```bash
//! # Links are kept in data/db.json by default
//! export PORT=5000
//!
//! cargo run
//!
//! curl -X POST localhost:5000/api/links \
//!      -H 'content-type: application/json' \
//!      -d '{"target":"https://example.com/a"}'
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;
pub mod utils;

pub mod config;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{LinkService, LinkSummary};
    pub use crate::domain::entities::{Link, NewLink};
    pub use crate::domain::repositories::LinkStore;
    pub use crate::error::AppError;
    pub use crate::infrastructure::persistence::{InMemoryLinkStore, JsonFileLinkStore};
    pub use crate::state::AppState;
}
