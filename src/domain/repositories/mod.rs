//! Storage contract for the domain layer.
//!
//! [`LinkStore`] abstracts the link collection so the service can run on top of a JSON file,
//! an in-memory map or PostgreSQL without changing its behavior.
//!
//! # Implementations
//!
//! - `crate::infrastructure::persistence::JsonFileLinkStore` - single JSON document on disk
//! - `crate::infrastructure::persistence::InMemoryLinkStore` - no persistence
//! - `crate::infrastructure::persistence::PgLinkStore` - PostgreSQL
//!
//! A mock implementation is generated via `mockall` for service tests.

pub mod link_store;

pub use link_store::LinkStore;

#[cfg(test)]
pub use link_store::MockLinkStore;
