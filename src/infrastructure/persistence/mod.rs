//! Link store implementations.
//!
//! - [`JsonFileLinkStore`] - single JSON document on disk (default)
//! - [`InMemoryLinkStore`] - volatile, for tests and throwaway runs
//! - [`PgLinkStore`] - PostgreSQL via SQLx
//!
//! The file and memory stores share [`collection::LinkCollection`] for the actual record
//! bookkeeping and differ only in whether a mutation is written out before it is committed.

pub mod collection;
pub mod json_file_link_store;
pub mod memory_link_store;
pub mod pg_link_store;

pub use json_file_link_store::JsonFileLinkStore;
pub use memory_link_store::InMemoryLinkStore;
pub use pg_link_store::PgLinkStore;
