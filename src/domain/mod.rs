//! Domain layer containing business entities and the storage contract.
//!
//! # Architecture
//!
//! - [`entities`] - Core business data structures
//! - [`repositories`] - The [`repositories::LinkStore`] trait implemented by the
//!   infrastructure layer
//!
//! The domain layer has no dependencies on infrastructure or presentation layers. Business
//! rules live in [`crate::application::services`].

pub mod entities;
pub mod repositories;
