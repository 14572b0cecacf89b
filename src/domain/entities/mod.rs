//! Core domain entities.
//!
//! The service has a single entity, [`Link`]: a short code mapped to a target URL together
//! with its click counter. [`NewLink`] carries the validated input for a record that does not
//! exist yet.

pub mod link;

pub use link::{Link, NewLink};
