//! Catalog business logic kept independent of actix-web.
//!
//! Services take a repository implementing the reader/writer traits they need
//! and return plain data, so the HTTP routes stay thin wrappers and the logic
//! is testable with the in-memory repository.

pub mod categories;
pub mod errors;
pub mod items;
pub mod main;
pub mod references;

pub use errors::{ServiceError, ServiceResult};

/// Outcome of a create or update submission.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission<V> {
    /// The form has to be shown again with the entered values and violations.
    Form(V),
    /// The entity was persisted; the client is redirected to `url`.
    Committed { url: String },
}
