//! Error conversion glue between the domain types and `pushkind-common`.
//!
//! The domain layer must not depend on repository error types, so the
//! conversion lives here.

use pushkind_common::repository::errors::RepositoryError;

use crate::domain::types::TypeConstraintError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}
