use crate::types::DbId;

/// Domain-level error type shared across crates.
///
/// The API layer maps each variant to an HTTP status code; see
/// `admissions-api`'s `error` module.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An entity lookup by id came back empty.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// The caller supplied invalid input.
    #[error("validation error: {0}")]
    Validation(String),

    /// The operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// An unexpected internal failure.
    #[error("internal error: {0}")]
    Internal(String),
}
