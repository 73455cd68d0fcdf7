//! Domain errors

use thiserror::Error;

/// Domain-level error types
#[derive(Debug, Clone, Error)]
pub enum DomainError {
    /// Entity does not exist
    #[error("{entity} not found: {value}")]
    NotFound { entity: &'static str, value: String },
    /// A uniqueness constraint was violated
    #[error("conflict: {0}")]
    Conflict(String),
    /// The underlying store is unreachable or failed
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
