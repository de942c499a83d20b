//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, caller-visible failures. Storage and
/// notification failures belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A requested record does not exist (e.g. unknown student).
    #[error("not found: {0}")]
    NotFound(String),

    /// The request is malformed or violates a rule (e.g. subject not taken).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Credentials were rejected.
    #[error("unauthorized")]
    Unauthorized,

    /// A uniqueness rule was violated (e.g. duplicate username).
    #[error("conflict: {0}")]
    Conflict(String),
}

impl DomainError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }
}
