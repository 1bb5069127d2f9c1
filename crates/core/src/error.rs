//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic, request-level failures (lookups,
/// malformed input). Field validation reports through its own error type and
/// storage failures belong to the infra layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Request parameters could not be interpreted (e.g. a form key nested too deep).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record was not found.
    #[error("not found")]
    NotFound,

    /// A required request parameter was absent or empty.
    #[error("param is missing or the value is empty: {0}")]
    ParameterMissing(String),
}

impl DomainError {
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found() -> Self {
        Self::NotFound
    }

    pub fn parameter_missing(param: impl Into<String>) -> Self {
        Self::ParameterMissing(param.into())
    }
}
