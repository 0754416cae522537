//! Error types for canonical task domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing canonical task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The origin tag does not name a supported provider.
    #[error("unsupported task origin: {0}")]
    UnsupportedOrigin(String),

    /// The provider identifier is empty after trimming.
    #[error("provider identifier must not be empty")]
    EmptyProviderId,
}
