//! Connector port: the four operations every task provider supports.

use crate::task::domain::{NewTask, ProviderId, Task, TaskOrigin, TaskPatch};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for connector operations.
pub type ConnectorResult<T> = Result<T, ConnectorError>;

/// Provider connector contract.
///
/// Implementations own network access, authentication, retries and payload
/// construction for one provider. They never cache.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskConnector: Send + Sync {
    /// Returns the origin tag of the provider this connector serves.
    fn origin(&self) -> TaskOrigin;

    /// Fetches every task visible to the connector, following pagination.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError`] when the provider cannot be read after the
    /// retry policy gives up.
    async fn fetch_all(&self) -> ConnectorResult<Vec<Task>>;

    /// Creates a task and returns its canonical form.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError`] when the provider rejects the write.
    async fn create(&self, input: &NewTask) -> ConnectorResult<Task>;

    /// Applies a partial update and returns the updated canonical task.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError`] when the provider rejects the write.
    async fn update(&self, provider_id: &ProviderId, patch: &TaskPatch)
    -> ConnectorResult<Task>;

    /// Deletes or archives a task, depending on the provider.
    ///
    /// # Errors
    ///
    /// Returns [`ConnectorError`] when the provider rejects the delete.
    async fn delete(&self, provider_id: &ProviderId) -> ConnectorResult<()>;
}

/// Errors returned by connector implementations.
#[derive(Debug, Clone, Error)]
pub enum ConnectorError {
    /// Credentials or identifiers are missing or malformed.
    #[error("connector configuration error: {0}")]
    Configuration(String),

    /// The provider signalled rate limiting.
    #[error("rate limited by provider")]
    RateLimited {
        /// Delay requested by the provider, if it sent one.
        retry_after: Option<Duration>,
    },

    /// The provider failed with a 5xx status.
    #[error("provider server error {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// Authentication or authorisation was refused.
    #[error("provider refused credentials (status {0})")]
    Unauthorized(u16),

    /// The addressed record does not exist.
    #[error("record not found at provider")]
    NotFound,

    /// The provider rejected the request as invalid.
    #[error("provider rejected request {status}: {body}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Response body, for diagnostics.
        body: String,
    },

    /// The request never produced a response.
    #[error("provider transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// The response body could not be decoded.
    #[error("could not decode provider response: {0}")]
    Decode(String),
}

impl ConnectorError {
    /// Wraps a transport failure.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }

    /// Returns `true` for errors the retry policy should retry.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Server { .. })
    }
}
