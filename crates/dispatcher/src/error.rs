//! Dispatcher error types

use contracts::ContractError;
use thiserror::Error;

/// Errors raised while building a [`Reporting`](crate::Reporting)
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Required configuration missing (host / cluster)
    #[error("invalid reporting config: {0}")]
    Config(#[source] ContractError),

    /// HTTP client could not be created
    #[error("failed to create http client: {message}")]
    HttpClient { message: String },
}

impl DispatcherError {
    /// Create an http client error
    pub fn http_client(message: impl Into<String>) -> Self {
        Self::HttpClient {
            message: message.into(),
        }
    }

    /// True for configuration errors
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}
