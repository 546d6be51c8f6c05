//! Error types for CLI operations.

use thiserror::Error;

/// CLI-specific error types
#[derive(Error, Debug)]
pub enum CliError {
    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    /// Message input is not a JSON object
    #[error("Invalid message: {message}")]
    InvalidMessage { message: String },

    /// At least one destination reported an error
    #[error("Delivery failed for {destinations}: {message}")]
    Delivery {
        destinations: String,
        message: String,
    },
}

impl CliError {
    pub fn config_not_found(path: impl Into<String>) -> Self {
        Self::ConfigNotFound { path: path.into() }
    }

    pub fn invalid_message(message: impl Into<String>) -> Self {
        Self::InvalidMessage {
            message: message.into(),
        }
    }

    pub fn delivery(destinations: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Delivery {
            destinations: destinations.into(),
            message: message.into(),
        }
    }
}
