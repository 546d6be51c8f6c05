//! HttpTransport trait - outbound HTTP used by the HTTP delivery strategy

use crate::{ContractError, Message};

/// Response of a completed HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// HTTP client interface
#[trait_variant::make(HttpTransport: Send)]
pub trait LocalHttpTransport {
    /// POST `body` as JSON to `url`
    ///
    /// Any response, whatever its status, is `Ok`.
    ///
    /// # Errors
    /// Returns [`ContractError::Transport`] when no response was received.
    async fn post_json(&self, url: &str, body: &Message) -> Result<HttpReply, ContractError>;
}
