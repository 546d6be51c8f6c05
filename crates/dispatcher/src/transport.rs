//! HttpClient - reqwest-backed JSON POST transport

use std::time::Duration;

use contracts::{ContractError, HttpReply, HttpTransport, Message};
use tracing::{debug, instrument};

use crate::error::DispatcherError;

/// Configuration for HttpClient
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Whole-request timeout
    pub timeout: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
        }
    }
}

/// Transport that POSTs messages with reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a new HttpClient
    pub fn new(config: HttpClientConfig) -> Result<Self, DispatcherError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| DispatcherError::http_client(e.to_string()))?;
        Ok(Self { client })
    }
}

impl HttpTransport for HttpClient {
    #[instrument(name = "http_client_post", skip(self, body))]
    async fn post_json(&self, url: &str, body: &Message) -> Result<HttpReply, ContractError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| ContractError::transport(url, e.to_string()))?;

        let status = response.status().as_u16();
        // A body that cannot be read does not change the delivery result
        let body = response.text().await.unwrap_or_default();
        debug!(status, bytes = body.len(), "Response received");

        Ok(HttpReply { status, body })
    }
}
