//! HTTP execution against an OpenAI-compatible endpoint.
//!
//! A [`HttpTransport`] is bound to one credential for its whole lifetime;
//! supplying a new credential means building a new transport (see
//! [`crate::client::ClientRegistry`]).

use crate::Result;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    credential: String,
}

impl HttpTransport {
    pub fn new(credential: impl Into<String>, base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| crate::Error::Transport(TransportError::Other(e.to_string())))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            credential: credential.into(),
        })
    }

    /// The credential this transport authenticates with. Compared, never
    /// mutated; a differing secret produces a replacement transport.
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// POST a JSON body and return the parsed JSON response.
    ///
    /// Non-2xx statuses are surfaced as [`crate::Error::Remote`] with the
    /// response body as the message.
    pub async fn execute_json(
        &self,
        path: &str,
        request_body: &serde_json::Value,
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut req = self.client.post(&url).json(request_body);
        if !self.credential.is_empty() {
            req = req.bearer_auth(&self.credential);
        }

        let response = req
            .send()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(crate::Error::Remote {
                status: status.as_u16(),
                message,
            });
        }

        let json = response
            .json()
            .await
            .map_err(|e| crate::Error::Transport(TransportError::Http(e)))?;

        Ok(json)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("transport error: {0}")]
    Other(String),
}
