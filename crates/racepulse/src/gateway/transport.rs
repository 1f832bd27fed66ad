//! HTTP transport seam.
//!
//! Everything that talks to a remote API goes through [`Transport`], so the
//! gateway and the completion client can be exercised against a fake.

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};

/// A minimal JSON-over-HTTP client.
///
/// Implementations must report a non-success status as
/// [`Error::HttpStatus`] without attempting to parse the body.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Issue a GET and parse the body as JSON.
    async fn get_json(&self, url: &str) -> Result<Value>;

    /// Issue a POST with a JSON body and a bearer credential, and parse the
    /// response body as JSON.
    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<Value>;
}

/// [`Transport`] backed by `reqwest`.
///
/// No request timeout is configured; the client's defaults govern
/// worst-case latency.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Build a transport with a fresh client.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("racepulse/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| Error::internal(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// Wrap an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    async fn read_json(url: &str, response: Response) -> Result<Value> {
        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| Error::Transport {
            url: url.to_string(),
            source,
        })?;
        trace!(url, bytes = body.len(), "Received response body");
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get_json(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;
        Self::read_json(url, response).await
    }

    async fn post_json(&self, url: &str, bearer: &str, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(url)
            .bearer_auth(bearer)
            .json(body)
            .send()
            .await
            .map_err(|source| Error::Transport {
                url: url.to_string(),
                source,
            })?;
        Self::read_json(url, response).await
    }
}
