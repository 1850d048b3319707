//! Outbound fetch of a backend's API description.

use async_trait::async_trait;
use reqwest::{Url, header};
use std::time::Duration;

use crate::error::{AggregatorError, AggregatorResult, TransportError};
use crate::models::UpstreamResponse;

/// Fixed bounds on a single upstream exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpstreamTimeouts {
    /// Time allowed to establish the TCP/TLS connection
    pub connect: Duration,
    /// Time allowed between reads once connected
    pub read: Duration,
}

impl Default for UpstreamTimeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(5),
            read: Duration::from_secs(15),
        }
    }
}

/// Performs exactly one GET per call; implementations must not retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Any HTTP status counts as success; only transport failures are errors.
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, TransportError>;
}

/// [`UpstreamClient`] backed by a shared `reqwest` connection pool.
#[derive(Debug, Clone)]
pub struct HttpUpstreamClient {
    client: reqwest::Client,
}

impl HttpUpstreamClient {
    pub fn new(timeouts: UpstreamTimeouts) -> AggregatorResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(timeouts.connect)
            .read_timeout(timeouts.read)
            .build()
            .map_err(|e| {
                AggregatorError::ConfigurationInvalid(format!("cannot build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }
}

#[async_trait]
impl UpstreamClient for HttpUpstreamClient {
    async fn get(&self, url: &Url) -> Result<UpstreamResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        let content_type = response.headers().get(header::CONTENT_TYPE).cloned();
        // A body that stalls or breaks mid-stream is a transport failure too.
        let body = response.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
