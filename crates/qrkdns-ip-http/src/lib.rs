// # HTTP IP Source
//
// Looks up the host's external IPv4 address by asking a plain-text echo
// service such as `http://checkip.amazonaws.com`.
//
// ## Contract
//
// - One `GET` per call, no caching between passes
// - Only `200 OK` counts as success; anything else is a network error
//   carrying the status code and the trimmed response body
// - The body is returned trimmed but otherwise unparsed

use qrkdns_core::traits::IpSource;
use qrkdns_core::{Error, Result};

use std::time::Duration;

use reqwest::StatusCode;
use tracing::debug;

/// Default lookup service
pub const DEFAULT_URL: &str = "http://checkip.amazonaws.com";

/// Per-request timeout applied by the HTTP client
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// External IP lookup over HTTP
#[derive(Debug, Clone)]
pub struct HttpIpSource {
    /// URL to fetch the IP from
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpSource {
    /// Create a source that queries `url`
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .unwrap_or_default(),
        }
    }

    /// URL this source queries
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Default for HttpIpSource {
    fn default() -> Self {
        Self::new(DEFAULT_URL)
    }
}

#[async_trait::async_trait]
impl IpSource for HttpIpSource {
    async fn current(&self) -> Result<String> {
        debug!(url = %self.url, "Fetching external IP address");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::network(format!("Request to {} failed: {}", self.url, e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::network(format!("Failed to read response: {}", e)))?;
        let body = body.trim();

        if status != StatusCode::OK {
            return Err(Error::network(format!(
                "Received status code {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(body.to_string())
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
