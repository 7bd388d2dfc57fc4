//! Single page fetches.
//!
//! A probe performs exactly one GET per call, with the static browser-like
//! header set attached, and classifies the outcome. Failed fetches are never
//! retried.

use crate::error::ScanError;
use crate::extract::html_to_text;
use crate::types::ScanConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::StatusCode;
use std::time::Duration;
use tracing::debug;

/// Classified result of one page fetch.
#[derive(Debug, Clone)]
pub enum PageOutcome {
    /// HTTP 200; `text` is the tag-stripped body, `raw_body` the body as sent
    Success { text: String, raw_body: String },

    /// Any other status (including empty 2xx answers such as 204)
    EmptyOrNonOk { status: u16 },

    /// DNS, connection or timeout failure; ends the domain scan
    TransportError(ScanError),
}

/// HTTP fetcher shared by every domain scan.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PageProbe {
    /// HTTP client carrying the default header set
    http_client: reqwest::Client,
    /// Round-trip budget for one page, body included
    timeout: Duration,
}

impl PageProbe {
    /// Create a probe from the run configuration.
    pub fn new(config: &ScanConfig) -> Result<Self, ScanError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ScanError::config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_str(&config.accept)
                .map_err(|e| ScanError::config(format!("Invalid accept header: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout.saturating_add(Duration::from_secs(2))) // Add buffer for HTTP timeout
            .build()
            .map_err(|e| {
                ScanError::network_with_source("Failed to create HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            timeout: config.timeout,
        })
    }

    /// Fetch one URL and classify the answer.
    pub async fn fetch(&self, url: &str) -> PageOutcome {
        debug!("Fetching: {}", url);

        let outcome = match tokio::time::timeout(self.timeout, self.request(url)).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(e)) => PageOutcome::TransportError(e),
            Err(_) => PageOutcome::TransportError(ScanError::timeout(
                format!("GET {}", url),
                self.timeout,
            )),
        };

        match &outcome {
            PageOutcome::Success { raw_body, .. } => {
                debug!("Fetched {} bytes from {}", raw_body.len(), url);
            }
            PageOutcome::EmptyOrNonOk { status } => {
                debug!("No content from {} (HTTP {})", url, status);
            }
            PageOutcome::TransportError(e) => {
                debug!("Transport error for {}: {}", url, e);
            }
        }

        outcome
    }

    async fn request(&self, url: &str) -> Result<PageOutcome, ScanError> {
        let response = self
            .http_client
            .get(url)
            .send()
            .await
            .map_err(|e| self.transport_error(url, e))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(PageOutcome::EmptyOrNonOk {
                status: status.as_u16(),
            });
        }

        let raw_body = response
            .text()
            .await
            .map_err(|e| self.transport_error(url, e))?;
        let text = html_to_text(&raw_body);

        Ok(PageOutcome::Success { text, raw_body })
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> ScanError {
        if err.is_timeout() {
            ScanError::timeout(format!("GET {}", url), self.timeout)
        } else if err.is_connect() {
            ScanError::network_with_source(format!("Connection to {} failed", url), err.to_string())
        } else {
            ScanError::network_with_source(format!("Request to {} failed", url), err.to_string())
        }
    }
}
