//! Upserting output records into a hosted search index.
//!
//! Records are sent to an Algolia-compatible REST endpoint as a single batch
//! of `updateObject` operations keyed by `objectID`, so re-running a scan
//! replaces the previous documents for the same domains.

use crate::aggregate::IndexRecord;
use crate::error::ScanError;
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

/// Credentials and target of the search index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    pub app_id: String,
    pub api_key: String,
    pub index_name: String,
    /// Base URL override; defaults to `https://<app_id>.algolia.net`
    pub host: Option<String>,
}

impl IndexSettings {
    pub fn new<A, K, N>(app_id: A, api_key: K, index_name: N) -> Self
    where
        A: Into<String>,
        K: Into<String>,
        N: Into<String>,
    {
        Self {
            app_id: app_id.into(),
            api_key: api_key.into(),
            index_name: index_name.into(),
            host: None,
        }
    }

    pub fn with_host<H: Into<String>>(mut self, host: H) -> Self {
        self.host = Some(host.into());
        self
    }

    /// URL of the batch endpoint for the configured index.
    pub fn batch_url(&self) -> String {
        let host = match &self.host {
            Some(host) => host.trim_end_matches('/').to_string(),
            None => format!("https://{}.algolia.net", self.app_id),
        };
        format!("{}/1/indexes/{}/batch", host, self.index_name)
    }
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    requests: Vec<BatchOperation<'a>>,
}

#[derive(Serialize)]
struct BatchOperation<'a> {
    action: &'static str,
    body: &'a IndexRecord,
}

/// Client for the search index.
#[derive(Debug, Clone)]
pub struct SearchIndex {
    http_client: reqwest::Client,
    settings: IndexSettings,
}

impl SearchIndex {
    /// Create a client for the configured index.
    pub fn new(settings: IndexSettings, timeout: Duration) -> Result<Self, ScanError> {
        if settings.app_id.is_empty() || settings.api_key.is_empty() {
            return Err(ScanError::config(
                "Search index requires both an application id and an API key",
            ));
        }
        if settings.index_name.is_empty() {
            return Err(ScanError::config("Search index name cannot be empty"));
        }

        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                ScanError::network_with_source("Failed to create HTTP client", e.to_string())
            })?;

        Ok(Self {
            http_client,
            settings,
        })
    }

    pub fn index_name(&self) -> &str {
        &self.settings.index_name
    }

    /// Upsert `records`, returning how many were sent.
    ///
    /// An empty slice sends nothing.
    pub async fn save_objects(&self, records: &[IndexRecord]) -> Result<usize, ScanError> {
        if records.is_empty() {
            debug!("No records to index");
            return Ok(0);
        }

        let batch = BatchRequest {
            requests: records
                .iter()
                .map(|body| BatchOperation {
                    action: "updateObject",
                    body,
                })
                .collect(),
        };

        let url = self.settings.batch_url();
        debug!("Sending {} records to {}", records.len(), url);

        let response = self
            .http_client
            .post(&url)
            .header("X-Algolia-Application-Id", &self.settings.app_id)
            .header("X-Algolia-API-Key", &self.settings.api_key)
            .json(&batch)
            .send()
            .await
            .map_err(|e| ScanError::index(format!("Request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScanError::index_with_status(
                if body.is_empty() {
                    "Batch upsert rejected".to_string()
                } else {
                    body
                },
                status.as_u16(),
            ));
        }

        debug!(
            "Batch of {} records accepted by '{}'",
            records.len(),
            self.settings.index_name
        );
        Ok(records.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CompanyRecord;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(domain: &str, company: Option<CompanyRecord>) -> IndexRecord {
        IndexRecord {
            object_id: domain.to_string(),
            domain: domain.to_string(),
            phone_numbers: "555-123-4567".to_string(),
            facebook_links: String::new(),
            addresses: String::new(),
            company,
        }
    }

    fn index(server: &MockServer) -> SearchIndex {
        let settings = IndexSettings::new("APP", "secret", "contacts").with_host(server.uri());
        SearchIndex::new(settings, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_default_batch_url() {
        let settings = IndexSettings::new("APP123", "key", "contacts");
        assert_eq!(
            settings.batch_url(),
            "https://APP123.algolia.net/1/indexes/contacts/batch"
        );

        let settings = settings.with_host("http://localhost:7700/");
        assert_eq!(
            settings.batch_url(),
            "http://localhost:7700/1/indexes/contacts/batch"
        );
    }

    #[test]
    fn test_missing_credentials_rejected() {
        let settings = IndexSettings::new("", "key", "contacts");
        let err = SearchIndex::new(settings, Duration::from_secs(5)).unwrap_err();
        assert!(matches!(err, ScanError::ConfigError { .. }));
    }

    #[tokio::test]
    async fn test_save_objects_sends_batch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/1/indexes/contacts/batch"))
            .and(header("x-algolia-application-id", "APP"))
            .and(header("x-algolia-api-key", "secret"))
            .and(body_partial_json(json!({
                "requests": [
                    {
                        "action": "updateObject",
                        "body": {
                            "objectID": "acme.com",
                            "domain": "acme.com",
                            "phone_numbers": "555-123-4567",
                            "Company Commercial Name": "Acme"
                        }
                    }
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"taskID": 1})))
            .expect(1)
            .mount(&server)
            .await;

        let company = CompanyRecord {
            commercial_name: "Acme".to_string(),
            legal_name: "Acme LLC".to_string(),
            all_available_names: "Acme".to_string(),
        };
        let sent = index(&server)
            .save_objects(&[record("acme.com", Some(company))])
            .await
            .unwrap();
        assert_eq!(sent, 1);
    }

    #[tokio::test]
    async fn test_empty_batch_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        assert_eq!(index(&server).save_objects(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_batch_is_index_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Invalid Application-ID"))
            .mount(&server)
            .await;

        let err = index(&server)
            .save_objects(&[record("acme.com", None)])
            .await
            .unwrap_err();

        match err {
            ScanError::IndexError {
                message,
                status_code,
            } => {
                assert_eq!(status_code, Some(403));
                assert_eq!(message, "Invalid Application-ID");
            }
            other => panic!("expected index error, got {:?}", other),
        }
    }
}
