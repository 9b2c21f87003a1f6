//! HTTP client for the MediaWiki `action=query` API
//!
//! One call is one GET. There is no retry or backoff here; a failed request
//! surfaces as a [`FetchError`] and the caller decides what to do.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};

use crate::config::ApiConfig;
use crate::error::{Error, FetchError, Result};

use super::response::QueryResponse;
use super::PageSource;

/// HTTP client for a MediaWiki API endpoint
#[derive(Debug, Clone)]
pub struct WikiClient {
    http_client: reqwest::Client,
    endpoint: String,
}

impl WikiClient {
    /// Create a new client from configuration
    ///
    /// Returns an error if the endpoint or user agent is unusable.
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let endpoint = config.endpoint.trim().to_string();
        if endpoint.is_empty() {
            return Err(Error::Config("api.endpoint is required".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| Error::Config(format!("invalid api.user_agent: {}", e)))?,
        );

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            endpoint,
        })
    }

    /// The `api.php` URL this client talks to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PageSource for WikiClient {
    async fn fetch_page(
        &self,
        params: &[(String, String)],
    ) -> std::result::Result<QueryResponse, FetchError> {
        tracing::debug!(endpoint = %self.endpoint, ?params, "GET api.php");

        let response = self
            .http_client
            .get(&self.endpoint)
            .query(params)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::MalformedBody(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_with_default_config() {
        let client = WikiClient::new(&ApiConfig::default()).unwrap();
        assert_eq!(client.endpoint(), crate::config::DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_client_rejects_empty_endpoint() {
        let config = ApiConfig {
            endpoint: "   ".to_string(),
            ..Default::default()
        };
        assert!(WikiClient::new(&config).is_err());
    }

    #[test]
    fn test_client_rejects_bad_user_agent() {
        let config = ApiConfig {
            user_agent: "bad\nagent".to_string(),
            ..Default::default()
        };
        assert!(matches!(WikiClient::new(&config), Err(Error::Config(_))));
    }
}
