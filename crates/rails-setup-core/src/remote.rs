//! Fetching static assets over HTTP

use crate::error::ScaffoldError;
use std::time::Duration;
use url::Url;

/// Downloads a remote asset
#[allow(async_fn_in_trait)]
pub trait AssetFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError>;
}

/// Fetches assets with a plain GET request
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Create a new fetcher with a custom user agent and optional request timeout
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Self {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        Self {
            client: builder.build().unwrap_or_else(|_| reqwest::Client::new()),
        }
    }
}

impl AssetFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, ScaffoldError> {
        let fetch_error = |reason: String| ScaffoldError::Fetch {
            url: url.to_string(),
            reason,
        };

        let parsed = Url::parse(url).map_err(|e| fetch_error(format!("invalid URL: {}", e)))?;
        let response = self
            .client
            .get(parsed)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(fetch_error(format!("HTTP {}", response.status())));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        Ok(body.to_vec())
    }
}
