use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::UpstreamConfig;
use crate::error::{FeedError, Result};
use crate::http::send_checked_json;
use crate::types::{FeedQuery, RawRecord};

/// Live-tier data source. `configured` gates the tier: an unconfigured client
/// is skipped outright and never consumes a rate-limit permit.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    fn name(&self) -> &str;

    fn configured(&self) -> bool {
        true
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawRecord>>;
}

/// News-style HTTP upstream. Each operation maps to a path under the base URL
/// and the query parameters go straight onto the query string.
#[derive(Clone)]
pub struct HttpUpstream {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    timeout: Duration,
}

const DEFAULT_BASE_URL: &str = "https://newsapi.org/v2";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

impl HttpUpstream {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Builds a client with the timeout taken from the `[upstream]` config
    /// section instead of the hard-coded default.
    pub fn from_config(api_key: impl Into<String>, config: &UpstreamConfig) -> Self {
        Self::new(api_key).with_timeout(Duration::from_secs(config.timeout_seconds))
    }

    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Deserialize)]
struct UpstreamEnvelope {
    #[serde(default, alias = "results", alias = "items")]
    articles: Vec<RawRecord>,
}

#[async_trait]
impl UpstreamClient for HttpUpstream {
    fn name(&self) -> &str {
        "live"
    }

    fn configured(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    async fn fetch(&self, query: &FeedQuery) -> Result<Vec<RawRecord>> {
        if !self.configured() {
            return Err(FeedError::NoCredentials);
        }

        let mut req = self
            .http
            .get(self.endpoint(query.operation()))
            .timeout(self.timeout)
            .header("x-api-key", &self.api_key);
        for (key, value) in query.params() {
            req = req.query(&[(key, value)]);
        }

        let envelope: UpstreamEnvelope = send_checked_json(req).await?;
        Ok(envelope.articles)
    }
}
