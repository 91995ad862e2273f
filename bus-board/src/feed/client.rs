//! Prediction feed HTTP client.

use async_trait::async_trait;

use crate::domain::StopId;

use super::error::FeedError;

/// Default base URL for the stop-prediction endpoint.
const DEFAULT_BASE_URL: &str =
    "http://mybusnow.njtransit.com/bustime/eta/getStopPredictionsETA.jsp";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration for the feed client.
#[derive(Debug, Clone)]
pub struct FeedConfig {
    /// Base URL for the prediction endpoint (defaults to the production feed)
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FeedConfig {
    /// Create a config with the default endpoint and timeout.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Something that can produce a raw prediction document for a stop.
///
/// The live [`FeedClient`] implements this over HTTP; the mock client
/// serves fixtures from disk. Pollers are generic over the source, so
/// tests never need a network.
#[async_trait]
pub trait PredictionSource: Send + Sync {
    /// Fetch the raw XML prediction document for a stop.
    async fn fetch_predictions(&self, stop: &StopId) -> Result<String, FeedError>;
}

/// HTTP client for the prediction feed.
///
/// The feed is a single fixed GET endpoint taking the stop id as a
/// query parameter; there is no authentication or pagination.
#[derive(Debug, Clone)]
pub struct FeedClient {
    http: reqwest::Client,
    base_url: String,
}

impl FeedClient {
    /// Create a new feed client with the given configuration.
    pub fn new(config: FeedConfig) -> Result<Self, FeedError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
        })
    }
}

#[async_trait]
impl PredictionSource for FeedClient {
    async fn fetch_predictions(&self, stop: &StopId) -> Result<String, FeedError> {
        let url = format!("{}?route=all&stop={}", self.base_url, stop);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?)
    }
}
