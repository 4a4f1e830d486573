use crate::core::envelope::Envelope;
use crate::core::feed::{FeedId, FeedTransport};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

/// Fetches feed envelopes over HTTP from the ERP dashboard API.
pub struct HttpFeedTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpFeedTransport {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("homedash/0.1")
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }
}

#[async_trait]
impl FeedTransport for HttpFeedTransport {
    #[instrument(name = "FeedFetch", skip(self))]
    async fn fetch(&self, feed: FeedId) -> Result<Envelope<serde_json::Value>> {
        let url = format!("{}{}", self.base_url, feed.endpoint());
        debug!("Requesting feed from {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for feed: {} URL: {}", e, feed, url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} for feed: {}",
                response.status(),
                feed
            ));
        }

        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body for feed: {feed}"))?;

        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse envelope for {}: {}", feed, e))
    }
}
