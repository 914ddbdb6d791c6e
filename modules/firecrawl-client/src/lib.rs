pub mod error;

pub use error::{FirecrawlError, Result};

use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

const FIRECRAWL_API_URL: &str = "https://api.firecrawl.dev/v1";

pub struct FirecrawlClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct ScrapeResponse {
    success: bool,
    #[serde(default)]
    data: Option<ScrapeData>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ScrapeData {
    #[serde(default)]
    markdown: Option<String>,
}

impl FirecrawlClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: FIRECRAWL_API_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    /// Scrape a URL to markdown via the /scrape endpoint.
    pub async fn scrape(&self, url: &str) -> Result<String> {
        let endpoint = format!("{}/scrape", self.base_url);
        let body = serde_json::json!({ "url": url, "formats": ["markdown"] });

        debug!(url, "Firecrawl scrape request");

        let resp = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 429 {
            return Err(FirecrawlError::RateLimited);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: ScrapeResponse = resp.json().await?;
        if !parsed.success {
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message: parsed.error.unwrap_or_else(|| "scrape failed".to_string()),
            });
        }

        Ok(parsed
            .data
            .and_then(|d| d.markdown)
            .unwrap_or_default())
    }
}
