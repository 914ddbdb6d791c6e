pub mod error;

pub use error::{Result, TypefullyError};

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

const TYPEFULLY_API_URL: &str = "https://api.typefully.com/v1";

pub struct TypefullyClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

/// One draft per content group. `threadify` tells the API to split the body
/// on blank-line runs; the retweet/plug automations stay off.
#[derive(Debug, Clone, Serialize)]
pub struct CreateDraftRequest {
    pub content: String,
    pub platform: String,
    pub threadify: bool,
    #[serde(rename = "schedule-date")]
    pub schedule_date: String,
    pub auto_retweet_enabled: bool,
    pub auto_plug_enabled: bool,
}

impl CreateDraftRequest {
    pub fn new(content: &str, platform: &str, threadify: bool, schedule_date: &str) -> Self {
        Self {
            content: content.to_string(),
            platform: platform.to_string(),
            threadify,
            schedule_date: schedule_date.to_string(),
            auto_retweet_enabled: false,
            auto_plug_enabled: false,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDraftResponse {
    pub id: serde_json::Value,
}

impl CreateDraftResponse {
    /// Draft ids come back as either a number or a string.
    pub fn id_string(&self) -> String {
        match &self.id {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl TypefullyClient {
    pub fn new(api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: TYPEFULLY_API_URL.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn has_credentials(&self) -> bool {
        !self.api_key.trim().is_empty()
    }

    /// Create a scheduled draft. Any non-2xx response is a hard failure for
    /// this single call.
    pub async fn create_draft(&self, request: &CreateDraftRequest) -> Result<String> {
        if !self.has_credentials() {
            return Err(TypefullyError::MissingApiKey);
        }

        let endpoint = format!("{}/drafts/", self.base_url);

        debug!(
            platform = request.platform.as_str(),
            threadify = request.threadify,
            schedule_date = request.schedule_date.as_str(),
            "Typefully create draft"
        );

        let resp = self
            .client
            .post(&endpoint)
            .header("X-API-KEY", format!("Bearer {}", self.api_key))
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(TypefullyError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: CreateDraftResponse = resp.json().await?;
        Ok(parsed.id_string())
    }
}
