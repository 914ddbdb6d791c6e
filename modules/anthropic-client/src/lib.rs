mod types;

use anyhow::{anyhow, Result};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use tracing::debug;

use types::*;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

pub struct AnthropicClient {
    api_key: String,
    model: String,
    http: reqwest::Client,
    base_url: String,
}

impl AnthropicClient {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: model.to_string(),
            http: reqwest::Client::new(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    /// Generate a `T` by forcing a single tool call whose input schema is
    /// derived from the type. Non-2xx responses and schema mismatches are
    /// errors — callers keep their own fallbacks.
    pub async fn extract_structured<T>(&self, system: &str, user: &str) -> Result<T>
    where
        T: JsonSchema + DeserializeOwned,
    {
        let schema = schemars::gen::SchemaGenerator::default().into_root_schema_for::<T>();
        let tool_name = "structured_response";

        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: 4096,
            messages: vec![WireMessage::user(user)],
            system: Some(system.to_string()),
            tools: Some(vec![ToolDefinition {
                name: tool_name.to_string(),
                description: "Produce the structured response.".to_string(),
                input_schema: serde_json::to_value(schema)?,
            }]),
            tool_choice: Some(serde_json::json!({ "type": "tool", "name": tool_name })),
        };

        let response = self.chat(&request).await?;

        for block in &response.content {
            if let ContentBlock::ToolUse { input, .. } = block {
                return serde_json::from_value(input.clone())
                    .map_err(|e| anyhow!("Failed to deserialize structured output: {e}"));
            }
        }

        Err(anyhow!("No structured output in response"))
    }

    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/messages", self.base_url);

        debug!(model = request.model.as_str(), "Anthropic chat request");

        let response = self
            .http
            .post(&url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(anyhow!("Anthropic API error ({}): {}", status, error_text));
        }

        Ok(response.json().await?)
    }
}
