// Trait abstractions for the stage collaborators.
//
// CopyGenerator — structured generation (research briefs, content plans).
// PageExtractor — URL → text for the research stage.
// DraftPublisher — one create-draft call per content group.
//
// These enable deterministic testing with MockGenerator, MockExtractor and
// MockPublisher: no network, no API keys. Every production call site keeps a
// deterministic fallback; only the publisher preflight is a hard stop.

use anyhow::Result;
use async_trait::async_trait;

use campaignflow_common::{CampaignFlowError, ContentPlan, Platform, ResearchBrief};

// ---------------------------------------------------------------------------
// CopyGenerator
// ---------------------------------------------------------------------------

#[async_trait]
pub trait CopyGenerator: Send + Sync {
    /// Generate a research brief for a topic, grounded in the extracted
    /// source text.
    async fn research_brief(
        &self,
        topic: &str,
        description: Option<&str>,
        source_text: &str,
    ) -> Result<ResearchBrief>;

    /// Generate a content plan for a topic, optionally grounded in research.
    async fn content_plan(
        &self,
        topic: &str,
        description: Option<&str>,
        research: Option<&ResearchBrief>,
    ) -> Result<ContentPlan>;
}

#[async_trait]
impl CopyGenerator for anthropic_client::AnthropicClient {
    async fn research_brief(
        &self,
        topic: &str,
        description: Option<&str>,
        source_text: &str,
    ) -> Result<ResearchBrief> {
        let system = "You are a marketing researcher. Produce a concise, factual \
                      research brief for a social content campaign.";
        let user = format!(
            "Topic: {topic}\nDescription: {}\n\nSource material:\n{source_text}",
            description.unwrap_or("(none)")
        );
        self.extract_structured(system, &user).await
    }

    async fn content_plan(
        &self,
        topic: &str,
        description: Option<&str>,
        research: Option<&ResearchBrief>,
    ) -> Result<ContentPlan> {
        let system = "You are a social media copywriter. Produce standalone posts \
                      and multi-post threads for the topic.";
        let research_block = match research {
            Some(brief) => serde_json::to_string_pretty(brief)?,
            None => "(no research available)".to_string(),
        };
        let user = format!(
            "Topic: {topic}\nDescription: {}\n\nResearch:\n{research_block}",
            description.unwrap_or("(none)")
        );
        self.extract_structured(system, &user).await
    }
}

// ---------------------------------------------------------------------------
// PageExtractor
// ---------------------------------------------------------------------------

#[async_trait]
pub trait PageExtractor: Send + Sync {
    /// Extract readable text from a URL. The topic is passed for providers
    /// that support focused extraction.
    async fn extract(&self, url: &str, topic: &str) -> Result<String>;
}

#[async_trait]
impl PageExtractor for firecrawl_client::FirecrawlClient {
    async fn extract(&self, url: &str, _topic: &str) -> Result<String> {
        Ok(self.scrape(url).await?)
    }
}

// ---------------------------------------------------------------------------
// DraftPublisher
// ---------------------------------------------------------------------------

/// One publish request per content group.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftRequest {
    pub content: String,
    pub platform: Platform,
    pub split_into_parts: bool,
    pub schedule_date: String,
}

#[async_trait]
pub trait DraftPublisher: Send + Sync {
    /// Credential check, run once before any item is attempted.
    fn preflight(&self) -> Result<(), CampaignFlowError>;

    /// Create one scheduled draft; returns the external id. Any failure is
    /// terminal for this single call.
    async fn create_draft(&self, request: &DraftRequest) -> Result<String>;
}

#[async_trait]
impl DraftPublisher for typefully_client::TypefullyClient {
    fn preflight(&self) -> Result<(), CampaignFlowError> {
        if self.has_credentials() {
            Ok(())
        } else {
            Err(CampaignFlowError::Validation(
                "publishing API key is not configured".into(),
            ))
        }
    }

    async fn create_draft(&self, request: &DraftRequest) -> Result<String> {
        let wire = typefully_client::CreateDraftRequest::new(
            &request.content,
            &request.platform.to_string(),
            request.split_into_parts,
            &request.schedule_date,
        );
        Ok(self.create_draft(&wire).await?)
    }
}
