// Test mocks for the three collaborator trait boundaries:
// - MockGenerator (CopyGenerator) — canned brief/plan, or always failing
// - MockExtractor (PageExtractor) — HashMap-based url→text
// - MockPublisher (DraftPublisher) — records requests, fails on chosen calls
//
// No network, no API keys. `cargo test` in seconds.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use campaignflow_common::{
    CampaignFlowError, ContentPlan, Platform, PostDraft, ResearchBrief, ThreadDraft,
};

use crate::traits::{CopyGenerator, DraftPublisher, DraftRequest, PageExtractor};

// ---------------------------------------------------------------------------
// Test fixtures
// ---------------------------------------------------------------------------

pub fn canned_brief(topic: &str) -> ResearchBrief {
    ResearchBrief {
        title: format!("{topic} brief"),
        short_description: format!("Short take on {topic}."),
        long_description: format!("Long take on {topic}."),
        tags: vec!["test".into()],
        key_insights: vec![format!("{topic} insight")],
        sources: vec!["https://example.com".into()],
    }
}

pub fn canned_plan(topic: &str) -> ContentPlan {
    ContentPlan {
        posts: vec![
            PostDraft { platform: Platform::Twitter, text: format!("{topic} post 1") },
            PostDraft { platform: Platform::Twitter, text: format!("{topic} post 2") },
        ],
        threads: vec![ThreadDraft {
            platform: Platform::Twitter,
            posts: vec![format!("{topic} 1/2"), format!("{topic} 2/2")],
        }],
    }
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Returns canned output by default; `failing()` makes every call error so
/// fallback paths get exercised.
#[derive(Default)]
pub struct MockGenerator {
    fail: bool,
    plan: Option<ContentPlan>,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self { fail: true, plan: None }
    }

    pub fn with_plan(mut self, plan: ContentPlan) -> Self {
        self.plan = Some(plan);
        self
    }
}

#[async_trait]
impl CopyGenerator for MockGenerator {
    async fn research_brief(
        &self,
        topic: &str,
        _description: Option<&str>,
        _source_text: &str,
    ) -> Result<ResearchBrief> {
        if self.fail {
            bail!("generator down");
        }
        Ok(canned_brief(topic))
    }

    async fn content_plan(
        &self,
        topic: &str,
        _description: Option<&str>,
        _research: Option<&ResearchBrief>,
    ) -> Result<ContentPlan> {
        if self.fail {
            bail!("generator down");
        }
        Ok(self.plan.clone().unwrap_or_else(|| canned_plan(topic)))
    }
}

// ---------------------------------------------------------------------------
// MockExtractor
// ---------------------------------------------------------------------------

/// HashMap-based extractor. Returns `Err` for unregistered URLs.
#[derive(Default)]
pub struct MockExtractor {
    pages: HashMap<String, String>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_page(mut self, url: &str, text: &str) -> Self {
        self.pages.insert(url.to_string(), text.to_string());
        self
    }
}

#[async_trait]
impl PageExtractor for MockExtractor {
    async fn extract(&self, url: &str, _topic: &str) -> Result<String> {
        match self.pages.get(url) {
            Some(text) => Ok(text.clone()),
            None => bail!("no page registered for {url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// MockPublisher
// ---------------------------------------------------------------------------

/// Records every request; fails the calls whose zero-based order appears in
/// `fail_on`. `without_credentials()` makes the preflight reject.
#[derive(Default)]
pub struct MockPublisher {
    requests: Mutex<Vec<DraftRequest>>,
    fail_on: HashSet<usize>,
    calls: Mutex<usize>,
    missing_credentials: bool,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, call_indexes: &[usize]) -> Self {
        self.fail_on = call_indexes.iter().copied().collect();
        self
    }

    pub fn without_credentials() -> Self {
        Self {
            missing_credentials: true,
            ..Self::default()
        }
    }

    /// Requests seen so far, including failed calls.
    pub fn requests(&self) -> Vec<DraftRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DraftPublisher for MockPublisher {
    fn preflight(&self) -> std::result::Result<(), CampaignFlowError> {
        if self.missing_credentials {
            Err(CampaignFlowError::Validation(
                "publishing API key is not configured".into(),
            ))
        } else {
            Ok(())
        }
    }

    async fn create_draft(&self, request: &DraftRequest) -> Result<String> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            let current = *calls;
            *calls += 1;
            current
        };

        self.requests.lock().unwrap().push(request.clone());

        if self.fail_on.contains(&call) {
            bail!("simulated publish failure on call {call}");
        }
        Ok(format!("draft-{call}"))
    }
}
