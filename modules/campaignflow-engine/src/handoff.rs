//! Handoff payloads between stages.
//!
//! Each payload carries only what the next stage needs to re-fetch the
//! campaign and act; persisted fields are always re-read from the store, so
//! nothing here is authoritative beyond the campaign id and stage inputs.

use serde::{Deserialize, Serialize};

use campaignflow_common::{CampaignSummary, ResearchBrief, ScheduledPost};

/// The original request entering the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeRequest {
    pub topic: String,
    pub description: Option<String>,
    pub publish_date: Option<String>,
    /// URL of source material; present → the research branch runs.
    pub source: Option<String>,
}

/// intake → research.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchHandoff {
    pub campaign_id: String,
    pub topic: String,
    pub description: Option<String>,
    pub publish_date: Option<String>,
    pub source: String,
}

/// intake → copywriting (research empty) and research → copywriting
/// (research filled, description/publish_date omitted).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopywritingHandoff {
    pub campaign_id: String,
    pub topic: String,
    pub description: Option<String>,
    pub publish_date: Option<String>,
    pub research: Option<ResearchBrief>,
}

/// copywriting → scheduling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingHandoff {
    pub campaign_id: String,
    pub publish_date: Option<String>,
}

/// Terminal result of the scheduling stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulingSummary {
    pub campaign_id: String,
    pub scheduled: usize,
    pub failed: usize,
    pub records: Vec<ScheduledPost>,
}

/// Terminal result of intake when the topic matches existing campaigns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExistingCampaigns {
    pub matches: Vec<CampaignSummary>,
}
