//! Pipeline wiring: the shared stage dependencies and the driver that
//! chains handoffs for an end-to-end run.
//!
//! Stages keep no state between invocations; everything they share lives in
//! the persisted campaign plus the explicit handoff payloads, so each stage
//! can also be invoked on its own.

use std::sync::Arc;

use tracing::info;

use campaignflow_common::CampaignFlowError;
use campaignflow_store::CampaignRepository;

use crate::handoff::{ExistingCampaigns, IntakeRequest, SchedulingSummary};
use crate::stages::{self, intake::IntakeOutcome};
use crate::traits::{CopyGenerator, DraftPublisher, PageExtractor};

pub struct Pipeline {
    pub repository: CampaignRepository,
    pub generator: Arc<dyn CopyGenerator>,
    pub extractor: Arc<dyn PageExtractor>,
    pub publisher: Arc<dyn DraftPublisher>,
}

/// Terminal result of a full run.
#[derive(Debug)]
pub enum PipelineOutcome {
    /// Intake short-circuited on existing campaigns for the topic.
    Existing(ExistingCampaigns),
    /// All stages ran; the campaign is active.
    Scheduled(SchedulingSummary),
}

impl Pipeline {
    pub fn new(
        repository: CampaignRepository,
        generator: Arc<dyn CopyGenerator>,
        extractor: Arc<dyn PageExtractor>,
        publisher: Arc<dyn DraftPublisher>,
    ) -> Self {
        Self {
            repository,
            generator,
            extractor,
            publisher,
        }
    }

    /// Run a request through every stage it reaches.
    pub async fn run(&self, request: IntakeRequest) -> Result<PipelineOutcome, CampaignFlowError> {
        info!(topic = request.topic.as_str(), "Pipeline run starting");

        let copywriting = match stages::intake::run(self, request).await? {
            IntakeOutcome::Existing(existing) => return Ok(PipelineOutcome::Existing(existing)),
            IntakeOutcome::Research(handoff) => stages::research::run(self, handoff).await?,
            IntakeOutcome::Copywriting(handoff) => handoff,
        };

        let scheduling = stages::copywriting::run(self, copywriting).await?;
        let summary = stages::scheduling::run(self, scheduling).await?;

        Ok(PipelineOutcome::Scheduled(summary))
    }
}
