//! Intake: dedup against existing campaigns, create, route.

use tracing::info;

use campaignflow_common::CampaignFlowError;

use crate::handoff::{CopywritingHandoff, ExistingCampaigns, IntakeRequest, ResearchHandoff};
use crate::pipeline::Pipeline;

/// Exactly one of: terminal duplicate response, or a handoff to the single
/// next stage (research when a source accompanies the topic, copywriting
/// otherwise).
#[derive(Debug)]
pub enum IntakeOutcome {
    Existing(ExistingCampaigns),
    Research(ResearchHandoff),
    Copywriting(CopywritingHandoff),
}

pub async fn run(deps: &Pipeline, request: IntakeRequest) -> Result<IntakeOutcome, CampaignFlowError> {
    let matches = deps.repository.find_by_topic(&request.topic).await?;
    if !matches.is_empty() {
        info!(
            topic = request.topic.as_str(),
            matches = matches.len(),
            "Topic matches existing campaigns, not creating a new one"
        );
        return Ok(IntakeOutcome::Existing(ExistingCampaigns {
            matches: matches.iter().map(|c| c.summary()).collect(),
        }));
    }

    let campaign = deps
        .repository
        .create(
            &request.topic,
            request.description.as_deref(),
            request.publish_date.as_deref(),
        )
        .await?;

    info!(
        id = campaign.id.as_str(),
        topic = campaign.topic.as_str(),
        has_source = request.source.is_some(),
        "Campaign created"
    );

    let outcome = match request.source {
        Some(source) => IntakeOutcome::Research(ResearchHandoff {
            campaign_id: campaign.id,
            topic: campaign.topic,
            description: campaign.description,
            publish_date: campaign.publish_date,
            source,
        }),
        None => IntakeOutcome::Copywriting(CopywritingHandoff {
            campaign_id: campaign.id,
            topic: campaign.topic,
            description: campaign.description,
            publish_date: campaign.publish_date,
            research: None,
        }),
    };

    Ok(outcome)
}
