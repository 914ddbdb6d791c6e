//! Research: extract the source, generate a brief, attach it.
//!
//! Both collaborator failures recover locally — a placeholder for the
//! extraction, a deterministic brief for the generation. Neither ever halts
//! the pipeline.

use tracing::{info, warn};

use campaignflow_common::{CampaignFlowError, CampaignStatus};

use crate::fallback;
use crate::handoff::{CopywritingHandoff, ResearchHandoff};
use crate::pipeline::Pipeline;

pub async fn run(
    deps: &Pipeline,
    handoff: ResearchHandoff,
) -> Result<CopywritingHandoff, CampaignFlowError> {
    let campaign = deps
        .repository
        .get(&handoff.campaign_id)
        .await?
        .ok_or_else(|| CampaignFlowError::NotFound(handoff.campaign_id.clone()))?;

    deps.repository
        .update_status(&campaign.id, CampaignStatus::Researching)
        .await?;

    let source_text = match deps.extractor.extract(&handoff.source, &campaign.topic).await {
        Ok(text) => text,
        Err(e) => {
            warn!(
                url = handoff.source.as_str(),
                error = %e,
                "Extraction failed, substituting placeholder"
            );
            fallback::extraction_placeholder(&campaign.topic, &handoff.source)
        }
    };

    let brief = match deps
        .generator
        .research_brief(&campaign.topic, campaign.description.as_deref(), &source_text)
        .await
    {
        Ok(brief) => brief,
        Err(e) => {
            warn!(
                id = campaign.id.as_str(),
                error = %e,
                "Research generation failed, substituting deterministic brief"
            );
            fallback::research_brief(&campaign.topic, campaign.description.as_deref())
        }
    };

    let updated = deps
        .repository
        .attach_research(&campaign.id, brief.clone())
        .await?;

    info!(id = updated.id.as_str(), "Research attached");

    Ok(CopywritingHandoff {
        campaign_id: updated.id,
        topic: updated.topic,
        description: None,
        publish_date: None,
        research: Some(brief),
    })
}
