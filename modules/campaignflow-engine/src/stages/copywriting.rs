//! Copywriting: generate the content plan and attach it as groups.

use tracing::{info, warn};

use campaignflow_common::{CampaignFlowError, CampaignStatus};

use crate::fallback;
use crate::handoff::{CopywritingHandoff, SchedulingHandoff};
use crate::pipeline::Pipeline;

pub async fn run(
    deps: &Pipeline,
    handoff: CopywritingHandoff,
) -> Result<SchedulingHandoff, CampaignFlowError> {
    let campaign = deps
        .repository
        .get(&handoff.campaign_id)
        .await?
        .ok_or_else(|| CampaignFlowError::NotFound(handoff.campaign_id.clone()))?;

    deps.repository
        .update_status(&campaign.id, CampaignStatus::Writing)
        .await?;

    // The persisted record wins over the payload for anything it holds.
    let research = campaign.research.clone().or(handoff.research);

    let plan = match deps
        .generator
        .content_plan(&campaign.topic, campaign.description.as_deref(), research.as_ref())
        .await
    {
        Ok(plan) => plan,
        Err(e) => {
            warn!(
                id = campaign.id.as_str(),
                error = %e,
                "Content generation failed, substituting deterministic plan"
            );
            fallback::content_plan(&campaign.topic, campaign.description.as_deref())
        }
    };

    let groups = plan.into_groups();
    info!(id = campaign.id.as_str(), groups = groups.len(), "Content attached");

    deps.repository.attach_content(&campaign.id, groups).await?;

    Ok(SchedulingHandoff {
        campaign_id: campaign.id,
        publish_date: campaign.publish_date,
    })
}
