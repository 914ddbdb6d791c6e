//! Scheduling: assign dates, publish drafts, record outcomes, terminate.
//!
//! Partial failures never abort the campaign: whatever was accumulated is
//! persisted and the campaign still advances to active. Only the publisher
//! preflight (missing credentials) is a hard stop.

use chrono::Utc;
use tracing::{info, warn};

use campaignflow_common::{CampaignFlowError, CampaignStatus, ScheduleStatus};

use crate::handoff::{SchedulingHandoff, SchedulingSummary};
use crate::pipeline::Pipeline;
use crate::scheduler;

pub async fn run(
    deps: &Pipeline,
    handoff: SchedulingHandoff,
) -> Result<SchedulingSummary, CampaignFlowError> {
    let campaign = deps
        .repository
        .get(&handoff.campaign_id)
        .await?
        .ok_or_else(|| CampaignFlowError::NotFound(handoff.campaign_id.clone()))?;

    deps.repository
        .update_status(&campaign.id, CampaignStatus::Scheduling)
        .await?;

    let groups = campaign.content.clone().unwrap_or_default();
    let base = scheduler::resolve_base_date(campaign.publish_date.as_deref(), Utc::now());

    let records = scheduler::schedule_content(deps.publisher.as_ref(), &groups, base).await?;

    let failed = records
        .iter()
        .filter(|r| r.status == ScheduleStatus::Failed)
        .count();
    let scheduled = records.len() - failed;

    deps.repository
        .attach_scheduling(&campaign.id, records.clone())
        .await?;
    deps.repository
        .update_status(&campaign.id, CampaignStatus::Active)
        .await?;

    if failed > 0 {
        warn!(
            id = campaign.id.as_str(),
            failed, scheduled, "Campaign activated with partially failed scheduling"
        );
    } else {
        info!(id = campaign.id.as_str(), scheduled, "Campaign activated");
    }

    Ok(SchedulingSummary {
        campaign_id: campaign.id,
        scheduled,
        failed,
        records,
    })
}
