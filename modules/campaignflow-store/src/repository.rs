//! CampaignRepository — campaign records keyed by id plus an append-only
//! index of every known id, layered over a [`KvStore`].

use std::sync::Arc;

use futures::future::join_all;
use serde_json::Value;
use tracing::{debug, warn};

use campaignflow_common::{Campaign, CampaignFlowError, CampaignStatus, ContentGroup, ResearchBrief, ScheduledPost};

use crate::kv::KvStore;
use crate::resolver;

const CAMPAIGN_INDEX: &str = "campaigns";

fn campaign_key(id: &str) -> String {
    format!("campaign:{id}")
}

#[derive(Clone)]
pub struct CampaignRepository {
    kv: Arc<dyn KvStore>,
}

impl CampaignRepository {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    /// Fetch a campaign. Absence is a normal branch, never an error.
    pub async fn get(&self, id: &str) -> Result<Option<Campaign>, CampaignFlowError> {
        let value = self
            .kv
            .get(&campaign_key(id))
            .await
            .map_err(|e| CampaignFlowError::Storage(e.to_string()))?;

        match value {
            Some(v) => {
                let campaign = serde_json::from_value(v)
                    .map_err(|e| CampaignFlowError::Storage(format!("corrupt record {id}: {e}")))?;
                Ok(Some(campaign))
            }
            None => Ok(None),
        }
    }

    /// Upsert the record, then register its id in the index. The index add
    /// is atomic and duplicate-free, so the only failure window left is
    /// "record written, index add failed", which surfaces as an error.
    pub async fn save(&self, campaign: &Campaign) -> Result<(), CampaignFlowError> {
        let value: Value = serde_json::to_value(campaign)
            .map_err(|e| CampaignFlowError::Storage(e.to_string()))?;

        self.kv
            .put(&campaign_key(&campaign.id), value)
            .await
            .map_err(|e| CampaignFlowError::Storage(e.to_string()))?;

        self.kv
            .index_add(CAMPAIGN_INDEX, &campaign.id)
            .await
            .map_err(|e| CampaignFlowError::Storage(e.to_string()))?;

        debug!(id = campaign.id.as_str(), status = %campaign.status, "Campaign saved");
        Ok(())
    }

    /// Resolve every indexed id with independent parallel point reads.
    /// Ids that fail to resolve are dropped with a warning — the index may
    /// briefly hold entries whose record write did not land.
    pub async fn list(&self) -> Result<Vec<Campaign>, CampaignFlowError> {
        let ids = self
            .kv
            .index_read(CAMPAIGN_INDEX)
            .await
            .map_err(|e| CampaignFlowError::Storage(e.to_string()))?;

        let fetches = ids.iter().map(|id| self.get(id));
        let results = join_all(fetches).await;

        let mut campaigns = Vec::with_capacity(ids.len());
        for (id, result) in ids.iter().zip(results) {
            match result {
                Ok(Some(campaign)) => campaigns.push(campaign),
                Ok(None) => warn!(id = id.as_str(), "Indexed campaign has no record, skipping"),
                Err(e) => warn!(id = id.as_str(), error = %e, "Failed to resolve campaign, skipping"),
            }
        }

        Ok(campaigns)
    }

    /// Create a new campaign at status=planning with a freshly minted id.
    pub async fn create(
        &self,
        topic: &str,
        description: Option<&str>,
        publish_date: Option<&str>,
    ) -> Result<Campaign, CampaignFlowError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(CampaignFlowError::Validation("topic must not be empty".into()));
        }

        let campaign = Campaign::new(topic, description, publish_date);
        self.save(&campaign).await?;
        Ok(campaign)
    }

    /// Advance a campaign's status. Regressions are rejected; setting the
    /// current status again is a no-op. Assumes a single in-flight stage per
    /// campaign id — concurrent writers of the same record can still race.
    pub async fn update_status(
        &self,
        id: &str,
        status: CampaignStatus,
    ) -> Result<Campaign, CampaignFlowError> {
        self.mutate(id, |campaign| {
            if campaign.status == status {
                return Ok(());
            }
            if !campaign.status.can_advance_to(status) {
                return Err(CampaignFlowError::Validation(format!(
                    "cannot move campaign {id} from {} back to {status}",
                    campaign.status
                )));
            }
            campaign.status = status;
            Ok(())
        })
        .await
    }

    pub async fn attach_research(
        &self,
        id: &str,
        research: ResearchBrief,
    ) -> Result<Campaign, CampaignFlowError> {
        self.mutate(id, |campaign| {
            campaign.research = Some(research);
            Ok(())
        })
        .await
    }

    pub async fn attach_content(
        &self,
        id: &str,
        content: Vec<ContentGroup>,
    ) -> Result<Campaign, CampaignFlowError> {
        self.mutate(id, |campaign| {
            campaign.content = Some(content);
            Ok(())
        })
        .await
    }

    pub async fn attach_scheduling(
        &self,
        id: &str,
        scheduling_info: Vec<ScheduledPost>,
    ) -> Result<Campaign, CampaignFlowError> {
        self.mutate(id, |campaign| {
            campaign.scheduling_info = Some(scheduling_info);
            Ok(())
        })
        .await
    }

    /// Two-tier topic lookup over all campaigns: exact matches first and
    /// alone, substring matches only when no exact match exists.
    pub async fn find_by_topic(&self, query: &str) -> Result<Vec<Campaign>, CampaignFlowError> {
        let campaigns = self.list().await?;
        Ok(resolver::find_by_topic(campaigns, query))
    }

    /// Read-mutate-touch-save. `NotFound` when the id has no record.
    async fn mutate<F>(&self, id: &str, apply: F) -> Result<Campaign, CampaignFlowError>
    where
        F: FnOnce(&mut Campaign) -> Result<(), CampaignFlowError>,
    {
        let mut campaign = self
            .get(id)
            .await?
            .ok_or_else(|| CampaignFlowError::NotFound(id.to_string()))?;

        apply(&mut campaign)?;
        campaign.touch();
        self.save(&campaign).await?;
        Ok(campaign)
    }
}
