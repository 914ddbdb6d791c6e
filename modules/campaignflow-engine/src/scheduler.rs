//! Content scheduler: date assignment and per-group draft publishing.
//!
//! The plan is a pure function of the content's static ordering, computed in
//! full before any network call — assignment never depends on completion
//! order. Publishing is bulkheaded per group: one failure cannot stop the
//! rest, and every input group yields exactly one output record.

use anyhow::Result as AnyResult;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::{info, warn};

use campaignflow_common::{CampaignFlowError, ContentGroup, ScheduleStatus, ScheduledPost};

use crate::traits::{DraftPublisher, DraftRequest};

/// Resolve the base publish date. Unparsable input, or a date not strictly
/// in the future, silently resolves to tomorrow — never an error.
pub fn resolve_base_date(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    if let Some(parsed) = raw.and_then(|r| parse_date(r.trim())) {
        if parsed > now {
            return parsed;
        }
    }
    now + Duration::days(1)
}

fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(9, 0, 0))
        .map(|dt| dt.and_utc())
}

/// One planned publish slot, fixed before dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedGroup {
    /// Index into the campaign's content list.
    pub group_index: usize,
    /// Stable id: kind plus the group's ordinal among groups of that kind,
    /// in original content order.
    pub group_id: String,
    pub scheduled_date: DateTime<Utc>,
}

/// Assign dates with one shared day-offset counter: all posts in original
/// relative order, then all threads in original relative order, each section
/// stably grouped by platform. Group *i* of that combined order gets
/// `base + i` days.
pub fn plan_schedule(groups: &[ContentGroup], base: DateTime<Utc>) -> Vec<PlannedGroup> {
    let mut posts = Vec::new();
    let mut threads = Vec::new();

    for (index, group) in groups.iter().enumerate() {
        let entry = (index, group.platform());
        match group {
            ContentGroup::Post(_) => posts.push(entry),
            ContentGroup::Thread(_) => threads.push(entry),
        }
    }

    // Platforms stay contiguous within each section; the sort is stable so
    // original relative order survives inside a platform.
    posts.sort_by_key(|&(_, platform)| platform);
    threads.sort_by_key(|&(_, platform)| platform);

    let mut ordinals = std::collections::HashMap::new();
    let mut group_ids = vec![String::new(); groups.len()];
    for (index, group) in groups.iter().enumerate() {
        let ordinal = ordinals.entry(group.kind()).or_insert(0usize);
        group_ids[index] = format!("{}-{}", group.kind(), ordinal);
        *ordinal += 1;
    }

    posts
        .into_iter()
        .chain(threads)
        .enumerate()
        .map(|(offset, (group_index, _))| PlannedGroup {
            group_index,
            group_id: group_ids[group_index].clone(),
            scheduled_date: base + Duration::days(offset as i64),
        })
        .collect()
}

/// Publish every planned group as an independent create-draft call.
///
/// Returns exactly one `ScheduledPost` per input group: scheduled with the
/// external id on success, failed with an empty id otherwise. Only the
/// preflight credential check can stop the batch, and it runs before any
/// item is attempted.
pub async fn schedule_content(
    publisher: &dyn DraftPublisher,
    groups: &[ContentGroup],
    base: DateTime<Utc>,
) -> Result<Vec<ScheduledPost>, CampaignFlowError> {
    publisher.preflight()?;

    let plan = plan_schedule(groups, base);
    let mut records = Vec::with_capacity(plan.len());

    for planned in &plan {
        let group = &groups[planned.group_index];
        let outcome = publish_group(publisher, group, planned).await;

        let record = match outcome {
            Ok(external_id) => ScheduledPost {
                group_id: planned.group_id.clone(),
                external_id,
                scheduled_date: planned.scheduled_date.to_rfc3339(),
                status: ScheduleStatus::Scheduled,
            },
            Err(e) => {
                warn!(
                    group_id = planned.group_id.as_str(),
                    error = %e,
                    "Draft publish failed, recording and continuing"
                );
                ScheduledPost {
                    group_id: planned.group_id.clone(),
                    external_id: String::new(),
                    scheduled_date: planned.scheduled_date.to_rfc3339(),
                    status: ScheduleStatus::Failed,
                }
            }
        };
        records.push(record);
    }

    info!(
        total = records.len(),
        failed = records
            .iter()
            .filter(|r| r.status == ScheduleStatus::Failed)
            .count(),
        "Content scheduling complete"
    );

    Ok(records)
}

async fn publish_group(
    publisher: &dyn DraftPublisher,
    group: &ContentGroup,
    planned: &PlannedGroup,
) -> AnyResult<String> {
    let request = DraftRequest {
        content: group.publish_text(),
        platform: group.platform(),
        split_into_parts: group.needs_split(),
        schedule_date: planned.scheduled_date.to_rfc3339(),
    };
    publisher.create_draft(&request).await
}
