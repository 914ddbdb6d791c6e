//! Repository behavior against the in-memory backend.

use std::collections::HashSet;
use std::sync::Arc;

use campaignflow_common::{CampaignFlowError, CampaignStatus};
use campaignflow_store::{CampaignRepository, MemoryKv};

fn repo() -> CampaignRepository {
    CampaignRepository::new(Arc::new(MemoryKv::new()))
}

#[tokio::test]
async fn get_is_idempotent_between_saves() {
    let repo = repo();
    let created = repo.create("Rust adoption", None, None).await.unwrap();

    let first = repo.get(&created.id).await.unwrap().unwrap();
    let second = repo.get(&created.id).await.unwrap().unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn get_absent_id_is_none_not_error() {
    let repo = repo();
    assert!(repo.get("no-such-id").await.unwrap().is_none());
}

#[tokio::test]
async fn list_returns_each_distinct_id_exactly_once() {
    let repo = repo();
    let a = repo.create("Topic A", None, None).await.unwrap();
    let b = repo.create("Topic B", None, None).await.unwrap();

    // Repeated saves of the same record must not duplicate the index entry.
    repo.save(&a).await.unwrap();
    repo.save(&a).await.unwrap();

    let listed = repo.list().await.unwrap();
    let ids: Vec<&str> = listed.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids.len(), 2);

    let distinct: HashSet<&str> = ids.iter().copied().collect();
    assert!(distinct.contains(a.id.as_str()));
    assert!(distinct.contains(b.id.as_str()));
    assert_eq!(distinct.len(), 2);
}

#[tokio::test]
async fn create_rejects_whitespace_topic() {
    let repo = repo();
    let err = repo.create("   ", None, None).await.unwrap_err();
    assert!(matches!(err, CampaignFlowError::Validation(_)));
}

#[tokio::test]
async fn create_trims_topic_and_starts_at_planning() {
    let repo = repo();
    let campaign = repo
        .create("  Electric Vehicles ", Some("EVs"), Some("2030-01-01"))
        .await
        .unwrap();

    assert_eq!(campaign.topic, "Electric Vehicles");
    assert_eq!(campaign.status, CampaignStatus::Planning);
    assert_eq!(campaign.description.as_deref(), Some("EVs"));
    assert_eq!(campaign.publish_date.as_deref(), Some("2030-01-01"));
    assert!(campaign.research.is_none());
    assert!(campaign.content.is_none());
    assert!(campaign.scheduling_info.is_none());
}

#[tokio::test]
async fn rapid_creates_mint_distinct_ids() {
    let repo = repo();
    let mut ids = HashSet::new();
    for _ in 0..100 {
        let campaign = repo.create("same topic", None, None).await.unwrap();
        ids.insert(campaign.id);
    }
    assert_eq!(ids.len(), 100);
}

#[tokio::test]
async fn update_status_moves_forward_and_touches() {
    let repo = repo();
    let created = repo.create("Topic", None, None).await.unwrap();

    let updated = repo
        .update_status(&created.id, CampaignStatus::Writing)
        .await
        .unwrap();
    assert_eq!(updated.status, CampaignStatus::Writing);
    assert!(updated.updated_at >= created.updated_at);
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.created_at, created.created_at);
}

#[tokio::test]
async fn update_status_rejects_regression() {
    let repo = repo();
    let created = repo.create("Topic", None, None).await.unwrap();
    repo.update_status(&created.id, CampaignStatus::Scheduling)
        .await
        .unwrap();

    let err = repo
        .update_status(&created.id, CampaignStatus::Researching)
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignFlowError::Validation(_)));

    // Same-status write is a harmless no-op.
    repo.update_status(&created.id, CampaignStatus::Scheduling)
        .await
        .unwrap();
}

#[tokio::test]
async fn update_status_unknown_id_is_not_found() {
    let repo = repo();
    let err = repo
        .update_status("ghost", CampaignStatus::Active)
        .await
        .unwrap_err();
    assert!(matches!(err, CampaignFlowError::NotFound(_)));
}

#[tokio::test]
async fn find_by_topic_prefers_exact_tier() {
    let repo = repo();
    repo.create("Cats", None, None).await.unwrap();
    repo.create("Cats and Dogs", None, None).await.unwrap();

    let exact = repo.find_by_topic("cats").await.unwrap();
    assert_eq!(exact.len(), 1);
    assert_eq!(exact[0].topic, "Cats");

    let partial = repo.find_by_topic("dog").await.unwrap();
    assert_eq!(partial.len(), 1);
    assert_eq!(partial[0].topic, "Cats and Dogs");
}
