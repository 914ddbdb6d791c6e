//! Stage orchestration behavior against the in-memory store and mock
//! collaborators: status walk, handoff contracts, fallbacks, dedup
//! short-circuit, end-to-end run.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};

use campaignflow_common::{CampaignFlowError, CampaignStatus, ScheduleStatus};
use campaignflow_engine::handoff::IntakeRequest;
use campaignflow_engine::stages::{self, intake::IntakeOutcome};
use campaignflow_engine::testing::{canned_brief, MockExtractor, MockGenerator, MockPublisher};
use campaignflow_engine::{fallback, Pipeline, PipelineOutcome};
use campaignflow_store::{CampaignRepository, MemoryKv};

fn pipeline_with(
    generator: MockGenerator,
    extractor: MockExtractor,
    publisher: Arc<MockPublisher>,
) -> Pipeline {
    Pipeline::new(
        CampaignRepository::new(Arc::new(MemoryKv::new())),
        Arc::new(generator),
        Arc::new(extractor),
        publisher,
    )
}

fn pipeline() -> Pipeline {
    pipeline_with(
        MockGenerator::new(),
        MockExtractor::new().on_page("https://example.com/ev", "EV source text"),
        Arc::new(MockPublisher::new()),
    )
}

fn request(topic: &str, source: Option<&str>) -> IntakeRequest {
    IntakeRequest {
        topic: topic.to_string(),
        description: Some("a description".to_string()),
        publish_date: None,
        source: source.map(String::from),
    }
}

#[tokio::test]
async fn full_run_with_source_walks_every_status_forward() {
    let deps = pipeline();

    // Intake: creates at planning and hands off to research.
    let outcome = stages::intake::run(&deps, request("Solar Power", Some("https://example.com/ev")))
        .await
        .unwrap();
    let research_handoff = match outcome {
        IntakeOutcome::Research(h) => h,
        other => panic!("expected research handoff, got {other:?}"),
    };
    assert_eq!(research_handoff.source, "https://example.com/ev");
    assert_eq!(research_handoff.topic, "Solar Power");

    let id = research_handoff.campaign_id.clone();
    let campaign = deps.repository.get(&id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Planning);

    // Research: researching, brief attached, hands off to copywriting.
    let copy_handoff = stages::research::run(&deps, research_handoff).await.unwrap();
    let campaign = deps.repository.get(&id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Researching);
    assert!(campaign.research.is_some());
    assert_eq!(copy_handoff.research, campaign.research);
    assert_eq!(copy_handoff.campaign_id, id);

    // Copywriting: writing, content attached, hands off to scheduling.
    let scheduling_handoff = stages::copywriting::run(&deps, copy_handoff).await.unwrap();
    let campaign = deps.repository.get(&id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Writing);
    assert!(campaign.content.is_some());
    assert_eq!(scheduling_handoff.campaign_id, id);

    // Scheduling: terminal summary, campaign active with records attached.
    let summary = stages::scheduling::run(&deps, scheduling_handoff).await.unwrap();
    let campaign = deps.repository.get(&id).await.unwrap().unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
    assert_eq!(summary.failed, 0);
    assert_eq!(
        campaign.scheduling_info.as_ref().map(|r| r.len()),
        Some(summary.records.len())
    );
}

#[tokio::test]
async fn end_to_end_without_source_skips_research() {
    // Failing generator forces the deterministic default plan: 3 posts + 2
    // threads.
    let deps = pipeline_with(
        MockGenerator::failing(),
        MockExtractor::new(),
        Arc::new(MockPublisher::new()),
    );

    let started = Utc::now();
    let outcome = deps.run(request("Electric Vehicles", None)).await.unwrap();
    let summary = match outcome {
        PipelineOutcome::Scheduled(s) => s,
        other => panic!("expected scheduled outcome, got {other:?}"),
    };

    assert_eq!(summary.records.len(), 5);
    assert_eq!(summary.scheduled, 5);
    assert_eq!(summary.failed, 0);

    let campaign = deps
        .repository
        .get(&summary.campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
    // Research stage never ran.
    assert!(campaign.research.is_none());
    assert_eq!(campaign.content.as_ref().map(|c| c.len()), Some(5));

    // No publish date given: base resolves to tomorrow, groups get D..D+4.
    let base: DateTime<Utc> = summary.records[0].scheduled_date.parse().unwrap();
    let drift = base - (started + Duration::days(1));
    assert!(drift.num_seconds().abs() < 5);

    for (i, record) in summary.records.iter().enumerate() {
        let date: DateTime<Utc> = record.scheduled_date.parse().unwrap();
        assert_eq!(date, base + Duration::days(i as i64));
        assert_eq!(record.status, ScheduleStatus::Scheduled);
        assert!(!record.external_id.is_empty());
    }
    assert_eq!(summary.records[0].group_id, "post-0");
    assert_eq!(summary.records[3].group_id, "thread-0");
}

#[tokio::test]
async fn duplicate_topic_short_circuits_intake() {
    let deps = pipeline();
    deps.run(request("Electric Vehicles", None)).await.unwrap();

    // Re-phrased casing of the same topic must not spawn a second campaign.
    let outcome = deps.run(request("electric vehicles", None)).await.unwrap();
    let existing = match outcome {
        PipelineOutcome::Existing(e) => e,
        other => panic!("expected existing outcome, got {other:?}"),
    };
    assert_eq!(existing.matches.len(), 1);
    assert_eq!(existing.matches[0].topic, "Electric Vehicles");

    assert_eq!(deps.repository.list().await.unwrap().len(), 1);
}

#[tokio::test]
async fn empty_topic_is_a_validation_error() {
    let deps = pipeline();
    let err = deps.run(request("   ", None)).await.unwrap_err();
    assert!(matches!(err, CampaignFlowError::Validation(_)));
}

#[tokio::test]
async fn unknown_campaign_id_is_a_not_found_terminal() {
    let deps = pipeline();
    let err = stages::research::run(
        &deps,
        campaignflow_engine::handoff::ResearchHandoff {
            campaign_id: "ghost".into(),
            topic: "Topic".into(),
            description: None,
            publish_date: None,
            source: "https://example.com".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, CampaignFlowError::NotFound(_)));
}

#[tokio::test]
async fn collaborator_failures_fall_back_deterministically() {
    // Unregistered URL (extraction fails) plus a failing generator: the
    // pipeline still completes with the locally built brief.
    let deps = pipeline_with(
        MockGenerator::failing(),
        MockExtractor::new(),
        Arc::new(MockPublisher::new()),
    );

    let outcome = deps
        .run(request("Wind Farms", Some("https://example.com/down")))
        .await
        .unwrap();
    let summary = match outcome {
        PipelineOutcome::Scheduled(s) => s,
        other => panic!("expected scheduled outcome, got {other:?}"),
    };

    let campaign = deps
        .repository
        .get(&summary.campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        campaign.research,
        Some(fallback::research_brief("Wind Farms", Some("a description")))
    );
    assert_eq!(campaign.status, CampaignStatus::Active);
}

#[tokio::test]
async fn partial_publish_failure_still_activates_campaign() {
    let publisher = Arc::new(MockPublisher::new().failing_on(&[1]));
    let deps = pipeline_with(
        MockGenerator::new(),
        MockExtractor::new(),
        publisher.clone(),
    );

    // Canned plan: 2 posts + 1 thread.
    let outcome = deps.run(request("Hydrogen", None)).await.unwrap();
    let summary = match outcome {
        PipelineOutcome::Scheduled(s) => s,
        other => panic!("expected scheduled outcome, got {other:?}"),
    };

    assert_eq!(summary.records.len(), 3);
    assert_eq!(summary.scheduled, 2);
    assert_eq!(summary.failed, 1);
    assert_eq!(publisher.requests().len(), 3);

    let campaign = deps
        .repository
        .get(&summary.campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.status, CampaignStatus::Active);
    let records = campaign.scheduling_info.unwrap();
    assert_eq!(records[1].status, ScheduleStatus::Failed);
    assert_eq!(records[1].external_id, "");
}

#[tokio::test]
async fn missing_publisher_credentials_halt_before_publishing() {
    let publisher = Arc::new(MockPublisher::without_credentials());
    let deps = pipeline_with(
        MockGenerator::new(),
        MockExtractor::new(),
        publisher.clone(),
    );

    let err = deps.run(request("Geothermal", None)).await.unwrap_err();
    assert!(matches!(err, CampaignFlowError::Validation(_)));
    assert!(publisher.requests().is_empty());

    // The campaign reached the scheduling stage but never activated.
    let campaigns = deps.repository.list().await.unwrap();
    assert_eq!(campaigns.len(), 1);
    assert_eq!(campaigns[0].status, CampaignStatus::Scheduling);
    assert!(campaigns[0].scheduling_info.is_none());
}

#[tokio::test]
async fn intake_handoff_carries_request_fields() {
    let deps = pipeline();
    let outcome = stages::intake::run(
        &deps,
        IntakeRequest {
            topic: "Batteries".into(),
            description: Some("grid storage".into()),
            publish_date: Some("2030-01-01".into()),
            source: None,
        },
    )
    .await
    .unwrap();

    let handoff = match outcome {
        IntakeOutcome::Copywriting(h) => h,
        other => panic!("expected copywriting handoff, got {other:?}"),
    };
    assert_eq!(handoff.topic, "Batteries");
    assert_eq!(handoff.description.as_deref(), Some("grid storage"));
    assert_eq!(handoff.publish_date.as_deref(), Some("2030-01-01"));
    assert!(handoff.research.is_none());
}

#[tokio::test]
async fn research_brief_comes_from_generator_when_available() {
    let deps = pipeline();
    let outcome = deps
        .run(request("Solar Power", Some("https://example.com/ev")))
        .await
        .unwrap();
    let summary = match outcome {
        PipelineOutcome::Scheduled(s) => s,
        other => panic!("expected scheduled outcome, got {other:?}"),
    };

    let campaign = deps
        .repository
        .get(&summary.campaign_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(campaign.research, Some(canned_brief("Solar Power")));
}
