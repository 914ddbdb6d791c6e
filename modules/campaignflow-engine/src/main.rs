use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use anthropic_client::AnthropicClient;
use campaignflow_common::Config;
use campaignflow_engine::handoff::IntakeRequest;
use campaignflow_engine::{Pipeline, PipelineOutcome};
use campaignflow_store::{CampaignRepository, PgKv};
use firecrawl_client::FirecrawlClient;
use typefully_client::TypefullyClient;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("campaignflow=info".parse()?),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let topic = args
        .next()
        .ok_or_else(|| anyhow!("usage: campaignflow <topic> [source-url] [publish-date]"))?;
    let source = args.next();
    let publish_date = args.next();

    info!("CampaignFlow starting...");

    let config = Config::from_env();

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await?;
    let kv = PgKv::new(pool);
    kv.ensure_schema().await?;

    let pipeline = Pipeline::new(
        CampaignRepository::new(Arc::new(kv)),
        Arc::new(AnthropicClient::new(
            &config.anthropic_api_key,
            &config.anthropic_model,
        )),
        Arc::new(FirecrawlClient::new(&config.firecrawl_api_key)),
        Arc::new(TypefullyClient::new(&config.typefully_api_key)),
    );

    let outcome = pipeline
        .run(IntakeRequest {
            topic,
            description: None,
            publish_date,
            source,
        })
        .await?;

    match outcome {
        PipelineOutcome::Existing(existing) => {
            for summary in existing.matches {
                info!(
                    id = summary.id.as_str(),
                    topic = summary.topic.as_str(),
                    status = %summary.status,
                    "Matching campaign already exists"
                );
            }
        }
        PipelineOutcome::Scheduled(summary) => {
            info!(
                campaign = summary.campaign_id.as_str(),
                scheduled = summary.scheduled,
                failed = summary.failed,
                "Pipeline run complete"
            );
        }
    }

    Ok(())
}
