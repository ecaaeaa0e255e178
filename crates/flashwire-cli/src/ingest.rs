//! `ingest` command: one scrape cycle through the enrichment pipeline.

use anyhow::Context;
use chrono::Utc;

use flashwire_core::AppConfig;
use flashwire_db::PoolConfig;
use flashwire_feed::FeedClient;
use flashwire_llm::OllamaClient;
use flashwire_pipeline::{run_items, PgNewsStore, PipelineConfig};

use crate::runs::{counters_from_summary, fail_run_best_effort};

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let feed_url = config
        .feed_url
        .clone()
        .context("FLASHWIRE_FEED_URL is not set; ingest needs a feed to scrape")?;

    let pool =
        flashwire_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
            .await
            .context("connecting to Postgres")?;

    let feed = FeedClient::new(config.feed_timeout_secs, &config.feed_user_agent)?;
    let items = feed
        .fetch_flash_items(&feed_url, config.feed_window_minutes, Utc::now())
        .await
        .context("scraping the flash feed")?;
    tracing::info!(count = items.len(), "scrape cycle produced items");

    let generator = OllamaClient::new(&config.ollama_url, &config.ollama_model)?;
    let store = PgNewsStore::new(pool.clone());
    let pipeline_config = PipelineConfig::from_app_config(config);

    let run = flashwire_db::create_analysis_run(&pool, "ingest", "cli").await?;
    if let Err(err) = flashwire_db::start_analysis_run(&pool, run.id).await {
        fail_run_best_effort(&pool, run.id, format!("{err}")).await;
        return Err(err.into());
    }

    let summary = run_items(&store, &generator, &pipeline_config, items).await;

    if summary.seen > 0 && summary.failed == summary.seen {
        let message = format!("all {} items failed enrichment", summary.failed);
        fail_run_best_effort(&pool, run.id, message.clone()).await;
        anyhow::bail!("{message}");
    }

    flashwire_db::complete_analysis_run(&pool, run.id, counters_from_summary(summary)).await?;

    tracing::info!(
        run_id = run.id,
        seen = summary.seen,
        skipped = summary.skipped,
        analyzed = summary.analyzed,
        failed = summary.failed,
        "ingest run complete"
    );
    Ok(())
}
