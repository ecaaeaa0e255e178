//! `resume` command: drain the stored backlog of unfinished records.

use anyhow::Context;

use flashwire_core::AppConfig;
use flashwire_db::PoolConfig;
use flashwire_llm::OllamaClient;
use flashwire_pipeline::{run_backlog, PgNewsStore, PipelineConfig};

use crate::runs::{counters_from_summary, fail_run_best_effort};

pub(crate) async fn run(config: &AppConfig, limit: i64) -> anyhow::Result<()> {
    let pool =
        flashwire_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
            .await
            .context("connecting to Postgres")?;

    let generator = OllamaClient::new(&config.ollama_url, &config.ollama_model)?;
    let store = PgNewsStore::new(pool.clone());
    let pipeline_config = PipelineConfig::from_app_config(config);

    let run = flashwire_db::create_analysis_run(&pool, "resume", "cli").await?;
    if let Err(err) = flashwire_db::start_analysis_run(&pool, run.id).await {
        fail_run_best_effort(&pool, run.id, format!("{err}")).await;
        return Err(err.into());
    }

    let summary = match run_backlog(&store, &generator, &pipeline_config, limit).await {
        Ok(summary) => summary,
        Err(err) => {
            fail_run_best_effort(&pool, run.id, format!("{err}")).await;
            return Err(err.into());
        }
    };

    flashwire_db::complete_analysis_run(&pool, run.id, counters_from_summary(summary)).await?;

    tracing::info!(
        run_id = run.id,
        seen = summary.seen,
        analyzed = summary.analyzed,
        failed = summary.failed,
        "resume run complete"
    );
    Ok(())
}
