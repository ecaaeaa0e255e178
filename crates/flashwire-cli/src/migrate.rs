//! `migrate` command: apply pending schema migrations.

use anyhow::Context;

use flashwire_core::AppConfig;
use flashwire_db::PoolConfig;

pub(crate) async fn run(config: &AppConfig) -> anyhow::Result<()> {
    let pool =
        flashwire_db::connect_pool(&config.database_url, PoolConfig::from_app_config(config))
            .await
            .context("connecting to Postgres")?;

    flashwire_db::run_migrations(&pool)
        .await
        .context("applying migrations")?;
    flashwire_db::ping(&pool).await.context("post-migration ping")?;

    tracing::info!("migrations applied");
    Ok(())
}
