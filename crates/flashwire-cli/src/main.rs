mod ingest;
mod migrate;
mod resume;
mod runs;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "flashwire")]
#[command(about = "Financial flash-news ingestion and enrichment pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one scrape cycle through the enrichment pipeline
    Ingest,
    /// Resume enrichment over the stored backlog
    Resume {
        /// Maximum number of unfinished records to pick up
        #[arg(long, default_value_t = 500)]
        limit: i64,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = flashwire_core::load_app_config()?;
    init_tracing(&config.log_level);

    let cli = Cli::parse();
    match cli.command {
        Commands::Ingest => ingest::run(&config).await,
        Commands::Resume { limit } => resume::run(&config, limit).await,
        Commands::Migrate => migrate::run(&config).await,
    }
}

fn init_tracing(log_level: &str) {
    // RUST_LOG wins over the configured level when set.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_owned()));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
