//! Cohort portal binary
//!
//! Serves the enrollment JSON API over a file-backed study store.

mod config;
mod routes;

use clap::Parser;
use cohort_core::AllocationEngine;
use cohort_messages::{HttpGenerator, MessageGenerator, StaticGenerator};
use cohort_store::{JsonFileStore, StudyStore};
use config::PortalConfig;
use routes::Portal;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Blinded-study enrollment portal
#[derive(Debug, Parser)]
#[command(name = "cohort-portal", version, about)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "cohort.toml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long)]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = PortalConfig::load(&cli.config)?;
    let bind = cli.bind.unwrap_or(config.bind);

    let store: Arc<dyn StudyStore> = Arc::new(JsonFileStore::open(&config.store_path));
    let generator: Box<dyn MessageGenerator> = match config.messages.generator.clone() {
        Some(generator_config) => Box::new(HttpGenerator::new(generator_config)),
        None => {
            tracing::info!("no generator configured, confirmation text is static");
            Box::new(StaticGenerator::new(config.messages.fallback.clone()))
        }
    };

    let portal = Arc::new(Portal {
        engine: AllocationEngine::new(store),
        roles: config.roles.clone(),
        generator,
        fallback: config.messages.fallback.clone(),
        message_timeout: Duration::from_millis(config.messages.timeout_ms),
    });

    tracing::info!(%bind, store = %config.store_path.display(), "portal listening");
    warp::serve(routes::routes(portal)).run(bind).await;
    Ok(())
}
