use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokviz::{HubClient, SessionManager, Settings};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let settings = Settings::parse();

    let filter = EnvFilter::try_new(&settings.log)
        .with_context(|| format!("invalid log filter: {}", settings.log))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(hub = %settings.hub_url, timeout = ?settings.timeout(), "starting tokenizer playground");

    let hub = HubClient::new(settings.hub_url.clone(), settings.timeout())
        .context("failed to build hub client")?;
    let sessions = Arc::new(SessionManager::new(hub));

    tokviz::app::run(settings, sessions)
}
