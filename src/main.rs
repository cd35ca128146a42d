mod api;
mod config;
mod error;
mod export;
mod extractor;
mod fetcher;
mod merger;
mod scrape;
mod types;

use std::sync::Arc;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use crate::api::routes::{router, ApiState};
use crate::config::Config;
use crate::error::Result;
use crate::fetcher::BrowserFetcher;

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    info!(
        "Scraping {} (marker timeout {}s, next-day cutoff {:02}:{:02}, sandbox {})",
        cfg.base_url,
        cfg.fetch_timeout_secs,
        cfg.cutoff_minutes / 60,
        cfg.cutoff_minutes % 60,
        cfg.browser_sandbox,
    );
    if let Some(path) = &cfg.chrome_path {
        info!("Using Chrome at {}", path.display());
    }

    let source = Arc::new(BrowserFetcher::new(cfg.clone()));
    let app = router(ApiState::new(source, cfg.cutoff_minutes));

    let bind_addr = format!("0.0.0.0:{}", cfg.api_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("HTTP API listening on {bind_addr}");

    axum::serve(listener, app).await?;

    Ok(())
}
