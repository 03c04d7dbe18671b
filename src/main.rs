// =============================================================================
// Momentum Screener — Main Entry Point
// =============================================================================
//
// Serves a single "scan now" endpoint that screens the configured universe
// for the trend / MACD / RSI / volume-surge setup and returns the ranked
// passes.  Nothing is persisted between scans.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analyzer;
mod api;
mod app_state;
mod indicators;
mod market_data;
mod runtime_config;
mod scanner;
mod signal;
mod types;
mod yahoo;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::analyzer::Analyzer;
use crate::app_state::AppState;
use crate::market_data::HistorySource;
use crate::runtime_config::ScreenerConfig;
use crate::scanner::Scanner;
use crate::yahoo::YahooClient;

const CONFIG_PATH: &str = "screener_config.json";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("Momentum Screener starting up");

    let mut config = ScreenerConfig::load(CONFIG_PATH).unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load config, using defaults");
        ScreenerConfig::default()
    });
    config.apply_overrides(|key| std::env::var(key).ok());

    info!(
        symbols = config.symbols.len(),
        workers = config.worker_budget(),
        range = %config.history_range,
        timeout_secs = config.symbol_timeout_secs,
        "Configured universe"
    );

    // ── 2. Data source + scanner ─────────────────────────────────────────
    let source: Arc<dyn HistorySource> = Arc::new(YahooClient::new(&config.data_source_url)?);
    let analyzer = Analyzer::new(source, &config.history_range, config.symbol_timeout());
    let scanner = Scanner::new(analyzer, config.worker_budget());

    let state = Arc::new(AppState::new(config.symbols.clone(), scanner));

    // ── 3. API server ────────────────────────────────────────────────────
    let app = api::rest::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind API server to {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "API server listening");

    // ── 4. Serve until Ctrl+C ────────────────────────────────────────────
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("API server failed")?;

    info!("Momentum Screener shut down complete.");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for Ctrl+C, serving until killed");
        std::future::pending::<()>().await;
    }
    warn!("Shutdown signal received — stopping gracefully");
}
