// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`.
//
//   GET  /api/v1/health     liveness + counters
//   GET  /api/v1/universe   configured symbols, in scan order
//   PUT  /api/v1/universe   replace the symbol list
//   POST /api/v1/scan       run a scan now, return the ranked results
//   GET  /api/v1/analyze/:symbol  screen one symbol, `signal` is null unless
//                                  every gate passes
//
// The scan endpoint always answers 200 with a (possibly empty) array; data
// source problems never reach the caller.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::types::ScreenResult;

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS + tracing middleware and shared
/// state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/universe", get(get_universe).put(set_universe))
        .route("/api/v1/scan", post(run_scan))
        .route("/api/v1/analyze/:symbol", get(analyze_symbol))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    scans_completed: u64,
    workers: usize,
    uptime_secs: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        scans_completed: state.scans_completed(),
        workers: state.scanner.max_workers(),
        uptime_secs: state.uptime_secs(),
        server_time: chrono::Utc::now().timestamp_millis(),
    })
}

// =============================================================================
// Universe
// =============================================================================

#[derive(Serialize)]
struct UniverseResponse {
    symbols: Vec<String>,
}

async fn get_universe(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(UniverseResponse {
        symbols: state.universe(),
    })
}

#[derive(Deserialize)]
struct UniverseUpdate {
    symbols: Vec<String>,
}

async fn set_universe(
    State(state): State<Arc<AppState>>,
    Json(update): Json<UniverseUpdate>,
) -> impl IntoResponse {
    let symbols: Vec<String> = update
        .symbols
        .iter()
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect();

    if symbols.is_empty() {
        warn!("rejected universe update with no symbols");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "At least one symbol is required" })),
        )
            .into_response();
    }

    info!(count = symbols.len(), "universe replaced");
    state.replace_universe(symbols.clone());
    Json(UniverseResponse { symbols }).into_response()
}

// =============================================================================
// Scan
// =============================================================================

async fn run_scan(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let outcome = state.run_scan().await;
    Json(outcome.results)
}

#[derive(Serialize)]
struct AnalyzeResponse {
    symbol: String,
    signal: Option<ScreenResult>,
}

async fn analyze_symbol(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> impl IntoResponse {
    let symbol = symbol.trim().to_uppercase();
    let signal = state.analyze_symbol(&symbol).await;
    Json(AnalyzeResponse { symbol, signal })
}
