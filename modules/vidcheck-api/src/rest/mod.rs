pub mod webhook;

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use vidcheck_core::{analyze, RunStore};

use crate::AppState;

const MAX_URL_CHARS: usize = 2048;
const DEFAULT_RUNS_LIMIT: usize = 20;
const MAX_RUNS_LIMIT: usize = 100;

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}

// ---------------------------------------------------------------------------
// Rate limiting
// ---------------------------------------------------------------------------

/// Sliding one-hour window. Records the request and returns true when allowed.
pub fn check_rate_limit(entries: &mut Vec<Instant>, now: Instant, max_per_hour: usize) -> bool {
    let cutoff = now - Duration::from_secs(3600);
    entries.retain(|t| *t > cutoff);
    if entries.len() >= max_per_hour {
        return false;
    }
    entries.push(now);
    true
}

/// Drop addresses with no requests in the last hour.
pub fn prune_empty_entries(limiter: &mut HashMap<IpAddr, Vec<Instant>>, now: Instant) {
    let cutoff = now - Duration::from_secs(3600);
    limiter.retain(|_, entries| {
        entries.retain(|t| *t > cutoff);
        !entries.is_empty()
    });
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct AnalyzeRequest {
    url: String,
}

pub async fn api_analyze(
    State(state): State<Arc<AppState>>,
    ConnectInfo(addr): ConnectInfo<std::net::SocketAddr>,
    Json(body): Json<AnalyzeRequest>,
) -> Response {
    let url = body.url.trim().to_string();
    if url.is_empty() {
        return error_response(StatusCode::BAD_REQUEST, "url is required");
    }
    if url.chars().count() > MAX_URL_CHARS {
        return error_response(StatusCode::BAD_REQUEST, "URL too long (max 2048 characters)");
    }

    {
        let mut limiter = state.rate_limiter.lock().await;
        let now = Instant::now();
        if limiter.len() > 1000 {
            prune_empty_entries(&mut limiter, now);
        }
        let entries = limiter.entry(addr.ip()).or_default();
        if !check_rate_limit(entries, now, state.rate_limit_per_hour) {
            return error_response(StatusCode::TOO_MANY_REQUESTS, "Rate limit exceeded, try again later");
        }
    }

    let analysis = analyze(&state.deps, &url).await;
    info!(
        confidence = analysis.record.confidence.as_str(),
        saved = analysis.warning.is_none(),
        "Analyze request served"
    );
    Json(analysis).into_response()
}

#[derive(Deserialize)]
pub struct RunsQuery {
    limit: Option<usize>,
}

pub async fn api_runs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RunsQuery>,
) -> Response {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_RUNS_LIMIT)
        .clamp(1, MAX_RUNS_LIMIT);
    match state.deps.store.list_recent(limit).await {
        Ok(runs) => Json(runs).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to list runs");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load runs")
        }
    }
}

pub async fn api_stats(State(state): State<Arc<AppState>>) -> Response {
    match state.deps.store.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            warn!(error = %e, "Failed to compute stats");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load stats")
        }
    }
}

pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "services": state.services,
    }))
}
