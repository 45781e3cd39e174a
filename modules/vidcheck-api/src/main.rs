use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use axum::{
    http::{header, HeaderValue},
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tokio::sync::Mutex;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use twilio::{TwilioOptions, TwilioService};
use vidcheck_common::{AppConfig, FileConfig};
use vidcheck_core::{providers, PipelineDeps};

mod reply;
mod rest;

pub struct AppState {
    pub deps: PipelineDeps,
    pub twilio: Option<TwilioService>,
    pub dashboard_url: Option<String>,
    pub services: ServiceStatus,
    pub rate_limit_per_hour: usize,
    pub rate_limiter: Mutex<HashMap<IpAddr, Vec<Instant>>>,
}

/// Which providers had credentials at startup. Reported by `/health`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ServiceStatus {
    pub youtube: bool,
    pub tiktok: bool,
    pub factcheck: bool,
    pub search: bool,
    pub llm: bool,
    pub database: bool,
    pub twilio: bool,
}

impl ServiceStatus {
    fn from_config(config: &AppConfig) -> Self {
        Self {
            youtube: config.youtube_api_key.is_some(),
            tiktok: config.apify_api_key.is_some(),
            factcheck: config.google_factcheck_api_key.is_some(),
            search: config.serper_api_key.is_some(),
            llm: providers::llm_selected(config).is_some(),
            database: config.database_url.is_some(),
            twilio: config.twilio_configured(),
        }
    }
}

pub fn router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let cors = if allowed_origins.is_empty() {
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| HeaderValue::from_str(o).ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    Router::new()
        .route("/", get(|| async { "ok" }))
        .route("/health", get(rest::health))
        .route("/api/analyze", post(rest::api_analyze))
        .route("/api/runs", get(rest::api_runs))
        .route("/api/stats", get(rest::api_stats))
        .route(
            "/api/webhook",
            get(rest::webhook::verify).post(rest::webhook::receive),
        )
        .with_state(state)
        .layer(cors)
        .layer(tower_http::compression::CompressionLayer::new())
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Method and path only: query strings and client addresses stay out of logs.
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vidcheck=info".parse()?))
        .init();

    let config = AppConfig::from_env()?;
    let settings = Arc::new(FileConfig::load_or_default(config.config_path.as_deref())?);

    let store = providers::connect_store(&config).await?;
    let deps = providers::build_deps(&config, settings.clone(), store)?;

    let twilio = match (&config.twilio_account_sid, &config.twilio_auth_token) {
        (Some(sid), Some(token)) => Some(TwilioService::new(TwilioOptions {
            account_sid: sid.clone(),
            auth_token: token.clone(),
            from_number: config.twilio_phone_number.clone(),
        })),
        _ => {
            warn!("Twilio credentials not set; webhook replies are synchronous only");
            None
        }
    };

    let state = Arc::new(AppState {
        deps,
        twilio,
        dashboard_url: config.dashboard_url.clone(),
        services: ServiceStatus::from_config(&config),
        rate_limit_per_hour: settings.server.rate_limit_per_hour,
        rate_limiter: Mutex::new(HashMap::new()),
    });

    let app = router(state, &settings.server.allowed_origins);

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    info!("vidcheck API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<std::net::SocketAddr>(),
    )
    .await?;

    Ok(())
}
