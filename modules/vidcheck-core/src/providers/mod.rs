//! Production adapters and the wiring that turns `AppConfig` into
//! `PipelineDeps`. A missing key swaps in `Disabled`, never an error.

pub mod disabled;
pub mod google_factcheck;
pub mod platforms;
pub mod serper;
pub mod tiktok;
pub mod youtube;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use ai_client::LlmProvider;
use apify_client::ApifyClient;
use vidcheck_common::{AppConfig, FileConfig};
use vidcheck_store::PgRunStore;
use youtube_client::YouTubeClient;

use crate::deps::PipelineDeps;
use crate::traits::{FactCheckIndex, RunStore, TextGenerator, TrustedSearch};

pub use disabled::{Disabled, NoopRunStore};
pub use google_factcheck::GoogleFactCheck;
pub use platforms::{PlatformRouter, PlatformSource};
pub use serper::SerperSearch;
pub use tiktok::TikTokSource;
pub use youtube::YouTubeSource;

pub fn build_deps(
    config: &AppConfig,
    settings: Arc<FileConfig>,
    store: Arc<dyn RunStore>,
) -> Result<PipelineDeps> {
    let youtube: Arc<dyn PlatformSource> = match config.youtube_api_key.as_deref() {
        Some(key) => Arc::new(YouTubeSource::new(YouTubeClient::new(key.to_string()))),
        None => Arc::new(Disabled("YouTube source")),
    };
    let tiktok: Arc<dyn PlatformSource> = match config.apify_api_key.as_deref() {
        Some(key) => Arc::new(TikTokSource::new(ApifyClient::new(key.to_string()))),
        None => Arc::new(Disabled("TikTok source")),
    };
    let router = Arc::new(PlatformRouter::new(youtube, tiktok));

    let fact_checks: Arc<dyn FactCheckIndex> = match config.google_factcheck_api_key.as_deref() {
        Some(key) => Arc::new(GoogleFactCheck::new(key)),
        None => Arc::new(Disabled("fact-check index")),
    };
    let search: Arc<dyn TrustedSearch> = match config.serper_api_key.as_deref() {
        Some(key) => Arc::new(SerperSearch::new(key, settings.search.max_results)),
        None => Arc::new(Disabled("trusted search")),
    };

    Ok(PipelineDeps::builder()
        .videos(router.clone())
        .creators(router)
        .generator(build_generator(config)?)
        .fact_checks(fact_checks)
        .search(search)
        .store(store)
        .settings(settings)
        .build())
}

/// The backend `build_generator` will use, if any has credentials.
pub fn llm_selected(config: &AppConfig) -> Option<LlmProvider> {
    LlmProvider::select(config.llm_provider, &config.llm)
}

/// The configured text generator, or `Disabled` when no backend has keys.
pub fn build_generator(config: &AppConfig) -> Result<Arc<dyn TextGenerator>> {
    match llm_selected(config) {
        Some(provider) => {
            let generator = provider
                .build(&config.llm)
                .with_context(|| format!("Failed to build {provider} generator"))?;
            info!(provider = %provider, model = generator.model(), "Text generator selected");
            Ok(generator)
        }
        None => {
            warn!(
                requested = ?config.llm_provider,
                "No LLM credentials; claim extraction will be unavailable"
            );
            Ok(Arc::new(Disabled("text generator")))
        }
    }
}

/// Postgres when `DATABASE_URL` is set, otherwise a store that keeps nothing.
pub async fn connect_store(config: &AppConfig) -> Result<Arc<dyn RunStore>> {
    match config.database_url.as_deref() {
        Some(url) => {
            let store = PgRunStore::connect(url).await?;
            store.migrate().await?;
            info!("Connected to run store");
            Ok(Arc::new(store))
        }
        None => {
            warn!("DATABASE_URL not set; runs will not be persisted");
            Ok(Arc::new(NoopRunStore))
        }
    }
}
