//! Stand-ins for providers whose credentials are missing. Each one fails
//! every call, which the pipeline already treats as "unavailable".

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ai_client::{AiError, Prompt};
use vidcheck_common::{
    FactCheckEntry, Platform, RunRecord, RunStats, SearchHit, VideoContent, VideoRef,
};

use crate::traits::{
    CreatorHistory, FactCheckIndex, RunStore, TextGenerator, TrustedSearch, VideoSource,
};

#[derive(Debug, Clone, Copy)]
pub struct Disabled(pub &'static str);

impl Disabled {
    fn error(&self) -> anyhow::Error {
        anyhow!("{} is not configured", self.0)
    }
}

#[async_trait]
impl VideoSource for Disabled {
    async fn fetch_metadata(&self, _video: &VideoRef) -> Result<VideoContent> {
        Err(self.error())
    }
}

#[async_trait]
impl CreatorHistory for Disabled {
    async fn fetch_recent_titles(&self, _: Platform, _: &str, _: u32) -> Result<Vec<String>> {
        Err(self.error())
    }
}

#[async_trait]
impl FactCheckIndex for Disabled {
    async fn query(&self, _claim: &str) -> Result<Vec<FactCheckEntry>> {
        Err(self.error())
    }
}

#[async_trait]
impl TrustedSearch for Disabled {
    async fn query(&self, _claim: &str, _allowlist: &[String]) -> Result<Vec<SearchHit>> {
        Err(self.error())
    }
}

#[async_trait]
impl TextGenerator for Disabled {
    async fn generate(&self, _prompt: &Prompt) -> ai_client::error::Result<String> {
        Err(AiError::Config(format!("{} is not configured", self.0)))
    }

    fn model(&self) -> &str {
        "disabled"
    }
}

/// Store used when no database is configured. Appends succeed and vanish.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRunStore;

#[async_trait]
impl RunStore for NoopRunStore {
    async fn append(&self, _record: &RunRecord) -> Result<()> {
        Ok(())
    }

    async fn list_recent(&self, _limit: usize) -> Result<Vec<RunRecord>> {
        Ok(Vec::new())
    }

    async fn stats(&self) -> Result<RunStats> {
        Ok(RunStats::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_provider_names_itself() {
        let err = FactCheckIndex::query(&Disabled("fact-check index"), "x")
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "fact-check index is not configured");
    }

    #[tokio::test]
    async fn noop_store_accepts_everything() {
        let store = NoopRunStore;
        assert!(store.list_recent(10).await.unwrap().is_empty());
        assert_eq!(store.stats().await.unwrap().total_queries, 0);
    }
}
