// Trait boundaries between the pipeline and the outside world.
//
// Every remote collaborator sits behind one of these so the pipeline can be
// driven entirely by the mocks in `testing`: no network, no database.
// Adapters return `anyhow::Result`; the pipeline never sees those errors
// directly, `guard::guarded` turns them into `Fetch::Unavailable`.

use anyhow::Result;
use async_trait::async_trait;

use vidcheck_common::{
    FactCheckEntry, Platform, RunRecord, RunStats, SearchHit, VideoContent, VideoRef,
};

pub use ai_client::TextGenerator;

// ---------------------------------------------------------------------------
// Video content
// ---------------------------------------------------------------------------

#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Title, description, creator and tags. May already carry a transcript.
    async fn fetch_metadata(&self, video: &VideoRef) -> Result<VideoContent>;

    /// Transcript text, when the platform exposes one. `Ok(None)` is normal.
    async fn fetch_transcript(&self, _video: &VideoRef) -> Result<Option<String>> {
        Ok(None)
    }
}

#[async_trait]
pub trait CreatorHistory: Send + Sync {
    /// Titles of the creator's most recent videos, newest first.
    async fn fetch_recent_titles(
        &self,
        platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>>;
}

// ---------------------------------------------------------------------------
// Evidence
// ---------------------------------------------------------------------------

#[async_trait]
pub trait FactCheckIndex: Send + Sync {
    async fn query(&self, claim: &str) -> Result<Vec<FactCheckEntry>>;
}

#[async_trait]
pub trait TrustedSearch: Send + Sync {
    /// Search restricted to `allowlist` domains.
    async fn query(&self, claim: &str, allowlist: &[String]) -> Result<Vec<SearchHit>>;
}

// ---------------------------------------------------------------------------
// RunStore
// ---------------------------------------------------------------------------

#[async_trait]
pub trait RunStore: Send + Sync {
    async fn append(&self, record: &RunRecord) -> Result<()>;

    /// Newest first.
    async fn list_recent(&self, limit: usize) -> Result<Vec<RunRecord>>;

    async fn stats(&self) -> Result<RunStats>;
}

#[async_trait]
impl RunStore for vidcheck_store::PgRunStore {
    async fn append(&self, record: &RunRecord) -> Result<()> {
        self.append(record).await.map(|_| ())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<RunRecord>> {
        self.list_recent(limit).await
    }

    async fn stats(&self) -> Result<RunStats> {
        self.stats().await
    }
}
