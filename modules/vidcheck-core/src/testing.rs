// Test mocks for the analysis pipeline.
//
// One mock per trait boundary, all builder-style and all returning `Err` for
// anything not registered:
// - MockVideoSource (VideoSource + CreatorHistory): video id → content /
//   transcript, handle → recent titles; stands in for one whole platform
// - MockCreatorHistory (CreatorHistory): handle → recent titles
// - MockGenerator (TextGenerator): fixed replies for the claim and brief prompts
// - MockFactCheckIndex (FactCheckIndex): claim → entries
// - MockTrustedSearch (TrustedSearch): claim → hits
// - MemoryRunStore (RunStore): in-memory append log with a failure switch
//
// Plus `deps_with` to assemble PipelineDeps from them.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;

use ai_client::{AiError, Prompt};
use vidcheck_common::{
    FactCheckEntry, FileConfig, Platform, RunRecord, RunStats, SearchHit, VideoContent, VideoRef,
};

use crate::deps::PipelineDeps;
use crate::traits::{
    CreatorHistory, FactCheckIndex, RunStore, TextGenerator, TrustedSearch, VideoSource,
};

// ---------------------------------------------------------------------------
// MockVideoSource
// ---------------------------------------------------------------------------

/// Video id → metadata. Transcripts are optional; an unregistered transcript
/// is `Ok(None)`, like a video without captions. Also answers creator history
/// so it can sit behind a `PlatformRouter`.
#[derive(Default)]
pub struct MockVideoSource {
    metadata: HashMap<String, VideoContent>,
    transcripts: HashMap<String, String>,
    titles: HashMap<String, Vec<String>>,
    calls: AtomicUsize,
}

impl MockVideoSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_metadata(mut self, video_id: &str, content: VideoContent) -> Self {
        self.metadata.insert(video_id.to_string(), content);
        self
    }

    pub fn on_transcript(mut self, video_id: &str, transcript: &str) -> Self {
        self.transcripts
            .insert(video_id.to_string(), transcript.to_string());
        self
    }

    pub fn on_titles(mut self, handle: &str, titles: &[&str]) -> Self {
        self.titles.insert(
            handle.to_string(),
            titles.iter().map(|t| t.to_string()).collect(),
        );
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VideoSource for MockVideoSource {
    async fn fetch_metadata(&self, video: &VideoRef) -> Result<VideoContent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.metadata.get(&video.video_id).cloned().ok_or_else(|| {
            anyhow!("MockVideoSource: no metadata registered for {}", video.video_id)
        })
    }

    async fn fetch_transcript(&self, video: &VideoRef) -> Result<Option<String>> {
        Ok(self.transcripts.get(&video.video_id).cloned())
    }
}

#[async_trait]
impl CreatorHistory for MockVideoSource {
    async fn fetch_recent_titles(
        &self,
        _platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        let titles = self.titles.get(creator_handle).ok_or_else(|| {
            anyhow!("MockVideoSource: no titles registered for {creator_handle}")
        })?;
        Ok(titles.iter().take(limit as usize).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// MockCreatorHistory
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockCreatorHistory {
    titles: HashMap<String, Vec<String>>,
}

impl MockCreatorHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_titles(mut self, handle: &str, titles: &[&str]) -> Self {
        self.titles.insert(
            handle.to_string(),
            titles.iter().map(|t| t.to_string()).collect(),
        );
        self
    }
}

#[async_trait]
impl CreatorHistory for MockCreatorHistory {
    async fn fetch_recent_titles(
        &self,
        _platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        let titles = self.titles.get(creator_handle).ok_or_else(|| {
            anyhow!("MockCreatorHistory: no titles registered for {creator_handle}")
        })?;
        Ok(titles.iter().take(limit as usize).cloned().collect())
    }
}

// ---------------------------------------------------------------------------
// MockGenerator
// ---------------------------------------------------------------------------

/// Fixed replies keyed by which prompt is asking: claim extraction or brief
/// phrasing. An unset reply is an error, like an unreachable backend.
#[derive(Default)]
pub struct MockGenerator {
    claim_reply: Option<String>,
    brief_reply: Option<String>,
    claim_calls: AtomicUsize,
    brief_calls: AtomicUsize,
}

impl MockGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_claim(mut self, reply: &str) -> Self {
        self.claim_reply = Some(reply.to_string());
        self
    }

    pub fn on_brief(mut self, reply: &str) -> Self {
        self.brief_reply = Some(reply.to_string());
        self
    }

    pub fn claim_calls(&self) -> usize {
        self.claim_calls.load(Ordering::SeqCst)
    }

    pub fn brief_calls(&self) -> usize {
        self.brief_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for MockGenerator {
    async fn generate(&self, prompt: &Prompt) -> ai_client::error::Result<String> {
        let is_claim = prompt.system.as_deref() == Some(crate::claim::SYSTEM_PROMPT);
        let (reply, counter) = if is_claim {
            (&self.claim_reply, &self.claim_calls)
        } else {
            (&self.brief_reply, &self.brief_calls)
        };
        counter.fetch_add(1, Ordering::SeqCst);
        reply.clone().ok_or_else(|| AiError::Api {
            status: 503,
            message: "MockGenerator: no reply registered".to_string(),
        })
    }

    fn model(&self) -> &str {
        "mock"
    }
}

// ---------------------------------------------------------------------------
// MockFactCheckIndex / MockTrustedSearch
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MockFactCheckIndex {
    entries: HashMap<String, Vec<FactCheckEntry>>,
    calls: AtomicUsize,
}

impl MockFactCheckIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_claim(mut self, claim: &str, entries: Vec<FactCheckEntry>) -> Self {
        self.entries.insert(claim.to_string(), entries);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FactCheckIndex for MockFactCheckIndex {
    async fn query(&self, claim: &str) -> Result<Vec<FactCheckEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.entries
            .get(claim)
            .cloned()
            .ok_or_else(|| anyhow!("MockFactCheckIndex: no entries registered for {claim}"))
    }
}

#[derive(Default)]
pub struct MockTrustedSearch {
    hits: HashMap<String, Vec<SearchHit>>,
    calls: AtomicUsize,
}

impl MockTrustedSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_claim(mut self, claim: &str, hits: Vec<SearchHit>) -> Self {
        self.hits.insert(claim.to_string(), hits);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TrustedSearch for MockTrustedSearch {
    async fn query(&self, claim: &str, _allowlist: &[String]) -> Result<Vec<SearchHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.hits
            .get(claim)
            .cloned()
            .ok_or_else(|| anyhow!("MockTrustedSearch: no hits registered for {claim}"))
    }
}

// ---------------------------------------------------------------------------
// MemoryRunStore
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct MemoryRunStore {
    records: Mutex<Vec<RunRecord>>,
    failing: AtomicBool,
}

impl MemoryRunStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every append fails from now on.
    pub fn failing(self) -> Self {
        self.failing.store(true, Ordering::SeqCst);
        self
    }

    pub fn records(&self) -> Vec<RunRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl RunStore for MemoryRunStore {
    async fn append(&self, record: &RunRecord) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("MemoryRunStore: connection refused");
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<RunRecord>> {
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    async fn stats(&self) -> Result<RunStats> {
        let records = self.records.lock().unwrap();
        let mut platform_breakdown = BTreeMap::new();
        let mut confidence_breakdown = BTreeMap::new();
        for r in records.iter() {
            *platform_breakdown
                .entry(r.platform.as_str().to_string())
                .or_insert(0) += 1;
            *confidence_breakdown
                .entry(r.confidence.as_str().to_string())
                .or_insert(0) += 1;
        }
        Ok(RunStats {
            total_queries: records.len() as i64,
            platform_breakdown,
            confidence_breakdown,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Bundle of mocks kept alive alongside the deps so tests can inspect them.
pub struct MockProviders {
    pub videos: Arc<MockVideoSource>,
    pub creators: Arc<MockCreatorHistory>,
    pub generator: Arc<MockGenerator>,
    pub fact_checks: Arc<MockFactCheckIndex>,
    pub search: Arc<MockTrustedSearch>,
    pub store: Arc<MemoryRunStore>,
}

impl MockProviders {
    pub fn new() -> Self {
        Self {
            videos: Arc::new(MockVideoSource::new()),
            creators: Arc::new(MockCreatorHistory::new()),
            generator: Arc::new(MockGenerator::new()),
            fact_checks: Arc::new(MockFactCheckIndex::new()),
            search: Arc::new(MockTrustedSearch::new()),
            store: Arc::new(MemoryRunStore::new()),
        }
    }

    pub fn deps(&self) -> PipelineDeps {
        self.deps_with(FileConfig::default())
    }

    pub fn deps_with(&self, settings: FileConfig) -> PipelineDeps {
        PipelineDeps::builder()
            .videos(self.videos.clone())
            .creators(self.creators.clone())
            .generator(self.generator.clone())
            .fact_checks(self.fact_checks.clone())
            .search(self.search.clone())
            .store(self.store.clone())
            .settings(Arc::new(settings))
            .build()
    }
}

impl Default for MockProviders {
    fn default() -> Self {
        Self::new()
    }
}

pub fn youtube_content(title: &str, channel_id: &str) -> VideoContent {
    VideoContent {
        title: title.to_string(),
        creator_handle: channel_id.to_string(),
        creator_name: format!("{channel_id} channel"),
        ..Default::default()
    }
}

pub fn fact_check(publisher: &str, verdict: &str, url: &str) -> FactCheckEntry {
    FactCheckEntry {
        publisher: publisher.to_string(),
        verdict: verdict.to_string(),
        url: url.to_string(),
    }
}

pub fn search_hit(title: &str, url: &str) -> SearchHit {
    SearchHit {
        domain: String::new(),
        title: title.to_string(),
        url: url.to_string(),
        snippet: String::new(),
    }
}
