pub mod error;
pub mod types;

pub use error::{ApifyError, Result};
pub use types::{
    vtt_to_text, RunData, TikTokAuthor, TikTokPost, TikTokProfileInput, TikTokVideoInput,
};

use serde::de::DeserializeOwned;
use serde::Serialize;
use types::ApiResponse;

const BASE_URL: &str = "https://api.apify.com/v2";

/// clockworks/tiktok-scraper, addressed as `username~actor-name`.
const TIKTOK_SCRAPER: &str = "clockworks~tiktok-scraper";

pub struct ApifyClient {
    client: reqwest::Client,
    token: String,
    base_url: String,
}

impl ApifyClient {
    pub fn new(token: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            token,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    async fn check<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: body,
            });
        }
        Ok(resp.json().await?)
    }

    /// Start an actor run. Returns immediately with run metadata.
    pub async fn start_run<I: Serialize>(&self, actor_id: &str, input: &I) -> Result<RunData> {
        let url = format!("{}/acts/{}/runs", self.base_url, actor_id);
        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(input)
            .send()
            .await?;

        let api_resp: ApiResponse<RunData> = Self::check(resp).await?;
        Ok(api_resp.data)
    }

    /// Poll until a run completes. Uses `waitForFinish=60` for efficient long-polling.
    pub async fn wait_for_run(&self, run_id: &str) -> Result<RunData> {
        loop {
            let url = format!("{}/actor-runs/{}?waitForFinish=60", self.base_url, run_id);
            let resp = self
                .client
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await?;

            let api_resp: ApiResponse<RunData> = Self::check(resp).await?;
            match api_resp.data.status.as_str() {
                "SUCCEEDED" => return Ok(api_resp.data),
                "FAILED" | "ABORTED" | "TIMED-OUT" => {
                    return Err(ApifyError::RunFailed(api_resp.data.status));
                }
                _ => {
                    tracing::debug!(run_id, status = %api_resp.data.status, "Run still in progress");
                    continue;
                }
            }
        }
    }

    /// Fetch dataset items from a completed run.
    pub async fn get_dataset_items<T: DeserializeOwned>(&self, dataset_id: &str) -> Result<Vec<T>> {
        let url = format!("{}/datasets/{}/items?format=json", self.base_url, dataset_id);
        let resp = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;

        Self::check(resp).await
    }

    /// Start, poll, and collect in one call.
    async fn run_to_completion<I: Serialize, T: DeserializeOwned>(
        &self,
        actor_id: &str,
        input: &I,
    ) -> Result<Vec<T>> {
        let run = self.start_run(actor_id, input).await?;
        tracing::info!(run_id = %run.id, "Apify run started, polling for completion");

        let completed = self.wait_for_run(&run.id).await?;
        tracing::info!(
            run_id = %completed.id,
            dataset_id = %completed.default_dataset_id,
            "Run completed, fetching results"
        );

        self.get_dataset_items(&completed.default_dataset_id).await
    }

    /// Scrape a single TikTok video by URL, including subtitle links.
    pub async fn scrape_tiktok_video(&self, video_url: &str) -> Result<TikTokPost> {
        tracing::info!(video_url, "Starting TikTok video scrape");

        let input = TikTokVideoInput {
            post_urls: vec![video_url.to_string()],
            should_download_subtitles: true,
            results_per_page: 1,
        };

        let posts: Vec<TikTokPost> = self.run_to_completion(TIKTOK_SCRAPER, &input).await?;
        posts
            .into_iter()
            .next()
            .ok_or_else(|| ApifyError::Empty(video_url.to_string()))
    }

    /// Scrape the most recent posts from a TikTok profile.
    pub async fn scrape_tiktok_profile(&self, handle: &str, limit: u32) -> Result<Vec<TikTokPost>> {
        let handle = handle.trim_start_matches('@');
        tracing::info!(handle, limit, "Starting TikTok profile scrape");

        let input = TikTokProfileInput {
            profiles: vec![handle.to_string()],
            results_per_page: limit,
            profile_sorting: "latest".to_string(),
        };

        let posts: Vec<TikTokPost> = self.run_to_completion(TIKTOK_SCRAPER, &input).await?;
        tracing::info!(count = posts.len(), "Fetched TikTok posts");
        Ok(posts)
    }

    /// Download a subtitle file and flatten it to text.
    pub async fn fetch_subtitles(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ApifyError::Api {
                status: status.as_u16(),
                message: format!("subtitle download failed: {url}"),
            });
        }
        Ok(vtt_to_text(&resp.text().await?))
    }
}
