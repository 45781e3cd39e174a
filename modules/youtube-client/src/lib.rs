pub mod captions;
pub mod error;
pub mod types;

pub use error::{Result, YouTubeError};
pub use types::{CaptionTrack, VideoSnippet};

use serde::de::DeserializeOwned;
use types::{ChannelItem, ListResponse, PlaylistItem, VideoItem};

const API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_BASE_URL: &str = "https://www.youtube.com";

/// The Data API caps `maxResults` at 50.
const MAX_PAGE_SIZE: u32 = 50;

pub struct YouTubeClient {
    client: reqwest::Client,
    api_key: String,
    api_base: String,
    watch_base: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            api_base: API_BASE_URL.to_string(),
            watch_base: WATCH_BASE_URL.to_string(),
        }
    }

    pub fn with_base_urls(mut self, api_base: &str, watch_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.watch_base = watch_base.trim_end_matches('/').to_string();
        self
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.api_base, path);
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(YouTubeError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(resp.json().await?)
    }

    /// Title, description, channel and tags for one video.
    pub async fn get_video(&self, video_id: &str) -> Result<VideoSnippet> {
        let resp: ListResponse<VideoItem> = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;

        resp.items
            .into_iter()
            .next()
            .map(|item| item.snippet)
            .ok_or_else(|| YouTubeError::NotFound(format!("video {video_id}")))
    }

    /// Titles of a channel's most recent uploads, newest first.
    pub async fn recent_titles(&self, channel_id: &str, limit: u32) -> Result<Vec<String>> {
        let channels: ListResponse<ChannelItem> = self
            .get_json("channels", &[("part", "contentDetails"), ("id", channel_id)])
            .await?;

        let uploads = channels
            .items
            .into_iter()
            .next()
            .and_then(|c| c.content_details.related_playlists.uploads)
            .ok_or_else(|| YouTubeError::NotFound(format!("uploads for channel {channel_id}")))?;

        let max_results = limit.min(MAX_PAGE_SIZE).to_string();
        let items: ListResponse<PlaylistItem> = self
            .get_json(
                "playlistItems",
                &[
                    ("part", "snippet"),
                    ("playlistId", uploads.as_str()),
                    ("maxResults", max_results.as_str()),
                ],
            )
            .await?;

        tracing::debug!(channel_id, count = items.items.len(), "Fetched recent uploads");

        Ok(items
            .items
            .into_iter()
            .map(|i| i.snippet.title)
            .filter(|t| !t.trim().is_empty())
            .collect())
    }

    /// Caption text for a video. `Ok(None)` when the video has no captions.
    pub async fn fetch_transcript(&self, video_id: &str) -> Result<Option<String>> {
        let watch_url = format!("{}/watch?v={}", self.watch_base, video_id);
        let html = self
            .client
            .get(&watch_url)
            .header("accept-language", "en-US,en;q=0.9")
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let tracks = captions::caption_tracks(&html)?;
        let Some(track) = captions::pick_track(&tracks) else {
            tracing::debug!(video_id, "No caption tracks");
            return Ok(None);
        };

        let xml = self
            .client
            .get(&track.base_url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let text = captions::timedtext_to_text(&xml);
        Ok((!text.is_empty()).then_some(text))
    }
}
