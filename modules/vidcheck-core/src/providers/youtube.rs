use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

use vidcheck_common::{Platform, VideoContent, VideoRef};
use youtube_client::YouTubeClient;

use crate::traits::{CreatorHistory, VideoSource};

/// YouTube Data API for metadata and history, watch-page captions for
/// transcripts. The creator handle is the channel id.
pub struct YouTubeSource {
    client: YouTubeClient,
}

impl YouTubeSource {
    pub fn new(client: YouTubeClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSource for YouTubeSource {
    async fn fetch_metadata(&self, video: &VideoRef) -> Result<VideoContent> {
        let snippet = self.client.get_video(&video.video_id).await?;
        debug!(video_id = %video.video_id, channel = %snippet.channel_id, "YouTube metadata fetched");
        Ok(VideoContent {
            title: snippet.title,
            description: snippet.description,
            creator_handle: snippet.channel_id,
            creator_name: snippet.channel_title,
            transcript: None,
            tags: snippet.tags,
        })
    }

    async fn fetch_transcript(&self, video: &VideoRef) -> Result<Option<String>> {
        Ok(self.client.fetch_transcript(&video.video_id).await?)
    }
}

#[async_trait]
impl CreatorHistory for YouTubeSource {
    async fn fetch_recent_titles(
        &self,
        _platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        Ok(self.client.recent_titles(creator_handle, limit).await?)
    }
}
