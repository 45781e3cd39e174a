use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use vidcheck_common::{Platform, VideoContent, VideoRef};

use crate::traits::{CreatorHistory, VideoSource};

/// Routes each call to the source for the video's platform.
pub struct PlatformRouter {
    youtube: Arc<dyn PlatformSource>,
    tiktok: Arc<dyn PlatformSource>,
}

/// A single platform's metadata and history, behind one object.
pub trait PlatformSource: VideoSource + CreatorHistory {}

impl<T: VideoSource + CreatorHistory> PlatformSource for T {}

impl PlatformRouter {
    pub fn new(youtube: Arc<dyn PlatformSource>, tiktok: Arc<dyn PlatformSource>) -> Self {
        Self { youtube, tiktok }
    }

    fn source(&self, platform: Platform) -> Result<&dyn PlatformSource> {
        match platform {
            Platform::YouTube => Ok(self.youtube.as_ref()),
            Platform::TikTok => Ok(self.tiktok.as_ref()),
            Platform::Unknown => Err(anyhow!("no video source for unknown platform")),
        }
    }
}

#[async_trait]
impl VideoSource for PlatformRouter {
    async fn fetch_metadata(&self, video: &VideoRef) -> Result<VideoContent> {
        self.source(video.platform)?.fetch_metadata(video).await
    }

    async fn fetch_transcript(&self, video: &VideoRef) -> Result<Option<String>> {
        self.source(video.platform)?.fetch_transcript(video).await
    }
}

#[async_trait]
impl CreatorHistory for PlatformRouter {
    async fn fetch_recent_titles(
        &self,
        platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        self.source(platform)?
            .fetch_recent_titles(platform, creator_handle, limit)
            .await
    }
}
