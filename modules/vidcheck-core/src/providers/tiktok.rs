use anyhow::Result;
use apify_client::{ApifyClient, TikTokPost};
use async_trait::async_trait;
use tracing::debug;

use vidcheck_common::{Platform, VideoContent, VideoRef};

use crate::link;
use crate::traits::{CreatorHistory, VideoSource};

/// TikTok through the Apify scraper actor. Subtitles ride along with the
/// post, so the transcript is filled in by `fetch_metadata`.
pub struct TikTokSource {
    client: ApifyClient,
}

impl TikTokSource {
    pub fn new(client: ApifyClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl VideoSource for TikTokSource {
    async fn fetch_metadata(&self, video: &VideoRef) -> Result<VideoContent> {
        let post = self.client.scrape_tiktok_video(&video.url).await?;

        let transcript = match post.subtitle_url() {
            Some(url) => match self.client.fetch_subtitles(url).await {
                Ok(text) if !text.trim().is_empty() => Some(text),
                Ok(_) => None,
                Err(e) => {
                    debug!(error = %e, "TikTok subtitles unavailable");
                    None
                }
            },
            None => None,
        };

        let mut content = post_content(&post);
        if content.creator_handle.is_empty() {
            content.creator_handle = link::tiktok_handle(&video.url).unwrap_or_default();
        }
        content.transcript = transcript;
        Ok(content)
    }
}

#[async_trait]
impl CreatorHistory for TikTokSource {
    async fn fetch_recent_titles(
        &self,
        _platform: Platform,
        creator_handle: &str,
        limit: u32,
    ) -> Result<Vec<String>> {
        let posts = self.client.scrape_tiktok_profile(creator_handle, limit).await?;
        Ok(posts
            .iter()
            .map(|p| caption_title(p.text.as_deref().unwrap_or_default()))
            .filter(|t| !t.is_empty())
            .collect())
    }
}

/// TikTok has no titles; the caption's first line stands in for one.
fn caption_title(caption: &str) -> String {
    caption
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string()
}

fn post_content(post: &TikTokPost) -> VideoContent {
    let caption = post.text.as_deref().unwrap_or_default().trim();
    let author = post.author_meta.as_ref();
    let handle = author
        .and_then(|a| a.name.clone())
        .unwrap_or_default();
    let name = author
        .and_then(|a| a.nick_name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| handle.clone());

    VideoContent {
        title: caption_title(caption),
        description: caption.to_string(),
        creator_handle: handle,
        creator_name: name,
        transcript: None,
        tags: post.hashtag_names(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_maps_to_content() {
        let post: TikTokPost = serde_json::from_value(serde_json::json!({
            "id": "7301",
            "text": "They are hiding this from you\nfull story below #health #truth",
            "authorMeta": { "name": "wellnessdaily", "nickName": "Wellness Daily" },
            "hashtags": [{ "name": "health" }, { "name": "truth" }]
        }))
        .unwrap();
        let content = post_content(&post);
        assert_eq!(content.title, "They are hiding this from you");
        assert_eq!(content.creator_handle, "wellnessdaily");
        assert_eq!(content.creator_name, "Wellness Daily");
        assert_eq!(content.tags, vec!["health", "truth"]);
    }

    #[test]
    fn missing_author_leaves_handle_empty() {
        let post: TikTokPost = serde_json::from_value(serde_json::json!({ "text": "hi" })).unwrap();
        let content = post_content(&post);
        assert!(content.creator_handle.is_empty());
        assert!(content.creator_name.is_empty());
    }
}
