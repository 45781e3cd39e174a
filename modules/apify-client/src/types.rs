use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Wrapper for Apify API responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
}

/// Apify actor run metadata.
#[derive(Debug, Clone, Deserialize)]
pub struct RunData {
    pub id: String,
    pub status: String,
    #[serde(rename = "defaultDatasetId")]
    pub default_dataset_id: String,
    #[serde(rename = "startedAt")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(rename = "finishedAt")]
    pub finished_at: Option<DateTime<Utc>>,
}

// --- clockworks/tiktok-scraper ---

/// Input for a single-video scrape (by post URL).
#[derive(Debug, Clone, Serialize)]
pub struct TikTokVideoInput {
    #[serde(rename = "postURLs")]
    pub post_urls: Vec<String>,
    #[serde(rename = "shouldDownloadSubtitles")]
    pub should_download_subtitles: bool,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
}

/// Input for a profile scrape (most recent posts first).
#[derive(Debug, Clone, Serialize)]
pub struct TikTokProfileInput {
    pub profiles: Vec<String>,
    #[serde(rename = "resultsPerPage")]
    pub results_per_page: u32,
    #[serde(rename = "profileSorting")]
    pub profile_sorting: String,
}

/// A single TikTok post from the Apify dataset.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokPost {
    pub id: Option<String>,
    pub text: Option<String>,
    #[serde(rename = "webVideoUrl")]
    pub web_video_url: Option<String>,
    #[serde(rename = "createTimeISO")]
    pub create_time_iso: Option<String>,
    #[serde(rename = "authorMeta")]
    pub author_meta: Option<TikTokAuthor>,
    #[serde(rename = "playCount")]
    pub play_count: Option<i64>,
    pub hashtags: Option<Vec<TikTokHashtag>>,
    #[serde(rename = "videoMeta")]
    pub video_meta: Option<TikTokVideoMeta>,
}

impl TikTokPost {
    pub fn hashtag_names(&self) -> Vec<String> {
        self.hashtags
            .iter()
            .flatten()
            .filter_map(|h| h.name.clone())
            .filter(|n| !n.is_empty())
            .collect()
    }

    /// First English subtitle link, falling back to any language.
    pub fn subtitle_url(&self) -> Option<&str> {
        let links = self.video_meta.as_ref()?.subtitle_links.as_ref()?;
        links
            .iter()
            .find(|l| {
                l.language
                    .as_deref()
                    .is_some_and(|lang| lang.to_ascii_lowercase().starts_with("en"))
            })
            .or_else(|| links.first())
            .and_then(|l| l.download_link.as_deref())
    }
}

/// Author metadata from a TikTok post.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokAuthor {
    pub name: Option<String>,
    #[serde(rename = "nickName")]
    pub nick_name: Option<String>,
}

/// A hashtag reference in a TikTok post.
#[derive(Debug, Clone, Deserialize)]
pub struct TikTokHashtag {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokVideoMeta {
    #[serde(rename = "subtitleLinks")]
    pub subtitle_links: Option<Vec<TikTokSubtitleLink>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TikTokSubtitleLink {
    pub language: Option<String>,
    #[serde(rename = "downloadLink")]
    pub download_link: Option<String>,
}

/// Collapse a WebVTT document into plain caption text.
pub fn vtt_to_text(vtt: &str) -> String {
    vtt.lines()
        .map(str::trim)
        .filter(|line| {
            !line.is_empty()
                && !line.starts_with("WEBVTT")
                && !line.contains("-->")
                && !line.starts_with("NOTE")
                && !line.chars().all(|c| c.is_ascii_digit())
        })
        .collect::<Vec<_>>()
        .join(" ")
}
