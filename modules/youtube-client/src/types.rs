use serde::Deserialize;

/// Generic `items` list returned by every Data API endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub channel_id: String,
    #[serde(default)]
    pub channel_title: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelItem {
    pub id: String,
    pub content_details: ChannelContentDetails,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelContentDetails {
    pub related_playlists: RelatedPlaylists,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelatedPlaylists {
    pub uploads: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItem {
    pub snippet: PlaylistItemSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaylistItemSnippet {
    #[serde(default)]
    pub title: String,
}

/// One entry of the watch page's `captionTracks` array.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    #[serde(default)]
    pub language_code: String,
    /// `"asr"` for auto-generated tracks; absent for uploaded captions.
    pub kind: Option<String>,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_list_parses() {
        let json = r#"{"items":[{"id":"abc","snippet":{
            "title":"The truth about tap water",
            "description":"Links below",
            "channelId":"UC123",
            "channelTitle":"Water Facts",
            "tags":["water","health"]}}]}"#;
        let resp: ListResponse<VideoItem> = serde_json::from_str(json).unwrap();
        let snippet = &resp.items[0].snippet;
        assert_eq!(snippet.channel_id, "UC123");
        assert_eq!(snippet.tags.len(), 2);
    }

    #[test]
    fn empty_list_has_no_items() {
        let resp: ListResponse<VideoItem> = serde_json::from_str(r#"{"kind":"x"}"#).unwrap();
        assert!(resp.items.is_empty());
    }

    #[test]
    fn channel_and_playlist_lists_parse() {
        let channels: ListResponse<ChannelItem> = serde_json::from_str(
            r#"{"items":[{"id":"UC123","contentDetails":{"relatedPlaylists":{"uploads":"UU123"}}}]}"#,
        )
        .unwrap();
        assert_eq!(
            channels.items[0].content_details.related_playlists.uploads.as_deref(),
            Some("UU123")
        );

        let uploads: ListResponse<PlaylistItem> =
            serde_json::from_str(r#"{"items":[{"snippet":{"title":"Storm prep"}}]}"#).unwrap();
        assert_eq!(uploads.items[0].snippet.title, "Storm prep");

        let none: ListResponse<PlaylistItem> = serde_json::from_str("{}").unwrap();
        assert!(none.items.is_empty());
    }
}
