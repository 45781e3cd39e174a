//! Transcript recovery from the public watch page.
//!
//! The watch page embeds a `captionTracks` JSON array in its player response.
//! Each track's `baseUrl` serves a timed-text XML document of `<text>` cues.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Result, YouTubeError};
use crate::types::CaptionTrack;

/// Transcripts are cut to this many characters.
pub const MAX_TRANSCRIPT_CHARS: usize = 5000;

static RE_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static RE_SPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Pull the `captionTracks` array out of a watch page. `Ok(vec![])` when the
/// video has no captions.
pub fn caption_tracks(watch_html: &str) -> Result<Vec<CaptionTrack>> {
    const KEY: &str = "\"captionTracks\":";
    let Some(start) = watch_html.find(KEY) else {
        return Ok(Vec::new());
    };
    let rest = &watch_html[start + KEY.len()..];
    let end = balanced_array_end(rest)
        .ok_or_else(|| YouTubeError::Parse("unterminated captionTracks array".into()))?;
    Ok(serde_json::from_str(&rest[..end])?)
}

/// Byte offset just past the `]` closing the array that opens `s`.
fn balanced_array_end(s: &str) -> Option<usize> {
    if !s.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }
    None
}

/// Uploaded captions beat auto-generated ones; English beats other languages.
pub fn pick_track(tracks: &[CaptionTrack]) -> Option<&CaptionTrack> {
    let english = |t: &&CaptionTrack| t.language_code.starts_with("en");
    tracks
        .iter()
        .filter(|t| !t.is_generated())
        .find(english)
        .or_else(|| tracks.iter().find(|t| !t.is_generated()))
        .or_else(|| tracks.iter().filter(|t| t.is_generated()).find(english))
        .or_else(|| tracks.first())
}

/// Flatten a timed-text XML document into one line of plain text.
pub fn timedtext_to_text(xml: &str) -> String {
    let stripped = RE_TAG.replace_all(xml, " ");
    let decoded = decode_entities(&stripped);
    let text = RE_SPACE.replace_all(&decoded, " ");
    truncate_chars(text.trim(), MAX_TRANSCRIPT_CHARS)
}

fn decode_entities(s: &str) -> String {
    // Cue text arrives double-escaped, so `&amp;` goes first.
    s.replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"var ytInitialPlayerResponse = {"captions":{"playerCaptionsTracklistRenderer":{"captionTracks":[{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=en&kind=asr","name":{"runs":[{"text":"English (auto)"}]},"languageCode":"en","kind":"asr"},{"baseUrl":"https://www.youtube.com/api/timedtext?v=abc&lang=de","name":{"runs":[{"text":"German"}]},"languageCode":"de"}],"audioTracks":[]}}};"#;

    #[test]
    fn extracts_tracks_with_nested_arrays() {
        let tracks = caption_tracks(PAGE).unwrap();
        assert_eq!(tracks.len(), 2);
        assert!(tracks[0].is_generated());
        assert!(tracks[0].base_url.contains("&lang=en"));
    }

    #[test]
    fn page_without_captions_yields_no_tracks() {
        assert!(caption_tracks("<html>no player</html>").unwrap().is_empty());
    }

    #[test]
    fn prefers_uploaded_track_over_auto_generated() {
        let tracks = caption_tracks(PAGE).unwrap();
        assert_eq!(pick_track(&tracks).unwrap().language_code, "de");
    }

    #[test]
    fn falls_back_to_auto_generated() {
        let tracks = vec![CaptionTrack {
            base_url: "u".into(),
            language_code: "en".into(),
            kind: Some("asr".into()),
        }];
        assert!(pick_track(&tracks).unwrap().is_generated());
        assert!(pick_track(&[]).is_none());
    }

    #[test]
    fn timedtext_is_flattened_and_decoded() {
        let xml = r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.1" dur="2">they don&amp;#39;t</text><text start="2.1" dur="1.5">want you
to know</text></transcript>"#;
        assert_eq!(timedtext_to_text(xml), "they don't want you to know");
    }

    #[test]
    fn timedtext_is_capped() {
        let body = "word ".repeat(3000);
        let xml = format!("<transcript><text>{body}</text></transcript>");
        assert_eq!(timedtext_to_text(&xml).chars().count(), MAX_TRANSCRIPT_CHARS);
    }
}
