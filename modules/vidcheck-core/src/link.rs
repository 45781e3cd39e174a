//! Link resolution: arbitrary user input to a (platform, video id) pair.
//!
//! Anything that doesn't match a known shape resolves to `Platform::Unknown`
//! instead of failing, so the caller can still answer.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use vidcheck_common::{Platform, VideoRef};

static RE_YOUTUBE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{11}$").unwrap());
static RE_TIKTOK_ID: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{5,}$").unwrap());
static RE_SHARE_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{3,}$").unwrap());
static RE_MESSAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"https?://[^\s<>"{}|\\^`\[\]]+"#).unwrap());

/// Resolve a link. Never fails; unsupported input yields `Platform::Unknown`.
pub fn resolve(input: &str) -> VideoRef {
    let raw = input.trim();
    let Some(url) = parse_lenient(raw) else {
        return VideoRef::unknown(raw);
    };
    let Some(host) = url.host_str().map(|h| h.to_ascii_lowercase()) else {
        return VideoRef::unknown(raw);
    };
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    let found = match normalize_host(&host) {
        "youtube.com" => youtube_id(&url, &segments).map(|id| (Platform::YouTube, id)),
        "youtu.be" => segments
            .first()
            .filter(|id| RE_YOUTUBE_ID.is_match(id))
            .map(|id| (Platform::YouTube, id.to_string())),
        "tiktok.com" => tiktok_id(&segments).map(|id| (Platform::TikTok, id)),
        "vm.tiktok.com" | "vt.tiktok.com" => segments
            .first()
            .filter(|code| RE_SHARE_CODE.is_match(code))
            .map(|code| (Platform::TikTok, code.to_string())),
        _ => None,
    };

    match found {
        Some((platform, video_id)) => VideoRef {
            platform,
            video_id,
            url: raw.to_string(),
        },
        None => VideoRef::unknown(raw),
    }
}

/// First http(s) URL in a free-text message.
pub fn extract_url_from_message(message: &str) -> Option<String> {
    RE_MESSAGE_URL
        .find(message)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ')', '!', '?']).to_string())
}

/// The `@handle` in a full TikTok video URL, without the `@`.
pub fn tiktok_handle(url: &str) -> Option<String> {
    let url = parse_lenient(url)?;
    url.path_segments()?
        .find_map(|seg| seg.strip_prefix('@'))
        .filter(|h| !h.is_empty())
        .map(str::to_string)
}

fn parse_lenient(raw: &str) -> Option<Url> {
    if raw.is_empty() || raw.contains(char::is_whitespace) {
        return None;
    }
    let with_scheme = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    let url = Url::parse(&with_scheme).ok()?;
    matches!(url.scheme(), "http" | "https").then_some(url)
}

fn normalize_host(host: &str) -> &str {
    for prefix in ["www.", "m.", "music."] {
        if let Some(rest) = host.strip_prefix(prefix) {
            return rest;
        }
    }
    host
}

fn youtube_id(url: &Url, segments: &[&str]) -> Option<String> {
    let id = match segments {
        ["watch", ..] => url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.into_owned()),
        ["shorts" | "embed" | "live", id, ..] => Some(id.to_string()),
        _ => None,
    }?;
    RE_YOUTUBE_ID.is_match(&id).then_some(id)
}

fn tiktok_id(segments: &[&str]) -> Option<String> {
    match segments {
        [user, "video", id, ..] if user.starts_with('@') && RE_TIKTOK_ID.is_match(id) => {
            Some(id.to_string())
        }
        ["t", code, ..] if RE_SHARE_CODE.is_match(code) => Some(code.to_string()),
        _ => None,
    }
}
