use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Platform / VideoRef
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    YouTube,
    TikTok,
    Unknown,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::YouTube => "youtube",
            Platform::TikTok => "tiktok",
            Platform::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "youtube" => Ok(Platform::YouTube),
            "tiktok" => Ok(Platform::TikTok),
            "unknown" => Ok(Platform::Unknown),
            other => Err(format!("unknown platform: {other}")),
        }
    }
}

/// A link resolved to its platform and canonical video id. For TikTok short
/// links (`/t/`, `vm.`, `vt.`) the id is the share code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRef {
    pub platform: Platform,
    pub video_id: String,
    pub url: String,
}

impl VideoRef {
    pub fn unknown(url: impl Into<String>) -> Self {
        Self {
            platform: Platform::Unknown,
            video_id: String::new(),
            url: url.into(),
        }
    }

    pub fn is_supported(&self) -> bool {
        self.platform != Platform::Unknown
    }
}

// =============================================================================
// Video content
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoContent {
    pub title: String,
    pub description: String,
    /// Stable creator id used for history lookups (channel id, TikTok handle).
    pub creator_handle: String,
    /// Display name shown to people and persisted as `video_creator`.
    pub creator_name: String,
    /// `None` is normal: many videos carry no captions.
    pub transcript: Option<String>,
    /// Tags or hashtags, without `#`.
    pub tags: Vec<String>,
}

impl VideoContent {
    pub fn has_text(&self) -> bool {
        !self.title.trim().is_empty()
            || !self.description.trim().is_empty()
            || self
                .transcript
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }
}

/// Whether the creator's recent titles lean on alarmist framing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreatorSignal {
    pub is_suspect_pattern: bool,
    pub sample_titles: Vec<String>,
    pub evidence_note: String,
}

// =============================================================================
// Claim / Evidence
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub text: String,
}

impl Claim {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactCheckEntry {
    pub publisher: String,
    pub verdict: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub domain: String,
    pub title: String,
    pub url: String,
    #[serde(default)]
    pub snippet: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Evidence {
    pub fact_checks: Vec<FactCheckEntry>,
    pub search_hits: Vec<SearchHit>,
}

impl Evidence {
    pub fn is_empty(&self) -> bool {
        self.fact_checks.is_empty() && self.search_hits.is_empty()
    }

    /// URLs of every entry that fed the tier decision, fact-checks first.
    pub fn sources(&self) -> Vec<String> {
        let mut out: Vec<String> = Vec::new();
        let urls = self
            .fact_checks
            .iter()
            .map(|f| &f.url)
            .chain(self.search_hits.iter().map(|h| &h.url));
        for url in urls {
            if !url.is_empty() && !out.contains(url) {
                out.push(url.clone());
            }
        }
        out
    }
}

// =============================================================================
// Confidence
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    Low,
    Medium,
    High,
}

impl ConfidenceTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceTier::High => "high",
            ConfidenceTier::Medium => "medium",
            ConfidenceTier::Low => "low",
        }
    }
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ConfidenceTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(ConfidenceTier::High),
            "medium" => Ok(ConfidenceTier::Medium),
            "low" => Ok(ConfidenceTier::Low),
            other => Err(format!("unknown confidence tier: {other}")),
        }
    }
}

// =============================================================================
// Run record
// =============================================================================

/// The persisted trail of one analysis. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    pub video_url: String,
    pub platform: Platform,
    pub video_title: String,
    pub video_creator: String,
    pub claim_extracted: String,
    pub confidence: ConfidenceTier,
    pub explanation: String,
    pub sources: Vec<String>,
    pub channel_is_suspect: bool,
    pub fact_checks_found: i32,
    pub search_results_found: i32,
    pub created_at: DateTime<Utc>,
}

/// What `analyze` hands back: the record plus a warning when it was not saved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(flatten)]
    pub record: RunRecord,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub warning: Option<String>,
}

/// Aggregate counts over every stored run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunStats {
    pub total_queries: i64,
    pub platform_breakdown: BTreeMap<String, i64>,
    pub confidence_breakdown: BTreeMap<String, i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(url: &str) -> SearchHit {
        SearchHit {
            domain: "reuters.com".into(),
            title: "t".into(),
            url: url.into(),
            snippet: String::new(),
        }
    }

    #[test]
    fn sources_list_fact_checks_first_without_duplicates() {
        let evidence = Evidence {
            fact_checks: vec![FactCheckEntry {
                publisher: "Snopes".into(),
                verdict: "False".into(),
                url: "https://snopes.com/a".into(),
            }],
            search_hits: vec![hit("https://reuters.com/b"), hit("https://snopes.com/a"), hit("")],
        };
        assert_eq!(
            evidence.sources(),
            vec!["https://snopes.com/a", "https://reuters.com/b"]
        );
    }

    #[test]
    fn serde_uses_lowercase_names() {
        assert_eq!(serde_json::to_string(&Platform::YouTube).unwrap(), "\"youtube\"");
        assert_eq!(serde_json::to_string(&ConfidenceTier::Medium).unwrap(), "\"medium\"");
        assert_eq!("tiktok".parse::<Platform>().unwrap(), Platform::TikTok);
    }

    #[test]
    fn content_with_only_whitespace_has_no_text() {
        let content = VideoContent {
            title: "  ".into(),
            transcript: Some("\n".into()),
            ..Default::default()
        };
        assert!(!content.has_text());
    }

    #[test]
    fn analysis_flattens_record() {
        let analysis = Analysis {
            record: RunRecord {
                video_url: "u".into(),
                platform: Platform::Unknown,
                video_title: String::new(),
                video_creator: String::new(),
                claim_extracted: String::new(),
                confidence: ConfidenceTier::Low,
                explanation: "e".into(),
                sources: vec![],
                channel_is_suspect: false,
                fact_checks_found: 0,
                search_results_found: 0,
                created_at: Utc::now(),
            },
            warning: None,
        };
        let json = serde_json::to_value(&analysis).unwrap();
        assert_eq!(json["confidence"], "low");
        assert!(json.get("warning").is_none());
    }
}
