use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// TOML-backed tunables. Secrets stay as env vars. Every section and field
/// is optional; an empty file yields the defaults below.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub pipeline: PipelineConfig,
    pub creator: CreatorConfig,
    pub search: SearchConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Per remote call. Apify actor runs are the slowest.
    pub timeout_secs: u64,
    /// Extra attempts after a failed call. Clamped to 1.
    pub retries: u32,
    /// Transcript words fed to claim extraction.
    pub claim_transcript_words: usize,
    /// Transcript characters fed to the brief prompt.
    pub brief_transcript_chars: usize,
    pub description_chars: usize,
    /// Hashtags appended to the claim source material.
    pub max_tags: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            retries: 0,
            claim_transcript_words: 200,
            brief_transcript_chars: 3000,
            description_chars: 800,
            max_tags: 5,
        }
    }
}

impl PipelineConfig {
    pub fn retries(&self) -> u32 {
        self.retries.min(1)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CreatorConfig {
    pub sample_size: u32,
    /// Suspect when matched / sampled is strictly greater than this.
    pub threshold: f64,
    /// Smaller samples are never suspect.
    pub min_sample: usize,
    /// Case-insensitive substrings.
    pub phrases: Vec<String>,
}

impl Default for CreatorConfig {
    fn default() -> Self {
        Self {
            sample_size: 10,
            threshold: 0.5,
            min_sample: 3,
            phrases: DEFAULT_ALARMIST_PHRASES
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

pub const DEFAULT_ALARMIST_PHRASES: &[&str] = &[
    "end of",
    "collapse",
    "catastrophe",
    "disaster",
    "warning",
    "urgent",
    "emergency",
    "crisis",
    "apocalypse",
    "doom",
    "they don't want you to know",
    "wake up",
    "truth about",
    "exposed",
    "shocking",
    "you won't believe",
    "must watch",
    "before it's too late",
    "happening now",
    "breaking",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub allowlist: Vec<String>,
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            allowlist: DEFAULT_TRUSTED_DOMAINS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_results: 5,
        }
    }
}

pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "reuters.com",
    "apnews.com",
    "bbc.com",
    "bbc.co.uk",
    "snopes.com",
    "factcheck.org",
    "politifact.com",
    "npr.org",
    "theguardian.com",
];

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `POST /api/analyze` requests per IP per hour.
    pub rate_limit_per_hour: usize,
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            rate_limit_per_hour: 10,
            allowed_origins: Vec::new(),
        }
    }
}

/// Load and parse a TOML config file.
pub fn load_config(path: &Path) -> Result<FileConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
    Ok(config)
}

impl FileConfig {
    /// `load_config` when a path is given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => load_config(p),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.creator.sample_size, 10);
        assert_eq!(config.creator.threshold, 0.5);
        assert_eq!(config.search.allowlist.len(), 9);
        assert_eq!(config.server.rate_limit_per_hour, 10);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: FileConfig = toml::from_str(
            r#"
            [creator]
            threshold = 0.3
            phrases = ["miracle cure"]

            [pipeline]
            retries = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.creator.threshold, 0.3);
        assert_eq!(config.creator.phrases, vec!["miracle cure"]);
        assert_eq!(config.creator.min_sample, 3);
        assert_eq!(config.pipeline.retries(), 1);
        assert_eq!(config.pipeline.timeout_secs, 60);
    }

    #[test]
    fn unknown_section_is_rejected() {
        assert!(toml::from_str::<FileConfig>("[graph]\nx = 1").is_err());
    }
}
