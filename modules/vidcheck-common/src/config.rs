use std::path::PathBuf;

use ai_client::{Credentials, LlmProvider};
use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Contains only secrets and env-specific values; thresholds, allow-lists
/// and timeouts live in the TOML FileConfig. Every key is optional: a missing
/// key disables the provider that needs it.
#[derive(Debug, Clone)]
pub struct AppConfig {
    // Database
    pub database_url: Option<String>,

    // Video sources
    pub youtube_api_key: Option<String>,
    pub apify_api_key: Option<String>,

    // Evidence
    pub google_factcheck_api_key: Option<String>,
    pub serper_api_key: Option<String>,

    // AI / LLM
    /// `None` means auto: first backend with credentials wins.
    pub llm_provider: Option<LlmProvider>,
    pub llm: Credentials,

    // Messaging
    pub twilio_account_sid: Option<String>,
    pub twilio_auth_token: Option<String>,
    pub twilio_phone_number: String,
    pub dashboard_url: Option<String>,

    // Tunables
    pub config_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Credentials::default();
        let config = Self {
            database_url: env_opt("DATABASE_URL"),
            youtube_api_key: env_opt("YOUTUBE_API_KEY"),
            apify_api_key: env_opt("APIFY_API_KEY"),
            google_factcheck_api_key: env_opt("GOOGLE_API_KEY"),
            serper_api_key: env_opt("SERPER_API_KEY"),
            llm_provider: parse_provider(env_opt("LLM_PROVIDER").as_deref())?,
            llm: Credentials {
                openrouter_api_key: env_opt("OPENROUTER_API_KEY"),
                openrouter_model: env_opt("OPENROUTER_MODEL").unwrap_or(defaults.openrouter_model),
                openai_api_key: env_opt("OPENAI_API_KEY"),
                openai_model: env_opt("OPENAI_MODEL").unwrap_or(defaults.openai_model),
                azure_api_key: env_opt("LLM_API_KEY"),
                azure_endpoint: env_opt("LLM_ENDPOINT"),
                azure_model: env_opt("LLM_MODEL").unwrap_or(defaults.azure_model),
                azure_api_version: env_opt("LLM_API_VERSION")
                    .unwrap_or(defaults.azure_api_version),
                anthropic_api_key: env_opt("ANTHROPIC_API_KEY"),
                anthropic_model: env_opt("ANTHROPIC_MODEL").unwrap_or(defaults.anthropic_model),
            },
            twilio_account_sid: env_opt("TWILIO_ACCOUNT_SID"),
            twilio_auth_token: env_opt("TWILIO_AUTH_TOKEN"),
            twilio_phone_number: env_opt("TWILIO_PHONE_NUMBER")
                .unwrap_or_else(|| "whatsapp:+14155238886".to_string()),
            dashboard_url: env_opt("DASHBOARD_URL"),
            config_path: env_opt("VIDCHECK_CONFIG").map(PathBuf::from),
        };

        config.log_keys();
        Ok(config)
    }

    pub fn twilio_configured(&self) -> bool {
        self.twilio_account_sid.is_some() && self.twilio_auth_token.is_some()
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  DATABASE_URL: {}", if self.database_url.is_some() { "<set>" } else { "<not set>" });
        tracing::info!("  YOUTUBE_API_KEY: {}", preview_opt(&self.youtube_api_key));
        tracing::info!("  APIFY_API_KEY: {}", preview_opt(&self.apify_api_key));
        tracing::info!("  GOOGLE_API_KEY: {}", preview_opt(&self.google_factcheck_api_key));
        tracing::info!("  SERPER_API_KEY: {}", preview_opt(&self.serper_api_key));
        tracing::info!(
            "  LLM_PROVIDER: {}",
            self.llm_provider.map(|p| p.as_str()).unwrap_or("auto")
        );
        tracing::info!("  OPENROUTER_API_KEY: {}", preview_opt(&self.llm.openrouter_api_key));
        tracing::info!("  OPENAI_API_KEY: {}", preview_opt(&self.llm.openai_api_key));
        tracing::info!("  LLM_API_KEY: {}", preview_opt(&self.llm.azure_api_key));
        tracing::info!("  ANTHROPIC_API_KEY: {}", preview_opt(&self.llm.anthropic_api_key));
        tracing::info!("  TWILIO_ACCOUNT_SID: {}", preview_opt(&self.twilio_account_sid));
    }
}

/// Unset and blank are the same thing.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_provider(raw: Option<&str>) -> Result<Option<LlmProvider>> {
    match raw {
        None => Ok(None),
        Some(v) if v.eq_ignore_ascii_case("auto") => Ok(None),
        Some(v) => v
            .parse()
            .map(Some)
            .with_context(|| format!("LLM_PROVIDER must be auto, openrouter, openai, azure or anthropic (got {v})")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_and_missing_mean_no_preference() {
        assert_eq!(parse_provider(None).unwrap(), None);
        assert_eq!(parse_provider(Some("AUTO")).unwrap(), None);
    }

    #[test]
    fn named_provider_parses() {
        assert_eq!(
            parse_provider(Some("gateway")).unwrap(),
            Some(LlmProvider::Azure)
        );
        assert!(parse_provider(Some("bard")).is_err());
    }
}
