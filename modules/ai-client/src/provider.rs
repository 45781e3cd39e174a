use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::error::{AiError, Result};
use crate::traits::TextGenerator;
use crate::{AzureOpenAi, Claude, OpenAi, OpenRouter};

/// Backend choices for text generation. Picked once at process start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmProvider {
    OpenRouter,
    OpenAi,
    Azure,
    Anthropic,
}

impl LlmProvider {
    /// Preference order used when the setting is `auto`.
    const AUTO_ORDER: [LlmProvider; 4] = [
        LlmProvider::OpenRouter,
        LlmProvider::OpenAi,
        LlmProvider::Azure,
        LlmProvider::Anthropic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LlmProvider::OpenRouter => "openrouter",
            LlmProvider::OpenAi => "openai",
            LlmProvider::Azure => "azure",
            LlmProvider::Anthropic => "anthropic",
        }
    }

    /// Resolve the configured choice against the credentials actually present.
    /// `requested = None` means auto. Returns `None` when nothing usable is configured.
    pub fn select(requested: Option<LlmProvider>, creds: &Credentials) -> Option<LlmProvider> {
        match requested {
            Some(p) if creds.has(p) => Some(p),
            Some(_) => None,
            None => Self::AUTO_ORDER.into_iter().find(|p| creds.has(*p)),
        }
    }

    pub fn build(self, creds: &Credentials) -> Result<Arc<dyn TextGenerator>> {
        let missing = || AiError::Config(format!("no credentials for {self}"));
        let generator: Arc<dyn TextGenerator> = match self {
            LlmProvider::OpenRouter => {
                let key = creds.openrouter_api_key.as_deref().ok_or_else(missing)?;
                Arc::new(
                    OpenRouter::new(key, &creds.openrouter_model).with_app_name("vidcheck"),
                )
            }
            LlmProvider::OpenAi => {
                let key = creds.openai_api_key.as_deref().ok_or_else(missing)?;
                Arc::new(OpenAi::new(key, &creds.openai_model))
            }
            LlmProvider::Azure => {
                let key = creds.azure_api_key.as_deref().ok_or_else(missing)?;
                let endpoint = creds.azure_endpoint.as_deref().ok_or_else(missing)?;
                Arc::new(AzureOpenAi::new(
                    key,
                    endpoint,
                    &creds.azure_model,
                    &creds.azure_api_version,
                ))
            }
            LlmProvider::Anthropic => {
                let key = creds.anthropic_api_key.as_deref().ok_or_else(missing)?;
                Arc::new(Claude::new(key, &creds.anthropic_model))
            }
        };
        Ok(generator)
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for LlmProvider {
    type Err = AiError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openrouter" => Ok(LlmProvider::OpenRouter),
            "openai" => Ok(LlmProvider::OpenAi),
            "azure" | "gateway" => Ok(LlmProvider::Azure),
            "anthropic" | "claude" => Ok(LlmProvider::Anthropic),
            other => Err(AiError::Config(format!("unknown LLM provider: {other}"))),
        }
    }
}

/// Credentials and model names for every backend. Empty strings count as absent.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub openrouter_api_key: Option<String>,
    pub openrouter_model: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub azure_api_key: Option<String>,
    pub azure_endpoint: Option<String>,
    pub azure_model: String,
    pub azure_api_version: String,
    pub anthropic_api_key: Option<String>,
    pub anthropic_model: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            openrouter_api_key: None,
            openrouter_model: "openai/gpt-4o-mini".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o-mini".to_string(),
            azure_api_key: None,
            azure_endpoint: None,
            azure_model: "gpt-4o-mini".to_string(),
            azure_api_version: "2024-08-01-preview".to_string(),
            anthropic_api_key: None,
            anthropic_model: "claude-haiku-4-5-20251001".to_string(),
        }
    }
}

impl Credentials {
    fn has(&self, provider: LlmProvider) -> bool {
        fn set(v: &Option<String>) -> bool {
            v.as_deref().is_some_and(|s| !s.trim().is_empty())
        }
        match provider {
            LlmProvider::OpenRouter => set(&self.openrouter_api_key),
            LlmProvider::OpenAi => set(&self.openai_api_key),
            LlmProvider::Azure => set(&self.azure_api_key) && set(&self.azure_endpoint),
            LlmProvider::Anthropic => set(&self.anthropic_api_key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auto_prefers_openrouter_when_key_present() {
        let creds = Credentials {
            openrouter_api_key: Some("or-key".into()),
            openai_api_key: Some("sk-key".into()),
            ..Default::default()
        };
        assert_eq!(LlmProvider::select(None, &creds), Some(LlmProvider::OpenRouter));
    }

    #[test]
    fn auto_falls_back_to_openai() {
        let creds = Credentials {
            openai_api_key: Some("sk-key".into()),
            ..Default::default()
        };
        assert_eq!(LlmProvider::select(None, &creds), Some(LlmProvider::OpenAi));
    }

    #[test]
    fn azure_needs_endpoint_too() {
        let creds = Credentials {
            azure_api_key: Some("az-key".into()),
            ..Default::default()
        };
        assert_eq!(LlmProvider::select(None, &creds), None);
        assert_eq!(LlmProvider::select(Some(LlmProvider::Azure), &creds), None);
    }

    #[test]
    fn explicit_choice_without_credentials_selects_nothing() {
        let creds = Credentials {
            openrouter_api_key: Some("or-key".into()),
            ..Default::default()
        };
        assert_eq!(LlmProvider::select(Some(LlmProvider::Anthropic), &creds), None);
    }

    #[test]
    fn blank_keys_are_absent() {
        let creds = Credentials {
            openrouter_api_key: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(LlmProvider::select(None, &creds), None);
    }

    #[test]
    fn parses_provider_names() {
        assert_eq!("OpenRouter".parse::<LlmProvider>().unwrap(), LlmProvider::OpenRouter);
        assert_eq!("claude".parse::<LlmProvider>().unwrap(), LlmProvider::Anthropic);
        assert!("bard".parse::<LlmProvider>().is_err());
    }

    #[test]
    fn build_reports_model() {
        let creds = Credentials {
            openai_api_key: Some("sk-key".into()),
            ..Default::default()
        };
        let generator = LlmProvider::OpenAi.build(&creds).unwrap();
        assert_eq!(generator.model(), "gpt-4o-mini");
    }
}
