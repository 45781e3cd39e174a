mod azure;
pub(crate) mod client;
pub(crate) mod types;

pub use azure::AzureOpenAi;

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{Prompt, TextGenerator};

use client::{Auth, ChatClient, OPENAI_API_URL};
use types::ChatRequest;

// =============================================================================
// OpenAi Generator
// =============================================================================

#[derive(Clone)]
pub struct OpenAi {
    api_key: String,
    pub(crate) model: String,
    base_url: Option<String>,
}

impl OpenAi {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    fn url(&self) -> String {
        let base = self.base_url.as_deref().unwrap_or(OPENAI_API_URL);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for OpenAi {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest::from_prompt(&self.model, prompt);
        ChatClient::new(Auth::Bearer(self.api_key.clone()), "openai")
            .chat(&self.url(), &request)
            .await
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_new() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini");
        assert_eq!(ai.model, "gpt-4o-mini");
        assert_eq!(ai.url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_openai_with_base_url() {
        let ai = OpenAi::new("sk-test", "gpt-4o-mini").with_base_url("http://localhost:8080/v1/");
        assert_eq!(ai.url(), "http://localhost:8080/v1/chat/completions");
    }
}
