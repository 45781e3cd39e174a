use async_trait::async_trait;

use crate::error::Result;
use crate::openai::client::{Auth, ChatClient};
use crate::openai::types::ChatRequest;
use crate::traits::{Prompt, TextGenerator};

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

// =============================================================================
// OpenRouter Generator
// =============================================================================

#[derive(Clone)]
pub struct OpenRouter {
    api_key: String,
    pub(crate) model: String,
    app_name: Option<String>,
    site_url: Option<String>,
}

impl OpenRouter {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            app_name: None,
            site_url: None,
        }
    }

    pub fn with_app_name(mut self, name: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self
    }

    pub fn with_site_url(mut self, url: impl Into<String>) -> Self {
        self.site_url = Some(url.into());
        self
    }

    fn client(&self) -> ChatClient {
        let mut client = ChatClient::new(Auth::Bearer(self.api_key.clone()), "openrouter");
        if let Some(ref url) = self.site_url {
            client = client.with_header("http-referer", url);
        }
        if let Some(ref name) = self.app_name {
            client = client.with_header("x-title", name);
        }
        client
    }
}

#[async_trait]
impl TextGenerator for OpenRouter {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest::from_prompt(&self.model, prompt);
        self.client()
            .chat(&format!("{OPENROUTER_API_URL}/chat/completions"), &request)
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
    fn test_openrouter_new() {
        let or = OpenRouter::new("or-test", "openai/gpt-4o-mini");
        assert_eq!(or.model, "openai/gpt-4o-mini");
        assert_eq!(or.api_key, "or-test");
    }

    #[test]
    fn test_openrouter_with_app_name() {
        let or = OpenRouter::new("or-test", "openai/gpt-4o-mini")
            .with_app_name("vidcheck")
            .with_site_url("https://vidcheck.example");
        assert_eq!(or.app_name, Some("vidcheck".to_string()));
        assert_eq!(or.site_url, Some("https://vidcheck.example".to_string()));
    }
}
