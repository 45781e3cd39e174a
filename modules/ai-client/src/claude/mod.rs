pub(crate) mod types;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{AiError, Result};
use crate::traits::{Prompt, TextGenerator};

use types::{ChatRequest, ChatResponse, ErrorEnvelope};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1";
const ANTHROPIC_VERSION: &str = "2023-06-01";

// =============================================================================
// Claude Generator (Anthropic Messages API)
// =============================================================================

#[derive(Clone)]
pub struct Claude {
    http: reqwest::Client,
    api_key: String,
    pub(crate) model: String,
    base_url: String,
}

impl Claude {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, "anthropic messages request");

        let response = self
            .http
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message: ErrorEnvelope::describe(&body),
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TextGenerator for Claude {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest::from_prompt(&self.model, prompt);
        self.send(&request)
            .await?
            .text()
            .ok_or(AiError::EmptyResponse("anthropic"))
    }

    fn model(&self) -> &str {
        &self.model
    }
}
