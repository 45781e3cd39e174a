use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use tracing::debug;

use super::types::*;
use crate::error::{AiError, Result};

pub(crate) const OPENAI_API_URL: &str = "https://api.openai.com/v1";

/// How a chat-completions endpoint expects the key.
#[derive(Debug, Clone)]
pub(crate) enum Auth {
    Bearer(String),
    /// Azure style `api-key` header. Gateways fronted by API management
    /// also want the subscription header, so both are sent.
    ApiKey(String),
}

/// Thin HTTP client for any OpenAI-compatible chat-completions endpoint.
pub(crate) struct ChatClient {
    http: reqwest::Client,
    auth: Auth,
    extra_headers: Vec<(HeaderName, HeaderValue)>,
    label: &'static str,
}

impl ChatClient {
    pub fn new(auth: Auth, label: &'static str) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth,
            extra_headers: Vec::new(),
            label,
        }
    }

    pub fn with_header(mut self, name: &'static str, value: &str) -> Self {
        if let Ok(val) = HeaderValue::from_str(value) {
            self.extra_headers
                .push((HeaderName::from_static(name), val));
        }
        self
    }

    fn headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        match &self.auth {
            Auth::Bearer(key) => {
                headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {key}"))?);
            }
            Auth::ApiKey(key) => {
                headers.insert("api-key", HeaderValue::from_str(key)?);
                headers.insert("ocp-apim-subscription-key", HeaderValue::from_str(key)?);
            }
        }
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        for (name, value) in &self.extra_headers {
            headers.insert(name.clone(), value.clone());
        }
        Ok(headers)
    }

    pub async fn chat(&self, url: &str, request: &ChatRequest) -> Result<String> {
        debug!(provider = self.label, model = ?request.model, "chat completion request");

        let response = self
            .http
            .post(url)
            .headers(self.headers()?)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatResponse = response.json().await?;
        body.text().ok_or(AiError::EmptyResponse(self.label))
    }
}
