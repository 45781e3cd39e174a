use async_trait::async_trait;

use super::client::{Auth, ChatClient};
use super::types::ChatRequest;
use crate::error::Result;
use crate::traits::{Prompt, TextGenerator};

/// Azure OpenAI (or an API-management gateway in front of it). The model name
/// doubles as the deployment name.
#[derive(Clone)]
pub struct AzureOpenAi {
    api_key: String,
    endpoint: String,
    deployment: String,
    api_version: String,
}

impl AzureOpenAi {
    pub fn new(
        api_key: impl Into<String>,
        endpoint: impl Into<String>,
        deployment: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: endpoint.into(),
            deployment: deployment.into(),
            api_version: api_version.into(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[async_trait]
impl TextGenerator for AzureOpenAi {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        let request = ChatRequest::from_prompt(&self.deployment, prompt).without_model();
        ChatClient::new(Auth::ApiKey(self.api_key.clone()), "azure")
            .chat(&self.url(), &request)
            .await
    }

    fn model(&self) -> &str {
        &self.deployment
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_deployment_url() {
        let ai = AzureOpenAi::new("key", "https://gw.example.com/", "gpt-4o-mini", "2024-08-01-preview");
        assert_eq!(
            ai.url(),
            "https://gw.example.com/openai/deployments/gpt-4o-mini/chat/completions?api-version=2024-08-01-preview"
        );
        assert_eq!(ai.model(), "gpt-4o-mini");
    }
}
