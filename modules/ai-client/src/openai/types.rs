use serde::{Deserialize, Serialize};

use crate::traits::{MessageRole, Prompt};

// =============================================================================
// Chat Completion (shared by OpenAI, Azure and OpenRouter)
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    System,
    User,
    Assistant,
}

impl From<MessageRole> for Role {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::System => Role::System,
            MessageRole::User => Role::User,
            MessageRole::Assistant => Role::Assistant,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
}

impl ChatRequest {
    /// Build a request from a prompt. Reasoning models reject `temperature`
    /// and take `max_completion_tokens` instead of `max_tokens`.
    pub fn from_prompt(model: &str, prompt: &Prompt) -> Self {
        let reasoning = uses_max_completion_tokens(model);
        Self {
            model: Some(model.to_string()),
            messages: prompt
                .messages()
                .into_iter()
                .map(|m| WireMessage {
                    role: m.role.into(),
                    content: Some(m.content),
                })
                .collect(),
            temperature: (!reasoning).then_some(prompt.temperature),
            max_tokens: (!reasoning).then_some(prompt.max_tokens),
            max_completion_tokens: reasoning.then_some(prompt.max_tokens),
        }
    }

    /// Azure routes by deployment in the URL, so the body carries no model.
    pub fn without_model(mut self) -> Self {
        self.model = None;
        self
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Choice {
    pub message: WireMessage,
}

impl ChatResponse {
    pub fn text(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|s| !s.trim().is_empty())
    }
}

/// Check if a model requires max_completion_tokens instead of max_tokens.
pub(crate) fn uses_max_completion_tokens(model: &str) -> bool {
    model.starts_with("o1")
        || model.starts_with("o3")
        || model.starts_with("o4")
        || model.starts_with("gpt-5")
        || model.contains("/o1")
        || model.contains("/o3")
        || model.contains("/o4")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chat_model_gets_temperature_and_max_tokens() {
        let prompt = Prompt::new("hi").system("sys").max_tokens(300);
        let req = ChatRequest::from_prompt("gpt-4o-mini", &prompt);
        assert_eq!(req.messages.len(), 2);
        assert_eq!(req.messages[0].role, Role::System);
        assert_eq!(req.max_tokens, Some(300));
        assert_eq!(req.temperature, Some(0.0));
        assert!(req.max_completion_tokens.is_none());
    }

    #[test]
    fn reasoning_model_uses_completion_tokens() {
        let prompt = Prompt::new("hi").max_tokens(300);
        let req = ChatRequest::from_prompt("o4-mini", &prompt);
        assert_eq!(req.max_completion_tokens, Some(300));
        assert!(req.temperature.is_none());
        assert!(req.max_tokens.is_none());
    }

    #[test]
    fn empty_choice_yields_no_text() {
        let resp: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant","content":"  "}}]}"#)
                .unwrap();
        assert!(resp.text().is_none());
    }

    #[test]
    fn azure_body_omits_model() {
        let req = ChatRequest::from_prompt("gpt-4o", &Prompt::new("hi")).without_model();
        let json = serde_json::to_value(&req).unwrap();
        assert!(json.get("model").is_none());
    }
}
