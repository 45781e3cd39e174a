use serde::{Deserialize, Serialize};

use crate::traits::{MessageRole, Prompt};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct WireMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub(crate) enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatRequest {
    /// The Messages API takes the system preamble as a top-level field.
    pub fn from_prompt(model: &str, prompt: &Prompt) -> Self {
        let messages = prompt
            .messages()
            .into_iter()
            .filter_map(|m| match m.role {
                MessageRole::System => None,
                MessageRole::User => Some(WireMessage {
                    role: Role::User,
                    content: m.content,
                }),
                MessageRole::Assistant => Some(WireMessage {
                    role: Role::Assistant,
                    content: m.content,
                }),
            })
            .collect();

        Self {
            model: model.to_string(),
            max_tokens: prompt.max_tokens,
            messages,
            system: prompt.system.clone(),
            temperature: Some(prompt.temperature),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

/// Body of a non-2xx Messages API response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorDetail {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub message: String,
}

impl ErrorEnvelope {
    /// `"{type}: {message}"` when the body parses, the raw body otherwise.
    pub fn describe(body: &str) -> String {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(env) => format!("{}: {}", env.error.kind, env.error.message),
            Err(_) => body.to_string(),
        }
    }
}

impl ChatResponse {
    pub fn text(&self) -> Option<String> {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } if !text.trim().is_empty() => Some(text.clone()),
                _ => None,
            })
            .next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_moves_to_top_level() {
        let req = ChatRequest::from_prompt("claude-haiku", &Prompt::new("q").system("s"));
        assert_eq!(req.system.as_deref(), Some("s"));
        assert_eq!(req.messages.len(), 1);
        assert_eq!(req.messages[0].role, Role::User);
    }

    #[test]
    fn text_skips_non_text_blocks() {
        let resp: ChatResponse = serde_json::from_str(
            r#"{"content":[{"type":"thinking","thinking":"..."},{"type":"text","text":"Claim."}]}"#,
        )
        .unwrap();
        assert_eq!(resp.text().as_deref(), Some("Claim."));
    }

    #[test]
    fn error_body_is_summarized() {
        let body = r#"{"type":"error","error":{"type":"overloaded_error","message":"Overloaded"}}"#;
        assert_eq!(ErrorEnvelope::describe(body), "overloaded_error: Overloaded");
        assert_eq!(ErrorEnvelope::describe("bad gateway"), "bad gateway");
    }
}
