use serde::Deserialize;

/// Form fields Twilio posts to a messaging webhook. Only the fields the
/// webhook reads are kept; the rest of the form is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "Body", default)]
    pub body: String,
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "To", default)]
    pub to: String,
    #[serde(rename = "MessageSid")]
    pub message_sid: Option<String>,
}

/// Subset of the Messages API resource returned after a send.
#[derive(Debug, Clone, Deserialize)]
pub struct MessageResponse {
    pub sid: String,
    pub status: String,
    pub to: Option<String>,
}

/// Error body Twilio returns on 4xx responses.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    pub code: Option<i64>,
    pub message: Option<String>,
}
