pub mod error;
pub mod models;
pub mod twiml;

use reqwest::Client;

pub use error::TwilioError;
pub use models::{InboundMessage, MessageResponse};

use models::ApiErrorBody;

const API_BASE_URL: &str = "https://api.twilio.com/2010-04-01";

/// WhatsApp senders and recipients carry a `whatsapp:` channel prefix.
pub fn is_whatsapp(address: &str) -> bool {
    address.starts_with("whatsapp:")
}

#[derive(Debug, Clone)]
pub struct TwilioOptions {
    pub account_sid: String,
    pub auth_token: String,
    /// Sender address, e.g. `whatsapp:+14155238886`.
    pub from_number: String,
}

#[derive(Debug, Clone)]
pub struct TwilioService {
    options: TwilioOptions,
    client: Client,
    base_url: String,
}

impl TwilioService {
    pub fn new(options: TwilioOptions) -> Self {
        Self {
            options,
            client: Client::new(),
            base_url: API_BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn from_number(&self) -> &str {
        &self.options.from_number
    }

    /// Send a message through the Messages API. The recipient keeps the same
    /// channel prefix as the configured sender.
    pub async fn send_message(&self, to: &str, body: &str) -> Result<MessageResponse, TwilioError> {
        let url = format!(
            "{}/Accounts/{}/Messages.json",
            self.base_url, self.options.account_sid
        );

        let to = if is_whatsapp(&self.options.from_number) && !is_whatsapp(to) {
            format!("whatsapp:{to}")
        } else {
            to.to_string()
        };

        let form_body = [
            ("To", to.as_str()),
            ("From", self.options.from_number.as_str()),
            ("Body", body),
        ];

        let response = self
            .client
            .post(url)
            .basic_auth(&self.options.account_sid, Some(&self.options.auth_token))
            .form(&form_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let parsed = serde_json::from_str::<ApiErrorBody>(&error_body).ok();
            let code = parsed.as_ref().and_then(|e| e.code);
            let message = parsed.and_then(|e| e.message).unwrap_or(error_body);
            tracing::warn!(status = status.as_u16(), ?code, "Twilio send failed");
            return Err(TwilioError::Api {
                status: status.as_u16(),
                code,
                message,
            });
        }

        response
            .json::<MessageResponse>()
            .await
            .map_err(|e| TwilioError::Parse(e.to_string()))
    }
}
