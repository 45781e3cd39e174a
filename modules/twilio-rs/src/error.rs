use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("Request to Twilio failed: {0}")]
    Network(String),

    #[error("Twilio returned an error (status {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },

    #[error("Failed to parse Twilio response: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for TwilioError {
    fn from(err: reqwest::Error) -> Self {
        TwilioError::Network(err.to_string())
    }
}
