//! Twilio WhatsApp webhook. Replies inline as TwiML, or, with `?async=1`
//! and Twilio credentials configured, acknowledges at once and sends the
//! result through the Messages API when the run finishes.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Json, Response},
    Form,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use twilio::{twiml, InboundMessage};
use vidcheck_core::{analyze, PipelineDeps};

use crate::reply::{self, Inbound};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct WebhookQuery {
    #[serde(rename = "async")]
    background: Option<String>,
}

impl WebhookQuery {
    fn wants_background(&self) -> bool {
        matches!(self.background.as_deref(), Some("1" | "true" | "yes"))
    }
}

pub async fn verify() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "message": "Webhook is active",
    }))
}

pub async fn receive(
    State(state): State<Arc<AppState>>,
    Query(query): Query<WebhookQuery>,
    Form(message): Form<InboundMessage>,
) -> Response {
    let inbound = reply::classify(&message.body);
    info!(
        message_sid = message.message_sid.as_deref().unwrap_or_default(),
        kind = inbound.kind(),
        "Webhook message received"
    );

    let body = match inbound {
        Inbound::Empty => return twiml_response(twiml::empty_response()),
        Inbound::Greeting => reply::welcome(state.dashboard_url.as_deref()),
        Inbound::NoLink => reply::NO_URL_MESSAGE.to_string(),
        Inbound::Unsupported => reply::UNSUPPORTED_MESSAGE.to_string(),
        Inbound::Analyze(url) => match (&state.twilio, query.wants_background()) {
            (Some(_), true) if !message.from.is_empty() => {
                spawn_follow_up(state.clone(), url, message.from);
                reply::PROCESSING_MESSAGE.to_string()
            }
            _ => run_analysis(state.deps.clone(), url).await,
        },
    };

    twiml_response(twiml::messaging_response(&body))
}

fn twiml_response(xml: String) -> Response {
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

/// Run the pipeline on its own task so a panic becomes the apology message
/// instead of a dropped webhook.
async fn run_analysis(deps: PipelineDeps, url: String) -> String {
    let handle = tokio::spawn(async move { analyze(&deps, &url).await });
    match handle.await {
        Ok(analysis) => reply::format_reply(&analysis.record),
        Err(e) => {
            error!(error = %e, "Analysis task failed");
            reply::ERROR_MESSAGE.to_string()
        }
    }
}

/// The sender address is used for the reply only; it never reaches the
/// pipeline, the store or the logs.
fn spawn_follow_up(state: Arc<AppState>, url: String, to: String) {
    tokio::spawn(async move {
        let body = run_analysis(state.deps.clone(), url).await;
        let Some(twilio) = state.twilio.as_ref() else {
            return;
        };
        match twilio.send_message(&to, &body).await {
            Ok(sent) => info!(sid = %sent.sid, status = %sent.status, "Follow-up sent"),
            Err(e) => warn!(error = %e, "Failed to send follow-up"),
        }
    });
}
