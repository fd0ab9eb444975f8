//! Inbound WhatsApp Cloud API webhook.
//!
//! Two endpoints on the same path: GET handles Meta's one-time verification
//! handshake; POST receives message events. The delivery contract requires
//! acknowledging POSTs with a 200 even when the internal insert fails --
//! otherwise the platform keeps retrying the same message.

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use admissions_db::models::enquiry::CreateEnquiry;
use admissions_db::repositories::EnquiryRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters of the verification handshake.
///
/// Meta sends them dotted (`hub.mode`, `hub.verify_token`, `hub.challenge`).
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// GET /api/v1/webhooks/whatsapp
///
/// Echo the challenge back verbatim when the mode and token match.
pub async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> AppResult<String> {
    let mode_ok = params.mode.as_deref() == Some("subscribe");
    let token_ok = params.verify_token.as_deref() == Some(&state.config.whatsapp_verify_token);

    match (mode_ok && token_ok, params.challenge) {
        (true, Some(challenge)) => Ok(challenge),
        _ => Err(AppError::Forbidden("webhook verification failed".into())),
    }
}

/// POST /api/v1/webhooks/whatsapp
///
/// Map the first message of the payload into a new, unlinked enquiry.
/// Non-message events (delivery status callbacks etc.) are ignored.
pub async fn receive(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Json<Value> {
    let Some(message) = first_message(&payload) else {
        return Json(json!({ "status": "ignored" }));
    };

    let from = message.get("from").and_then(Value::as_str);
    let text = message
        .get("text")
        .and_then(|t| t.get("body"))
        .and_then(Value::as_str);

    let subject = match from {
        Some(from) => format!("WhatsApp from {from}"),
        None => "WhatsApp Enquiry".to_string(),
    };
    let message_content = match text {
        Some(text) => text.to_string(),
        None => format!(
            "WhatsApp message received at {}",
            chrono::Utc::now().to_rfc3339()
        ),
    };

    let input = CreateEnquiry {
        lead_id: None,
        subject,
        message: Some(message_content),
        status: None,
        priority: None,
        assigned_to: None,
        visit_date: None,
        visit_type: None,
    };

    // Acknowledge regardless of the insert outcome; failures only go to
    // the logs.
    match EnquiryRepo::create(&state.pool, &input).await {
        Ok(enquiry) => {
            tracing::info!(enquiry_id = enquiry.id, "WhatsApp enquiry created");
        }
        Err(err) => {
            tracing::error!(error = %err, "Failed to insert WhatsApp enquiry");
        }
    }

    Json(json!({ "status": "received" }))
}

/// Dig `entry[0].changes[0].value.messages[0]` out of a webhook payload.
fn first_message(payload: &Value) -> Option<&Value> {
    payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?
        .get("messages")?
        .get(0)
}
