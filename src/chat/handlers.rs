use axum::{extract::State, Json};
use tracing::{error, info, instrument, warn};

use super::dto::{SendMessageRequest, SendMessageResponse};
use super::services::{resolve_reply, webhook_error, DEFAULT_USER_ID};
use crate::{
    airtable::{as_text, is_set},
    error::ApiError,
    state::AppState,
    timestamp::now_iso,
    webhook::OutboundMessage,
};

/// POST /api/send-message { message, userId? }
#[instrument(skip(state, body))]
pub async fn send_message(
    State(state): State<AppState>,
    body: Option<Json<SendMessageRequest>>,
) -> Result<Json<SendMessageResponse>, ApiError> {
    let Some(Json(body)) = body else {
        warn!("unreadable send-message body");
        return Err(ApiError::bad_request("Message is required"));
    };
    let Some(message) = body.message.as_ref().filter(|v| is_set(v)).map(as_text) else {
        warn!("send-message without message");
        return Err(ApiError::bad_request("Message is required"));
    };
    let user_id = body
        .user_id
        .as_ref()
        .filter(|v| is_set(v))
        .map(as_text)
        .unwrap_or_else(|| DEFAULT_USER_ID.to_string());

    info!(%user_id, %message, "sending message to n8n");
    let outbound = OutboundMessage {
        message,
        user_id,
        timestamp: now_iso(),
    };

    let payload = state.webhook.send(&outbound).await.map_err(|e| {
        error!(error = %e, details = %e.details(), "sending message to n8n failed");
        webhook_error(&e)
    })?;
    info!(%payload, "n8n response received");

    Ok(Json(SendMessageResponse {
        success: true,
        response: resolve_reply(&payload),
        timestamp: now_iso(),
    }))
}
