use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request body for `POST /api/send-message`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    #[serde(default)]
    pub message: Option<Value>,
    #[serde(default, rename = "userId")]
    pub user_id: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct SendMessageResponse {
    pub success: bool,
    pub response: String,
    pub timestamp: String,
}
