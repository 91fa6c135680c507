mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::{routing::post, Router};

pub fn router() -> Router<AppState> {
    Router::new().route("/send-message", post(handlers::send_message))
}
