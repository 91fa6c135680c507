mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::{
    routing::{delete, get},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/planning",
            get(handlers::list_planning).post(handlers::create_entry),
        )
        .route("/planning/:id", delete(handlers::delete_entry))
}
