mod dto;
pub mod handlers;
pub mod services;

use crate::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/shopping-lists", get(handlers::list_shopping_lists))
        .route("/shopping-list", post(handlers::create_shopping_list))
        .route(
            "/shopping-list/:id",
            get(handlers::get_shopping_list)
                .patch(handlers::update_shopping_list)
                .delete(handlers::delete_shopping_list),
        )
}
