use axum::{extract::State, Json};
use tracing::{error, info, instrument};

use super::dto::{Recipe, RecipesResponse};
use crate::{
    airtable::RECIPES_TABLE,
    error::ApiError,
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
) -> Result<Json<RecipesResponse>, ApiError> {
    let records = state.store.list(RECIPES_TABLE, None).await.map_err(|e| {
        error!(error = %e, details = %e.details(), "fetching recipes failed");
        ApiError::from_store(&e, "Failed to fetch recipes from Airtable")
    })?;
    info!(count = records.len(), "recipes retrieved");

    Ok(Json(RecipesResponse {
        success: true,
        recipes: records.into_iter().map(Recipe::from).collect(),
    }))
}
