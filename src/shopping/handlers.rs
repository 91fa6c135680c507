use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info, instrument};

use super::dto::{
    CreateShoppingListRequest, DeletedResponse, ShoppingList, ShoppingListQuery,
    ShoppingListResponse, ShoppingListsResponse, UpdateShoppingListRequest,
};
use super::services::{new_list_fields, patch_fields, status_filter};
use crate::{airtable::SHOPPING_TABLE, error::ApiError, state::AppState, timestamp::now_iso};

/// GET /api/shopping-lists?status
#[instrument(skip(state))]
pub async fn list_shopping_lists(
    State(state): State<AppState>,
    query: Result<Query<ShoppingListQuery>, QueryRejection>,
) -> Result<Json<ShoppingListsResponse>, ApiError> {
    let Query(q) = query.map_err(|e| {
        error!(error = %e, "unreadable shopping list query");
        ApiError::from_query(e, "Failed to fetch shopping lists from Airtable")
    })?;
    let filter = status_filter(q.status.as_deref());
    let records = state
        .store
        .list(SHOPPING_TABLE, filter.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, details = %e.details(), "fetching shopping lists failed");
            ApiError::from_store(&e, "Failed to fetch shopping lists from Airtable")
        })?;
    info!(count = records.len(), "shopping lists retrieved");

    Ok(Json(ShoppingListsResponse {
        success: true,
        shopping_lists: records.into_iter().map(ShoppingList::from).collect(),
    }))
}

/// GET /api/shopping-list/:id. Not-found is reported like any other failure.
#[instrument(skip(state))]
pub async fn get_shopping_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ShoppingListResponse<ShoppingList>>, ApiError> {
    let record = state.store.get(SHOPPING_TABLE, &id).await.map_err(|e| {
        error!(error = %e, details = %e.details(), %id, "fetching shopping list failed");
        ApiError::from_store(&e, "Failed to fetch shopping list from Airtable")
    })?;

    Ok(Json(ShoppingListResponse {
        success: true,
        shopping_list: ShoppingList::from(record),
    }))
}

/// POST /api/shopping-list. A body that is not a JSON object is treated as
/// empty.
#[instrument(skip(state, body))]
pub async fn create_shopping_list(
    State(state): State<AppState>,
    body: Option<Json<CreateShoppingListRequest>>,
) -> Result<Json<ShoppingListResponse<Value>>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    info!(nom = ?body.nom, semaine = ?body.semaine, annee = ?body.annee, "creating shopping list");

    let record = state
        .store
        .create(SHOPPING_TABLE, new_list_fields(body, now_iso()))
        .await
        .map_err(|e| {
            error!(error = %e, details = %e.details(), "creating shopping list failed");
            ApiError::from_store(&e, "Failed to create shopping list")
        })?;

    Ok(Json(ShoppingListResponse {
        success: true,
        shopping_list: record.flatten(),
    }))
}

/// PATCH /api/shopping-list/:id
#[instrument(skip(state, body))]
pub async fn update_shopping_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Option<Json<UpdateShoppingListRequest>>,
) -> Result<Json<ShoppingListResponse<Value>>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let fields = patch_fields(body).map_err(|reason| {
        error!(%id, reason, "refusing shopping list update");
        ApiError::internal("Failed to update shopping list", json!(reason))
    })?;
    info!(%id, keys = ?fields.keys().collect::<Vec<_>>(), "updating shopping list");

    let record = state
        .store
        .update(SHOPPING_TABLE, &id, fields)
        .await
        .map_err(|e| {
            error!(error = %e, details = %e.details(), %id, "updating shopping list failed");
            ApiError::from_store(&e, "Failed to update shopping list")
        })?;

    Ok(Json(ShoppingListResponse {
        success: true,
        shopping_list: record.flatten(),
    }))
}

/// DELETE /api/shopping-list/:id
#[instrument(skip(state))]
pub async fn delete_shopping_list(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    info!(%id, "deleting shopping list");

    state.store.delete(SHOPPING_TABLE, &id).await.map_err(|e| {
        error!(error = %e, details = %e.details(), %id, "deleting shopping list failed");
        ApiError::from_store(&e, "Failed to delete shopping list")
    })?;

    Ok(Json(DeletedResponse {
        success: true,
        message: "Shopping list deleted successfully",
    }))
}
