use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use tracing::{error, info, instrument};

use super::dto::{
    CreateEntryRequest, CreatedEntryResponse, DeletedResponse, PlanningEntry, PlanningQuery,
    PlanningResponse,
};
use super::services::{entry_fields, week_filter};
use crate::{airtable::PLANNING_TABLE, error::ApiError, state::AppState};

/// GET /api/planning?week&year
#[instrument(skip(state))]
pub async fn list_planning(
    State(state): State<AppState>,
    query: Result<Query<PlanningQuery>, QueryRejection>,
) -> Result<Json<PlanningResponse>, ApiError> {
    let Query(q) = query.map_err(|e| {
        error!(error = %e, "unreadable planning query");
        ApiError::from_query(e, "Failed to fetch planning from Airtable")
    })?;
    let filter = week_filter(q.week.as_deref(), q.year.as_deref());
    info!(week = ?q.week, year = ?q.year, filtered = filter.is_some(), "fetching planning");

    let records = state
        .store
        .list(PLANNING_TABLE, filter.as_deref())
        .await
        .map_err(|e| {
            error!(error = %e, details = %e.details(), "fetching planning failed");
            ApiError::from_store(&e, "Failed to fetch planning from Airtable")
        })?;

    Ok(Json(PlanningResponse {
        success: true,
        planning: records.into_iter().map(PlanningEntry::from).collect(),
    }))
}

/// POST /api/planning { day, date, meal, recipeId, week, year }
#[instrument(skip(state, body))]
pub async fn create_entry(
    State(state): State<AppState>,
    body: Option<Json<CreateEntryRequest>>,
) -> Result<Json<CreatedEntryResponse>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    info!(
        recipe_id = ?body.recipe_id,
        day = ?body.day,
        meal = ?body.meal,
        week = ?body.week,
        year = ?body.year,
        "adding recipe to planning"
    );

    let record = state
        .store
        .create(PLANNING_TABLE, entry_fields(body))
        .await
        .map_err(|e| {
            error!(error = %e, details = %e.details(), "adding to planning failed");
            ApiError::from_store(&e, "Failed to add to planning")
        })?;

    Ok(Json(CreatedEntryResponse { success: true, record }))
}

/// DELETE /api/planning/:id
#[instrument(skip(state))]
pub async fn delete_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeletedResponse>, ApiError> {
    info!(%id, "deleting planning record");

    state.store.delete(PLANNING_TABLE, &id).await.map_err(|e| {
        error!(error = %e, details = %e.details(), %id, "deleting from planning failed");
        ApiError::from_store(&e, "Failed to delete from planning")
    })?;

    Ok(Json(DeletedResponse {
        success: true,
        message: "Record deleted successfully",
    }))
}
