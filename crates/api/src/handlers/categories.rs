//! Handlers for category management.
//!
//! Deleting a category also deletes every link filed under it.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkhub_db::models::{Category, NewCategory};
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let categories = state.store.get_categories().await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/{id}
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let category = state
        .store
        .get_category(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<NewCategory>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    input.validate()?;

    let category = state.store.add_category(input).await?;
    tracing::info!(category_id = %category.id, name = %category.name, "Category created");

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
///
/// Replaces every field. The body has the same shape as for creation.
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewCategory>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    input.validate()?;

    let category: Category = input.into_category(id.clone());
    let updated = state
        .store
        .update_category(category)
        .await?
        .ok_or_else(|| AppError::not_found("Category", id))?;
    tracing::info!(category_id = %updated.id, "Category updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/categories/{id}
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    if !state.store.delete_category(&id).await? {
        return Err(AppError::not_found("Category", id));
    }
    tracing::info!(category_id = %id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/categories/{id}/links
pub async fn list_category_links(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    if state.store.get_category(&id).await?.is_none() {
        return Err(AppError::not_found("Category", id));
    }
    let links = state.store.get_links_by_category_id(&id).await?;
    Ok(Json(DataResponse { data: links }))
}
