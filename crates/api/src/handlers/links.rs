//! Handlers for link management.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use linkhub_db::models::NewLink;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/links
pub async fn list_links(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let links = state.store.get_links().await?;
    Ok(Json(DataResponse { data: links }))
}

/// GET /api/v1/links/{id}
pub async fn get_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    let link = state
        .store
        .get_link(&id)
        .await?
        .ok_or_else(|| AppError::not_found("Link", id))?;
    Ok(Json(DataResponse { data: link }))
}

/// POST /api/v1/links
///
/// The target category must exist.
pub async fn create_link(
    State(state): State<AppState>,
    Json(input): Json<NewLink>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    input.validate()?;
    ensure_category_exists(&state, &input.category_id).await?;

    let link = state.store.add_link(input).await?;
    tracing::info!(
        link_id = %link.id,
        category_id = %link.category_id,
        icon_source = %link.icon_source,
        "Link created",
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

/// PUT /api/v1/links/{id}
///
/// Replaces every field. The body has the same shape as for creation.
pub async fn update_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<NewLink>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    input.validate()?;
    ensure_category_exists(&state, &input.category_id).await?;

    let updated = state
        .store
        .update_link(input.into_link(id.clone()))
        .await?
        .ok_or_else(|| AppError::not_found("Link", id))?;
    tracing::info!(link_id = %updated.id, "Link updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/links/{id}
pub async fn delete_link(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<impl IntoResponse> {
    AppError::ensure_writable(state.store.as_ref())?;
    if !state.store.delete_link(&id).await? {
        return Err(AppError::not_found("Link", id));
    }
    tracing::info!(link_id = %id, "Link deleted");

    Ok(StatusCode::NO_CONTENT)
}

async fn ensure_category_exists(state: &AppState, category_id: &str) -> AppResult<()> {
    match state.store.get_category(category_id).await? {
        Some(_) => Ok(()),
        None => Err(AppError::BadRequest(format!(
            "Category {category_id} does not exist"
        ))),
    }
}
