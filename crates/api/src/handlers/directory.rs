use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use linkhub_db::Directory;
use serde::Deserialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DirectoryParams {
    /// Search term; blank or absent shows everything.
    #[serde(default)]
    pub q: Option<String>,
}

/// GET /api/v1/directory?q=term
///
/// Every category with its links, narrowed by the search term.
pub async fn get_directory(
    State(state): State<AppState>,
    Query(params): Query<DirectoryParams>,
) -> AppResult<impl IntoResponse> {
    let directory = Directory::load(state.store.as_ref()).await?;
    let directory = match params.q.as_deref() {
        Some(term) => directory.filter(term),
        None => directory,
    };
    Ok(Json(DataResponse { data: directory }))
}
