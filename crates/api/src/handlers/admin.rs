//! Administrative utilities.

use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionTestRequest {
    pub connection_string: String,
}

/// POST /api/v1/admin/connection-test
///
/// Try a PostgreSQL connection string without touching the active store.
/// A failed connection is still a 200; the outcome is in the body.
pub async fn connection_test(
    Json(input): Json<ConnectionTestRequest>,
) -> AppResult<impl IntoResponse> {
    if input.connection_string.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Connection string must not be empty".into(),
        ));
    }

    let result = linkhub_db::test_connection(&input.connection_string).await;
    tracing::info!(success = result.success, "Connection test finished");

    Ok(Json(DataResponse { data: result }))
}
