use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use linkhub_core::error::CoreError;
use linkhub_core::validation::into_core_error;
use linkhub_db::{LinkStore, StoreError};
use serde_json::json;
use validator::ValidationErrors;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and [`StoreError`] for backend
/// failures. Implements [`IntoResponse`] to produce consistent JSON error
/// responses. Backend failures never leak details to the client.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `linkhub_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A failure inside the selected store.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// A write sent to a store that would silently discard it.
    #[error("The {0} data source is read-only on this server")]
    ReadOnly(&'static str),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Core(into_core_error(&errors))
    }
}

impl AppError {
    /// Refuse a write that `store` would not keep.
    pub fn ensure_writable(store: &dyn LinkStore) -> AppResult<()> {
        if store.persists_writes() {
            Ok(())
        } else {
            Err(AppError::ReadOnly(store.kind().as_str()))
        }
    }

    /// Shorthand for a missing entity.
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        AppError::Core(CoreError::NotFound {
            entity,
            id: id.into(),
        })
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
            },

            // --- Store errors ---
            AppError::Store(err) => {
                tracing::error!(error = %err, "Store error");
                internal()
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::ReadOnly(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "READ_ONLY_STORE",
                self.to_string(),
            ),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
