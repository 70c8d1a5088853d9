use axum::routing::get;
use axum::Router;

use crate::handlers::directory;
use crate::state::AppState;

/// Public directory mounted at `/directory`.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(directory::get_directory))
}
