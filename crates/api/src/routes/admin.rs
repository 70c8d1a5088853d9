use axum::routing::post;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Admin routes mounted at `/admin`.
///
/// ```text
/// POST   /connection-test    -> connection_test
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/connection-test", post(admin::connection_test))
}
