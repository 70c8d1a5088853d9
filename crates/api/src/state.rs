use std::sync::Arc;

use linkhub_db::LinkStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheap to clone: everything sits behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// The selected backend.
    pub store: Arc<dyn LinkStore>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}
