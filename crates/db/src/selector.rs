//! Backend selection.
//!
//! The caller states where it runs ([`ExecutionContext`]) and what is
//! configured ([`DataSourceConfig`]); [`select_store`] returns the matching
//! [`LinkStore`]. A misconfigured backend is an error, never a silent
//! fallback to another one. There is no process-wide instance: each call
//! builds a new handle that the caller owns and closes.

use std::sync::Arc;

use crate::config::{DataSourceConfig, DataSourceType};
use crate::store::{
    DocumentStore, KeyValueStore, LinkStore, LocalStore, PostgresStore, StoreError, StoreResult,
};

/// Where the calling code runs.
#[derive(Clone)]
pub enum ExecutionContext {
    /// An interactive client with its own origin-scoped key-value store.
    Ui(Arc<dyn KeyValueStore>),
    /// A server process. Has credentials for remote backends but no
    /// key-value store.
    Server,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ui(_) => f.write_str("Ui"),
            Self::Server => f.write_str("Server"),
        }
    }
}

/// Build the store `config` asks for, as allowed in `context`.
///
/// - UI: only the local backend. Remote backends must be reached through
///   the server.
/// - Server: local serves read-only defaults; postgres and mongodb need
///   their credentials.
pub async fn select_store(
    context: &ExecutionContext,
    config: &DataSourceConfig,
) -> StoreResult<Arc<dyn LinkStore>> {
    match (context, config.source_type) {
        (ExecutionContext::Ui(kv), DataSourceType::Local) => {
            Ok(Arc::new(LocalStore::open(kv.clone())?))
        }
        (ExecutionContext::Ui(_), other) => {
            let message = format!(
                "Direct data access from a UI context is not allowed for the '{other}' data \
                 source. Go through the server instead."
            );
            tracing::error!("{message}");
            Err(StoreError::Configuration(message))
        }
        (ExecutionContext::Server, DataSourceType::Local) => {
            tracing::info!("Using local store on the server (default dataset, writes discarded)");
            Ok(Arc::new(LocalStore::server_fallback()))
        }
        (ExecutionContext::Server, DataSourceType::Postgres) => {
            let store = PostgresStore::connect(&config.postgres)
                .await
                .inspect_err(|e| tracing::error!(error = %e, "Failed to initialise PostgreSQL store"))?;
            tracing::info!("Using PostgreSQL store");
            Ok(Arc::new(store))
        }
        (ExecutionContext::Server, DataSourceType::Mongodb) => {
            let store = DocumentStore::connect(&config.mongo)
                .inspect_err(|e| tracing::error!(error = %e, "Failed to initialise MongoDB store"))?;
            tracing::info!("Using MongoDB store");
            Ok(Arc::new(store))
        }
    }
}

/// The local store for a UI context, whatever the configured backend.
///
/// Fails when called from a server context.
pub fn local_store_for_ui(context: &ExecutionContext) -> StoreResult<LocalStore> {
    match context {
        ExecutionContext::Ui(kv) => LocalStore::open(kv.clone()),
        ExecutionContext::Server => Err(StoreError::Configuration(
            "The UI-local store is only available in a UI context".into(),
        )),
    }
}
