//! Storage layer for LinkHub: the entity model, the [`store::LinkStore`]
//! contract with its local, PostgreSQL and MongoDB backends, backend
//! selection, and the public directory read model.

pub mod config;
pub mod directory;
pub mod models;
pub mod selector;
pub mod store;

use serde::Serialize;
use sqlx::postgres::PgPoolOptions;

pub use config::{DataSourceConfig, DataSourceType, PostgresConfig};
pub use directory::{Directory, DirectorySection};
pub use selector::{select_store, ExecutionContext};
pub use store::{LinkStore, StoreError, StoreResult};

pub type DbPool = sqlx::PgPool;

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the `categories` / `links` schema.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Apply migrations using the relational credentials in `config`.
///
/// Uses its own single-connection pool, closed before returning.
pub async fn prepare_schema(config: &PostgresConfig) -> StoreResult<()> {
    let pool = PgPoolOptions::new()
        .max_connections(1)
        .acquire_timeout(config.pool.connect_timeout)
        .connect_with(config.connect_options()?)
        .await?;
    let result = run_migrations(&pool).await;
    pool.close().await;
    Ok(result?)
}

/// Outcome of [`test_connection`], shaped for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConnectionTestResult {
    pub success: bool,
    pub message: String,
}

/// Try a connection string on a throwaway single-connection pool.
///
/// Never fails: every problem is folded into the returned message. The pool
/// is closed before returning.
pub async fn test_connection(connection_string: &str) -> ConnectionTestResult {
    if connection_string.trim().is_empty() {
        return ConnectionTestResult {
            success: false,
            message: "Connection string must not be empty".into(),
        };
    }

    let pool = match PgPoolOptions::new()
        .max_connections(1)
        .connect(connection_string)
        .await
    {
        Ok(pool) => pool,
        Err(e) => {
            tracing::warn!(error = %e, "PostgreSQL connection test failed");
            return ConnectionTestResult {
                success: false,
                message: format!("Connection test failed: {e}"),
            };
        }
    };

    let result = match store::postgres::server_time(&pool).await {
        Ok(now) => {
            tracing::info!(server_time = %now, "PostgreSQL connection test succeeded");
            ConnectionTestResult {
                success: true,
                message: "Successfully connected to the PostgreSQL database".into(),
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "PostgreSQL connection test query failed");
            ConnectionTestResult {
                success: false,
                message: format!("Connection test failed: {e}"),
            }
        }
    };
    pool.close().await;
    result
}
