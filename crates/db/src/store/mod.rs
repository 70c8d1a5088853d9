//! The data-access contract and its backends.
//!
//! [`LinkStore`] is the one interface every backend implements. Callers get
//! an `Arc<dyn LinkStore>` from [`crate::selector::select_store`] and never
//! see backend-specific types.
//!
//! Not-found is always `None` / `false`, never an error.

pub mod document;
pub mod local;
pub mod postgres;
pub mod retry;

use async_trait::async_trait;

use crate::config::DataSourceType;
use crate::models::{Category, LinkItem, NewCategory, NewLink};

pub use document::DocumentStore;
pub use local::{FileKeyValueStore, KeyValueStore, LocalStore, MemoryKeyValueStore};
pub use postgres::PostgresStore;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors surfaced by store construction and store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Missing credentials or a backend that is not allowed in this
    /// execution context. Never recovered by falling back to another backend.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A relational query failed (after retries, if the failure was transient).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the relational schema failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Persisted local data could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The local key-value store could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend exists but does not implement this operation.
    #[error("{backend} backend does not implement {operation}")]
    Unimplemented {
        backend: &'static str,
        operation: &'static str,
    },

    /// The backend has no usable connection.
    #[error("Not connected: {0}")]
    NotConnected(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Contract
// ---------------------------------------------------------------------------

/// Category and link operations every backend provides.
///
/// A successful mutation is visible to the next read on the same instance.
/// Failures propagate, except for the relational deletes, which log and
/// report `false` (see [`PostgresStore`]).
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// Which backend this is.
    fn kind(&self) -> DataSourceType;

    /// Whether successful writes are visible to later reads. Only the
    /// server-side local fallback answers `false`.
    fn persists_writes(&self) -> bool {
        true
    }

    async fn get_categories(&self) -> StoreResult<Vec<Category>>;

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>>;

    /// Insert a category, assigning its id.
    async fn add_category(&self, input: NewCategory) -> StoreResult<Category>;

    /// Replace a category by id. Returns `None` if no such category exists.
    async fn update_category(&self, category: Category) -> StoreResult<Option<Category>>;

    /// Delete a category and every link referencing it.
    ///
    /// Returns `true` iff the category existed and was removed.
    async fn delete_category(&self, id: &str) -> StoreResult<bool>;

    async fn get_links(&self) -> StoreResult<Vec<LinkItem>>;

    /// Links whose `categoryId` equals `category_id`; empty if none match.
    async fn get_links_by_category_id(&self, category_id: &str) -> StoreResult<Vec<LinkItem>>;

    async fn get_link(&self, id: &str) -> StoreResult<Option<LinkItem>>;

    /// Insert a link, assigning its id and resolving its icon source.
    async fn add_link(&self, input: NewLink) -> StoreResult<LinkItem>;

    /// Replace a link by id. Returns `None` if no such link exists.
    async fn update_link(&self, link: LinkItem) -> StoreResult<Option<LinkItem>>;

    /// Returns `true` iff the link existed and was removed.
    async fn delete_link(&self, id: &str) -> StoreResult<bool>;

    /// Verify the backend is reachable.
    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }

    /// Release backend resources. The handle must not be used afterwards.
    async fn close(&self) {}
}
