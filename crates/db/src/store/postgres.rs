//! PostgreSQL backend for the `categories` and `links` tables.
//!
//! Column names for links are camelCase in the schema (`"categoryId"`,
//! `"iconSource"`), so they are always quoted.
//!
//! Every operation except the deletes acquires a pooled connection inside
//! [`retry_transient`], so a dropped connection or deadlock gets up to three
//! attempts. Each attempt owns its `PoolConnection` and hands it back to the
//! pool when the attempt ends, however it ends.

use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use super::retry::{retry_transient, RetryPolicy};
use super::{LinkStore, StoreResult};
use crate::config::{DataSourceType, PostgresConfig};
use crate::models::{Category, LinkItem, NewCategory, NewLink};

/// Column list for categories queries.
const CATEGORY_COLUMNS: &str = "id, name, description, icon";

/// Column list for links queries.
const LINK_COLUMNS: &str = r#"id, title, url, description, "categoryId", icon, "iconSource""#;

/// [`LinkStore`] over a PostgreSQL connection pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: PgPool,
    retry: RetryPolicy,
}

impl PostgresStore {
    /// Build a lazily connecting pool from `config`.
    ///
    /// A connection test runs straight away, but its failure is only logged:
    /// the first real query will surface the error if the database is still
    /// unreachable. Missing or malformed credentials fail immediately.
    pub async fn connect(config: &PostgresConfig) -> StoreResult<Self> {
        let options = config.connect_options()?;
        let pool = PgPoolOptions::new()
            .max_connections(config.pool.max_connections)
            .idle_timeout(config.pool.idle_timeout)
            .acquire_timeout(config.pool.connect_timeout)
            .connect_lazy_with(options);

        let store = Self::from_pool(pool);
        match server_time(&store.pool).await {
            Ok(now) => tracing::info!(server_time = %now, "PostgreSQL connection established"),
            Err(e) => tracing::error!(error = %e, "PostgreSQL connection test failed"),
        }
        Ok(store)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            retry: RetryPolicy::default(),
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn run<T, F, Fut>(&self, label: &str, op: F) -> StoreResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, sqlx::Error>>,
    {
        Ok(retry_transient(self.retry, label, op).await?)
    }

    async fn try_delete_category(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let links = sqlx::query(r#"DELETE FROM links WHERE "categoryId" = $1"#)
            .bind(id)
            .execute(&mut *tx)
            .await?;
        let category = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!(
            id,
            links_removed = links.rows_affected(),
            "Category deleted with its links"
        );
        Ok(category.rows_affected() > 0)
    }

    async fn try_delete_link(&self, id: &str) -> Result<bool, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        let result = sqlx::query("DELETE FROM links WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

/// Current time according to the database server.
pub async fn server_time(pool: &PgPool) -> Result<DateTime<Utc>, sqlx::Error> {
    sqlx::query_scalar::<_, DateTime<Utc>>("SELECT NOW()")
        .fetch_one(pool)
        .await
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[async_trait]
impl LinkStore for PostgresStore {
    fn kind(&self) -> DataSourceType {
        DataSourceType::Postgres
    }

    async fn get_categories(&self) -> StoreResult<Vec<Category>> {
        let pool = &self.pool;
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories");
        let query = query.as_str();
        self.run("get_categories", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, Category>(query)
                .fetch_all(&mut *conn)
                .await
        })
        .await
    }

    async fn get_category(&self, id: &str) -> StoreResult<Option<Category>> {
        let pool = &self.pool;
        let query = format!("SELECT {CATEGORY_COLUMNS} FROM categories WHERE id = $1");
        let query = query.as_str();
        self.run("get_category", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, Category>(query)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    async fn add_category(&self, input: NewCategory) -> StoreResult<Category> {
        let pool = &self.pool;
        let category = input.into_category(new_id());
        let category = &category;
        let query = format!(
            "INSERT INTO categories (id, name, description, icon) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {CATEGORY_COLUMNS}"
        );
        let query = query.as_str();
        self.run("add_category", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, Category>(query)
                .bind(&category.id)
                .bind(&category.name)
                .bind(&category.description)
                .bind(&category.icon)
                .fetch_one(&mut *conn)
                .await
        })
        .await
    }

    async fn update_category(&self, category: Category) -> StoreResult<Option<Category>> {
        let pool = &self.pool;
        let category = &category;
        let query = format!(
            "UPDATE categories SET name = $1, description = $2, icon = $3 \
             WHERE id = $4 \
             RETURNING {CATEGORY_COLUMNS}"
        );
        let query = query.as_str();
        self.run("update_category", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, Category>(query)
                .bind(&category.name)
                .bind(&category.description)
                .bind(&category.icon)
                .bind(&category.id)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    /// Runs without retries. A failure rolls the transaction back, is
    /// logged, and reports `false`, which callers cannot tell apart from
    /// "no such category".
    async fn delete_category(&self, id: &str) -> StoreResult<bool> {
        match self.try_delete_category(id).await {
            Ok(deleted) => Ok(deleted),
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to delete category, transaction rolled back");
                Ok(false)
            }
        }
    }

    async fn get_links(&self) -> StoreResult<Vec<LinkItem>> {
        let pool = &self.pool;
        let query = format!("SELECT {LINK_COLUMNS} FROM links");
        let query = query.as_str();
        self.run("get_links", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, LinkItem>(query)
                .fetch_all(&mut *conn)
                .await
        })
        .await
    }

    async fn get_links_by_category_id(&self, category_id: &str) -> StoreResult<Vec<LinkItem>> {
        let pool = &self.pool;
        let query = format!(r#"SELECT {LINK_COLUMNS} FROM links WHERE "categoryId" = $1"#);
        let query = query.as_str();
        self.run("get_links_by_category_id", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, LinkItem>(query)
                .bind(category_id)
                .fetch_all(&mut *conn)
                .await
        })
        .await
    }

    async fn get_link(&self, id: &str) -> StoreResult<Option<LinkItem>> {
        let pool = &self.pool;
        let query = format!("SELECT {LINK_COLUMNS} FROM links WHERE id = $1");
        let query = query.as_str();
        self.run("get_link", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, LinkItem>(query)
                .bind(id)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    async fn add_link(&self, input: NewLink) -> StoreResult<LinkItem> {
        let pool = &self.pool;
        let link = input.into_link(new_id());
        let link = &link;
        let query = format!(
            r#"INSERT INTO links (id, title, url, description, "categoryId", icon, "iconSource")
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {LINK_COLUMNS}"#
        );
        let query = query.as_str();
        self.run("add_link", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, LinkItem>(query)
                .bind(&link.id)
                .bind(&link.title)
                .bind(&link.url)
                .bind(&link.description)
                .bind(&link.category_id)
                .bind(&link.icon)
                .bind(link.icon_source.as_str())
                .fetch_one(&mut *conn)
                .await
        })
        .await
    }

    async fn update_link(&self, link: LinkItem) -> StoreResult<Option<LinkItem>> {
        let pool = &self.pool;
        let link = &link;
        let query = format!(
            r#"UPDATE links SET title = $1, url = $2, description = $3, "categoryId" = $4,
                   icon = $5, "iconSource" = $6
               WHERE id = $7
               RETURNING {LINK_COLUMNS}"#
        );
        let query = query.as_str();
        self.run("update_link", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query_as::<_, LinkItem>(query)
                .bind(&link.title)
                .bind(&link.url)
                .bind(&link.description)
                .bind(&link.category_id)
                .bind(&link.icon)
                .bind(link.icon_source.as_str())
                .bind(&link.id)
                .fetch_optional(&mut *conn)
                .await
        })
        .await
    }

    /// Single attempt on a dedicated connection. Failures are logged and
    /// reported as `false`.
    async fn delete_link(&self, id: &str) -> StoreResult<bool> {
        match self.try_delete_link(id).await {
            Ok(deleted) => Ok(deleted),
            Err(e) => {
                tracing::error!(id, error = %e, "Failed to delete link");
                Ok(false)
            }
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        let pool = &self.pool;
        self.run("health_check", move || async move {
            let mut conn = pool.acquire().await?;
            sqlx::query("SELECT NOW()").execute(&mut *conn).await.map(|_| ())
        })
        .await
    }

    async fn close(&self) {
        self.pool.close().await;
        tracing::info!("PostgreSQL pool closed");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use assert_matches::assert_matches;
    use sqlx::postgres::PgConnectOptions;

    use super::*;
    use crate::store::StoreError;

    /// A store whose pool points at a port nothing listens on.
    fn unreachable_store() -> PostgresStore {
        let options = PgConnectOptions::new()
            .host("127.0.0.1")
            .port(1)
            .username("linkhub")
            .database("linkhub");
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_millis(500))
            .connect_lazy_with(options);
        PostgresStore::from_pool(pool).with_retry_policy(RetryPolicy::once())
    }

    #[tokio::test]
    async fn failed_category_delete_reports_false() {
        let store = unreachable_store();
        assert!(!store.delete_category("1").await.unwrap());
        store.close().await;
    }

    #[tokio::test]
    async fn failed_link_delete_reports_false() {
        let store = unreachable_store();
        assert!(!store.delete_link("1").await.unwrap());
        store.close().await;
    }

    #[tokio::test]
    async fn other_failures_propagate() {
        let store = unreachable_store();
        assert_matches!(store.get_categories().await, Err(StoreError::Database(_)));
        assert_matches!(store.health_check().await, Err(StoreError::Database(_)));
        store.close().await;
    }
}
