//! Integration tests for the PostgreSQL backend.
//!
//! These need a running server reachable through `DATABASE_URL`, so they
//! are ignored by default: `cargo test -- --ignored`.

mod common;

use linkhub_db::models::{NewCategory, NewLink};
use linkhub_db::store::retry::RetryPolicy;
use linkhub_db::store::PostgresStore;
use linkhub_db::{DataSourceType, LinkStore};
use sqlx::PgPool;

fn store(pool: PgPool) -> PostgresStore {
    PostgresStore::from_pool(pool).with_retry_policy(RetryPolicy::once())
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_bootstrap(pool: PgPool) {
    linkhub_db::health_check(&pool).await.unwrap();

    let store = store(pool);
    assert_eq!(store.kind(), DataSourceType::Postgres);
    store.health_check().await.unwrap();
    assert!(store.get_categories().await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_cascade_scenario(pool: PgPool) {
    common::assert_cascade_scenario(&store(pool)).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_round_trip(pool: PgPool) {
    common::assert_round_trip(&store(pool)).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_not_found_contract(pool: PgPool) {
    common::assert_not_found_contract(&store(pool)).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_updates_are_visible(pool: PgPool) {
    common::assert_updates_are_visible(&store(pool)).await;
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_ids_are_uuids(pool: PgPool) {
    let store = store(pool);
    let category = store.add_category(NewCategory::named("Work")).await.unwrap();
    assert!(uuid::Uuid::parse_str(&category.id).is_ok());
}

/// A link pointing at a missing category violates the foreign key and the
/// error propagates on the first attempt.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_orphan_link_is_rejected(pool: PgPool) {
    let store = store(pool);
    let result = store
        .add_link(NewLink::new("Orphan", "https://example.com", "no-such-category"))
        .await;
    assert!(result.is_err());
}

/// The cascade runs in one transaction: links of other categories survive.
#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "needs a PostgreSQL server via DATABASE_URL"]
async fn test_cascade_leaves_other_categories_alone(pool: PgPool) {
    let store = store(pool);
    let doomed = store.add_category(NewCategory::named("Doomed")).await.unwrap();
    let kept = store.add_category(NewCategory::named("Kept")).await.unwrap();
    for (title, category) in [("A1", &doomed), ("A2", &doomed), ("B1", &kept)] {
        store
            .add_link(NewLink::new(title, "https://example.com", category.id.clone()))
            .await
            .unwrap();
    }

    assert!(store.delete_category(&doomed.id).await.unwrap());

    let remaining = store.get_links().await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].title, "B1");
    assert_eq!(store.get_categories().await.unwrap(), vec![kept]);
}
