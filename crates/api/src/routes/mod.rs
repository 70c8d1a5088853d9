pub mod admin;
pub mod categories;
pub mod directory;
pub mod health;
pub mod links;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /categories                          list, create
/// /categories/{id}                     get, update, delete (cascades to links)
/// /categories/{id}/links               links in one category
///
/// /links                               list, create
/// /links/{id}                          get, update, delete
///
/// /directory?q=term                    public directory, optionally filtered
///
/// /admin/connection-test               try a PostgreSQL connection string (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/categories", categories::router())
        .nest("/links", links::router())
        .nest("/directory", directory::router())
        .nest("/admin", admin::router())
}
