use axum::routing::get;
use axum::Router;

use crate::handlers::links;
use crate::state::AppState;

/// Link routes mounted at `/links`.
///
/// ```text
/// GET    /              -> list_links
/// POST   /              -> create_link
/// GET    /{id}          -> get_link
/// PUT    /{id}          -> update_link
/// DELETE /{id}          -> delete_link
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(links::list_links).post(links::create_link))
        .route(
            "/{id}",
            get(links::get_link)
                .put(links::update_link)
                .delete(links::delete_link),
        )
}
