pub mod companies;
pub mod health;
pub mod items;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /items                    list (?year, ?month), create
/// /items/weeks              week-grouped view (?year, ?month, ?include_empty)
/// /items/generate           bulk-generate defaults for a period (POST)
/// /items/{id}               get, single-field patch
///
/// /companies                list active, register
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/items", items::router())
        .nest("/companies", companies::router())
}
