//! Route definitions for production items.
//!
//! Mounted at `/items` by `api_routes()`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::items;
use crate::state::AppState;

/// Item routes.
///
/// ```text
/// GET   /                 -> list_items (?year, ?month)
/// POST  /                 -> create_item
/// GET   /weeks            -> list_weeks (?year, ?month, ?include_empty)
/// POST  /generate         -> generate_defaults
/// GET   /{id}             -> get_item
/// PATCH /{id}             -> patch_item (single-field body)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(items::list_items).post(items::create_item))
        .route("/weeks", get(items::list_weeks))
        .route("/generate", post(items::generate_defaults))
        .route("/{id}", get(items::get_item).patch(items::patch_item))
}
