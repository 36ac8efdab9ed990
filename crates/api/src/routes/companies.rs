//! Route definitions for the company directory boundary.
//!
//! Mounted at `/companies` by `api_routes()`.

use axum::routing::get;
use axum::Router;

use crate::handlers::companies;
use crate::state::AppState;

/// Company routes.
///
/// ```text
/// GET  /  -> list_companies (active only)
/// POST /  -> create_company
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(companies::list_companies).post(companies::create_company),
    )
}
