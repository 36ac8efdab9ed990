/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Configuration is consumed when the router is built
/// ([`crate::router::build_app_router`] takes it by reference), so the
/// state carries only what handlers read per request.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: slate_db::DbPool,
}
