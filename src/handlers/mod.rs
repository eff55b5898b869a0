//! HTTP route handlers.

pub mod admin;
pub mod public;
pub mod webhooks;

use axum::Router;

use crate::db::AppState;

/// Assemble the full application router. Used by the binary and by tests.
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(public::router())
        .merge(webhooks::router())
        .nest("/admin", admin::router(state.clone()))
        .with_state(state)
}
