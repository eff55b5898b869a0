//! Admin API surface, guarded by the bearer-token middleware.

mod blog;
mod episodes;
mod orders;
mod polls;

use axum::{
    middleware::from_fn_with_state,
    routing::{get, post},
    Router,
};

use crate::db::AppState;
use crate::middleware::require_admin;

pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/episodes", post(episodes::create_episode))
        .route(
            "/episodes/{id}",
            axum::routing::patch(episodes::update_episode).delete(episodes::delete_episode),
        )
        .route("/polls", post(polls::create_poll))
        .route(
            "/polls/{id}",
            axum::routing::patch(polls::update_poll).delete(polls::delete_poll),
        )
        .route("/blog", post(blog::create_post))
        .route("/orders", get(orders::list_orders))
        .route("/donations", get(orders::list_donations))
        .layer(from_fn_with_state(state, require_admin))
}
