//! Public (unauthenticated) API surface.

mod blog;
mod card;
mod checkout;
mod donations;
mod engagement;
mod episodes;
mod polls;
mod shop;

use axum::{
    routing::{get, post},
    Router,
};
use serde::Serialize;

use crate::db::AppState;
use crate::extractors::Json;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/episodes", get(episodes::list_episodes))
        .route("/episodes/{id}", get(episodes::get_episode))
        .route("/episodes/{id}/unlock", post(episodes::unlock_episode))
        .route("/episodes/{id}/polls", get(polls::list_episode_polls))
        .route("/episodes/{id}/vote", post(polls::vote))
        .route("/blog", get(blog::list_posts))
        .route("/blog/{slug}", get(blog::get_post))
        .route("/shop/products", get(shop::list_products))
        .route("/shop/products/{id}", get(shop::get_product))
        .route("/shop/checkout", post(checkout::create_checkout))
        .route("/orders/verify", get(checkout::verify_order))
        .route("/donations", post(donations::create_donation_checkout))
        .route("/donations/verify", get(donations::verify_donation))
        .route("/signups", post(engagement::create_signup))
        .route("/social/{platform}/click", post(engagement::social_click))
        .route("/card", get(card::share_card))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
