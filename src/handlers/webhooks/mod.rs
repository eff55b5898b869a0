//! Payment provider webhooks.

pub mod reconcile;
mod stripe;

use axum::{routing::post, Router};

use crate::db::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/webhook/stripe", post(stripe::handle_stripe_webhook))
}
