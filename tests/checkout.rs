mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::*;
use greenroom::db::queries;
use greenroom::handlers;
use greenroom::payments::stripe::parse_price_to_cents;
use serde_json::{json, Value};
use tower::ServiceExt;

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[test]
fn cart_total_is_sum_of_rounded_line_totals() {
    let cart = [("$24.99", 2i64), ("15", 1), ("$9.50 USD", 3)];

    let total: i64 = cart
        .iter()
        .map(|(price, qty)| parse_price_to_cents(price).unwrap() * qty)
        .sum();

    assert_eq!(total, 2499 * 2 + 1500 + 950 * 3);
}

#[tokio::test]
async fn empty_cart_is_bad_request() {
    let app = handlers::app(test_state(test_pool()));

    let response = app
        .oneshot(post_json("/shop/checkout", json!({ "items": [] })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unparseable_price_is_bad_request() {
    let app = handlers::app(test_state(test_pool()));

    let response = app
        .oneshot(post_json(
            "/shop/checkout",
            json!({ "items": [{ "name": "Tee", "price": "free", "quantity": 1 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn overflowing_line_total_is_bad_request() {
    let app = handlers::app(test_state(test_pool()));

    // A price that saturates the minor-unit parse near i64::MAX; doubling
    // it must come back as a clean 400, not an overflow.
    let response = app
        .clone()
        .oneshot(post_json(
            "/shop/checkout",
            json!({ "items": [{
                "name": "Tee",
                "price": "92233720368547758.07",
                "quantity": 2,
            }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Two items whose valid line totals overflow when summed.
    let response = app
        .oneshot(post_json(
            "/shop/checkout",
            json!({ "items": [
                { "name": "A", "price": "92233720368547758.07", "quantity": 1 },
                { "name": "B", "price": "92233720368547758.07", "quantity": 1 },
            ] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn non_positive_quantity_is_bad_request() {
    let app = handlers::app(test_state(test_pool()));

    let response = app
        .oneshot(post_json(
            "/shop/checkout",
            json!({ "items": [{ "name": "Tee", "price": "$24.99", "quantity": 0 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn checkout_without_stripe_config_fails_cleanly() {
    let mut state = test_state(test_pool());
    state.stripe = None;
    let app = handlers::app(state);

    let response = app
        .clone()
        .oneshot(post_json(
            "/shop/checkout",
            json!({ "items": [{ "name": "Tee", "price": "$24.99", "quantity": 1 }] }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app
        .oneshot(post_json(
            "/donations",
            json!({ "amount": 25.0, "tier_id": "gold", "tier_name": "Gold" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn donation_validation_rejects_bad_amounts() {
    let app = handlers::app(test_state(test_pool()));

    let response = app
        .clone()
        .oneshot(post_json(
            "/donations",
            json!({ "amount": 0.0, "tier_id": "gold", "tier_name": "Gold" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(post_json(
            "/donations",
            json!({ "amount": 10.0, "tier_id": "gold", "tier_name": "  " }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn verify_order_reports_reconciled_state() {
    let pool = test_pool();
    {
        let mut conn = pool.get().unwrap();
        create_pending_order(&mut conn, "cs_verify_1");
        queries::mark_order_paid(&conn, "cs_verify_1", Some("pi_9"), "paid").unwrap();
    }
    let app = handlers::app(test_state(pool));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/orders/verify?session_id=cs_verify_1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/orders/verify?session_id=cs_unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn verify_donation_reports_reconciled_state() {
    let pool = test_pool();
    {
        let conn = pool.get().unwrap();
        create_pending_donation(&conn, "gr_don_verify", "cs_verify_2");
        queries::mark_donation_paid(&conn, "cs_verify_2", Some("pi_9"), "paid").unwrap();
    }
    let app = handlers::app(test_state(pool));

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/donations/verify?session_id=cs_verify_2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/donations/verify?session_id=cs_unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
