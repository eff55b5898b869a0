mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::*;
use greenroom::db::queries;
use greenroom::handlers;
use greenroom::models::PaidStatus;
use greenroom::payments::stripe::sign_payload;
use serde_json::json;
use tower::ServiceExt;

fn completed_event(session_id: &str, metadata: serde_json::Value) -> String {
    json!({
        "id": "evt_test_1",
        "type": "checkout.session.completed",
        "data": { "object": {
            "id": session_id,
            "payment_intent": "pi_test_123",
            "payment_status": "paid",
            "amount_total": 2499,
            "currency": "usd",
            "metadata": metadata,
        }},
    })
    .to_string()
}

fn webhook_request(body: &str, signature: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/webhook/stripe")
        .header("content-type", "application/json")
        .header("stripe-signature", signature)
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn signed_event_reconciles_pending_order() {
    let pool = test_pool();
    {
        let mut conn = pool.get().unwrap();
        create_pending_order(&mut conn, "cs_hook_1");
    }
    let app = handlers::app(test_state(pool.clone()));

    let body = completed_event("cs_hook_1", json!({ "type": "order" }));
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );
    let response = app.oneshot(webhook_request(&body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = pool.get().unwrap();
    let order = queries::get_order_by_session(&conn, "cs_hook_1")
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PaidStatus::Paid);
    assert_eq!(order.payment_intent_id.as_deref(), Some("pi_test_123"));
}

#[tokio::test]
async fn replayed_event_leaves_one_paid_record() {
    let pool = test_pool();
    {
        let mut conn = pool.get().unwrap();
        create_pending_order(&mut conn, "cs_hook_2");
    }
    let app = handlers::app(test_state(pool.clone()));

    let body = completed_event("cs_hook_2", json!({ "type": "order" }));
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(webhook_request(&body, &sig))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let conn = pool.get().unwrap();
    assert_eq!(count_rows(&conn, "orders"), 1);
    let order = queries::get_order_by_session(&conn, "cs_hook_2")
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PaidStatus::Paid);
}

#[tokio::test]
async fn wrong_secret_is_unauthorized_with_no_writes() {
    let pool = test_pool();
    {
        let mut conn = pool.get().unwrap();
        create_pending_order(&mut conn, "cs_hook_3");
    }
    let app = handlers::app(test_state(pool.clone()));

    let body = completed_event("cs_hook_3", json!({ "type": "order" }));
    let sig = sign_payload(
        body.as_bytes(),
        "whsec_wrong_secret",
        chrono::Utc::now().timestamp(),
    );
    let response = app.oneshot(webhook_request(&body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let conn = pool.get().unwrap();
    let order = queries::get_order_by_session(&conn, "cs_hook_3")
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PaidStatus::Pending);
}

#[tokio::test]
async fn tampered_body_is_unauthorized() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool.clone()));

    let body = completed_event("cs_hook_4", json!({ "type": "order" }));
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );
    let tampered = body.replace("2499", "1");
    let response = app.oneshot(webhook_request(&tampered, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let conn = pool.get().unwrap();
    assert_eq!(count_rows(&conn, "orders"), 0);
}

#[tokio::test]
async fn stale_signature_is_unauthorized() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool));

    let body = completed_event("cs_hook_5", json!({ "type": "order" }));
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp() - 600,
    );
    let response = app.oneshot(webhook_request(&body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_signature_header_is_bad_request() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool));

    let body = completed_event("cs_hook_6", json!({ "type": "order" }));
    let request = Request::builder()
        .method("POST")
        .uri("/webhook/stripe")
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn signed_malformed_envelope_is_acknowledged() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool.clone()));

    // Valid signature over a body that is not an event envelope. Once the
    // signature passes, redelivery of the same broken payload helps nobody.
    let body = r#"{"unexpected": ["shape"]}"#;
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );
    let response = app.oneshot(webhook_request(body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = pool.get().unwrap();
    assert_eq!(count_rows(&conn, "orders"), 0);
    assert_eq!(count_rows(&conn, "donations"), 0);
}

#[tokio::test]
async fn unrelated_event_is_acknowledged_without_writes() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool.clone()));

    let body = json!({
        "id": "evt_other",
        "type": "charge.refunded",
        "data": { "object": { "id": "ch_1" } },
    })
    .to_string();
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );
    let response = app.oneshot(webhook_request(&body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = pool.get().unwrap();
    assert_eq!(count_rows(&conn, "orders"), 0);
    assert_eq!(count_rows(&conn, "donations"), 0);
}

#[tokio::test]
async fn recovery_synthesizes_order_over_http() {
    let pool = test_pool();
    let app = handlers::app(test_state(pool.clone()));

    let items = r#"[{"name":"Poster","quantity":1,"unit_amount_cents":1500}]"#;
    let body = completed_event(
        "cs_hook_7",
        json!({ "type": "order", "order_number": "GR-HTTPREC1", "items": items }),
    );
    let sig = sign_payload(
        body.as_bytes(),
        TEST_WEBHOOK_SECRET,
        chrono::Utc::now().timestamp(),
    );
    let response = app.oneshot(webhook_request(&body, &sig)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let conn = pool.get().unwrap();
    let order = queries::get_order_by_number(&conn, "GR-HTTPREC1")
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PaidStatus::Paid);
    assert_eq!(count_rows(&conn, "orders"), 1);
}
