#![allow(dead_code)]

//! Shared test fixtures.

use std::collections::HashMap;

use greenroom::config::StripeConfig;
use greenroom::db::{self, queries, AppState, DbPool};
use greenroom::models::*;
use greenroom::payments::stripe::StripeCheckoutSession;
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const TEST_ADMIN_TOKEN: &str = "test-admin-token";

/// In-memory pool capped at one connection so every handle sees the same
/// database.
pub fn test_pool() -> DbPool {
    let manager = SqliteConnectionManager::memory()
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    let pool = Pool::builder().max_size(1).build(manager).unwrap();
    db::init_db(&pool.get().unwrap()).unwrap();
    pool
}

pub fn test_state(pool: DbPool) -> AppState {
    AppState {
        db: pool,
        base_url: "http://localhost:3000".to_string(),
        site_url: "http://localhost:3000".to_string(),
        admin_token: Some(TEST_ADMIN_TOKEN.to_string()),
        stripe: Some(StripeConfig {
            secret_key: "sk_test_key".to_string(),
            webhook_secret: TEST_WEBHOOK_SECRET.to_string(),
        }),
        catalog: None,
    }
}

pub fn create_test_episode(conn: &rusqlite::Connection, external_id: &str) -> Episode {
    queries::create_episode(
        conn,
        &CreateEpisode {
            external_id: external_id.to_string(),
            title: format!("Episode {}", external_id),
            description: Some("A test episode".to_string()),
            runtime_minutes: Some(42),
            genres: vec!["drama".to_string()],
            tags: vec!["test".to_string()],
            visibility: Visibility::Locked,
            access_level: AccessLevel::Free,
            passphrase: Some("swordfish".to_string()),
            video_url: None,
            thumbnail_url: None,
            status: EpisodeStatus::Published,
        },
    )
    .unwrap()
}

pub fn create_test_poll(
    conn: &mut rusqlite::Connection,
    episode_id: &str,
    status: PollStatus,
) -> PollWithOptions {
    queries::create_poll(
        conn,
        &CreatePoll {
            episode_id: episode_id.to_string(),
            title: "Test poll".to_string(),
            description: None,
            status: Some(status),
            duration_days: None,
            options: vec!["Option A".to_string(), "Option B".to_string()],
        },
    )
    .unwrap()
}

pub fn create_pending_order(conn: &mut rusqlite::Connection, session_id: &str) -> OrderWithItems {
    queries::create_order(
        conn,
        &CreateOrder {
            order_number: "GR-TEST1234".to_string(),
            customer_email: Some("buyer@example.com".to_string()),
            customer_name: Some("Test Buyer".to_string()),
            status: PaidStatus::Pending,
            payment_status: Some("unpaid".to_string()),
            checkout_session_id: Some(session_id.to_string()),
            payment_intent_id: None,
            amount_total_cents: 2499,
            currency: "usd".to_string(),
            shipping_json: None,
            items: vec![CreateOrderItem {
                name: "Tour Tee".to_string(),
                quantity: 1,
                unit_amount_cents: 2499,
                variant: Some("M".to_string()),
            }],
        },
    )
    .unwrap()
}

pub fn create_pending_donation(conn: &rusqlite::Connection, id: &str, session_id: &str) -> Donation {
    queries::create_donation(
        conn,
        id,
        &CreateDonation {
            tier_id: "gold".to_string(),
            tier_name: "Gold Supporter".to_string(),
            amount_cents: 5000,
            currency: "usd".to_string(),
            supporter_name: Some("Test Supporter".to_string()),
            supporter_email: Some("supporter@example.com".to_string()),
            message: None,
            status: PaidStatus::Pending,
            payment_status: Some("unpaid".to_string()),
            checkout_session_id: Some(session_id.to_string()),
            payment_intent_id: None,
        },
    )
    .unwrap()
}

/// A completed, paid checkout session the way it arrives in a webhook.
pub fn paid_session(session_id: &str, metadata: &[(&str, &str)]) -> StripeCheckoutSession {
    StripeCheckoutSession {
        id: session_id.to_string(),
        url: None,
        payment_intent: Some("pi_test_123".to_string()),
        payment_status: Some("paid".to_string()),
        amount_total: Some(2499),
        currency: Some("usd".to_string()),
        customer_details: None,
        metadata: metadata
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
        shipping_details: None,
    }
}

pub fn count_rows(conn: &rusqlite::Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |row| {
        row.get(0)
    })
    .unwrap()
}
