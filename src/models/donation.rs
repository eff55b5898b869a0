use serde::{Deserialize, Serialize};

use super::PaidStatus;

/// A supporter donation. Same status/payment_status/session-id
/// reconciliation shape as an order, but without line items.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,
    pub tier_id: String,
    pub tier_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub supporter_name: Option<String>,
    pub supporter_email: Option<String>,
    pub message: Option<String>,
    pub status: PaidStatus,
    pub payment_status: Option<String>,
    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone)]
pub struct CreateDonation {
    pub tier_id: String,
    pub tier_name: String,
    pub amount_cents: i64,
    pub currency: String,
    pub supporter_name: Option<String>,
    pub supporter_email: Option<String>,
    pub message: Option<String>,
    pub status: PaidStatus,
    pub payment_status: Option<String>,
    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
}
