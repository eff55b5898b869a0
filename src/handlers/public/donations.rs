//! Donation checkout and verification.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{msg, AppError, Result};
use crate::extractors::{Json, Query};
use crate::handlers::webhooks::reconcile;
use crate::id::EntityType;
use crate::models::{CreateDonation, PaidStatus};
use crate::payments::stripe::{CheckoutLineItem, CheckoutSessionRequest, StripeClient};

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    /// Donation amount in whole currency units (e.g. dollars).
    pub amount: f64,
    pub tier_id: String,
    pub tier_name: String,
    #[serde(default)]
    pub supporter_name: Option<String>,
    #[serde(default)]
    pub supporter_email: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DonationResponse {
    pub checkout_url: String,
    pub donation_id: String,
}

/// Create a hosted checkout session for a donation. Same best-effort
/// pending-record shape as shop checkout.
pub async fn create_donation_checkout(
    State(state): State<AppState>,
    Json(body): Json<DonationRequest>,
) -> Result<Json<DonationResponse>> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured(msg::PAYMENTS_NOT_CONFIGURED.to_string()))?;

    if body.amount <= 0.0 {
        return Err(AppError::BadRequest(
            "Donation amount must be positive".to_string(),
        ));
    }
    if body.tier_name.trim().is_empty() {
        return Err(AppError::BadRequest("Tier name is required".to_string()));
    }

    let amount_cents = (body.amount * 100.0).round() as i64;
    let donation_id = EntityType::Donation.gen_id();

    let mut metadata: Vec<(String, String)> = vec![
        ("type".to_string(), "donation".to_string()),
        ("donation_id".to_string(), donation_id.clone()),
        ("tier_id".to_string(), body.tier_id.clone()),
        ("tier_name".to_string(), body.tier_name.clone()),
    ];
    if let Some(name) = &body.supporter_name {
        metadata.push(("supporter_name".to_string(), name.clone()));
    }
    if let Some(message) = &body.message {
        metadata.push(("message".to_string(), message.clone()));
    }

    let client = StripeClient::new(&stripe.secret_key);
    let session = client
        .create_checkout_session(&CheckoutSessionRequest {
            success_url: format!(
                "{}/support/thanks?session_id={{CHECKOUT_SESSION_ID}}",
                state.site_url
            ),
            cancel_url: format!("{}/support", state.site_url),
            currency: "usd".to_string(),
            customer_email: body.supporter_email.clone(),
            line_items: vec![CheckoutLineItem {
                name: format!("Donation - {}", body.tier_name),
                unit_amount_cents: amount_cents,
                quantity: 1,
            }],
            metadata,
            collect_shipping: false,
        })
        .await?;

    let checkout_url = session
        .url
        .clone()
        .ok_or_else(|| AppError::Upstream("Checkout session has no URL".to_string()))?;

    let pending = CreateDonation {
        tier_id: body.tier_id,
        tier_name: body.tier_name,
        amount_cents,
        currency: "usd".to_string(),
        supporter_name: body.supporter_name,
        supporter_email: body.supporter_email,
        message: body.message,
        status: PaidStatus::Pending,
        payment_status: session.payment_status.clone(),
        checkout_session_id: Some(session.id.clone()),
        payment_intent_id: session.payment_intent.clone(),
    };
    match state.db.get() {
        Ok(conn) => {
            if let Err(e) = queries::create_donation(&conn, &donation_id, &pending) {
                tracing::error!(donation_id = %donation_id, error = %e,
                    "Failed to persist pending donation; webhook recovery will synthesize it");
            }
        }
        Err(e) => {
            tracing::error!(donation_id = %donation_id, error = %e,
                "No database connection for pending donation; webhook recovery will synthesize it");
        }
    }

    tracing::info!(donation_id = %donation_id, session_id = %session.id,
        "Donation checkout session created");

    Ok(Json(DonationResponse {
        checkout_url,
        donation_id,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyDonationResponse {
    pub donation_id: String,
    pub status: PaidStatus,
    pub payment_status: Option<String>,
}

/// Report the reconciled state of a donation by checkout session id.
pub async fn verify_donation(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyDonationResponse>> {
    let donation = {
        let conn = state.db.get()?;
        queries::get_donation_by_session(&conn, &query.session_id)?
    };

    let donation = match (donation, &state.stripe) {
        (Some(donation), Some(stripe)) if donation.status == PaidStatus::Pending => {
            let session = StripeClient::new(&stripe.secret_key)
                .get_checkout_session(&query.session_id)
                .await?;
            if session.payment_status.as_deref() == Some("paid") {
                let conn = state.db.get()?;
                reconcile::reconcile_donation(&conn, &session)?
            } else {
                donation
            }
        }
        (Some(donation), _) => donation,
        (None, _) => return Err(AppError::NotFound(msg::DONATION_NOT_FOUND.to_string())),
    };

    Ok(Json(VerifyDonationResponse {
        donation_id: donation.id,
        status: donation.status,
        payment_status: donation.payment_status,
    }))
}
