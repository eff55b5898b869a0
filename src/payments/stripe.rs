//! Stripe Checkout client and webhook signature verification.
//!
//! Everything goes over Stripe's form-encoded REST API; we deliberately
//! avoid a full Stripe SDK since only checkout sessions and webhook
//! verification are needed.

use std::collections::HashMap;

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::{msg, AppError, Result};

type HmacSha256 = Hmac<Sha256>;

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Maximum age of a webhook signature timestamp before we reject it.
const SIGNATURE_TOLERANCE_SECS: i64 = 300;
/// Allowed clock skew for timestamps slightly in the future.
const SIGNATURE_FUTURE_SKEW_SECS: i64 = 60;

// ============ Checkout session creation ============

/// One line item on a checkout session, priced inline (`price_data`),
/// so nothing has to be pre-registered in the Stripe dashboard.
#[derive(Debug, Clone)]
pub struct CheckoutLineItem {
    pub name: String,
    pub unit_amount_cents: i64,
    pub quantity: i64,
}

/// Request to create a Stripe Checkout session.
#[derive(Debug, Clone)]
pub struct CheckoutSessionRequest {
    pub success_url: String,
    pub cancel_url: String,
    pub currency: String,
    pub customer_email: Option<String>,
    pub line_items: Vec<CheckoutLineItem>,
    /// Metadata round-trips through Stripe and comes back on the webhook;
    /// the reconciler reads it to recover context for the session.
    pub metadata: Vec<(String, String)>,
    /// Ask Stripe to collect a shipping address (physical goods only).
    pub collect_shipping: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCustomerDetails {
    pub email: Option<String>,
    pub name: Option<String>,
}

/// The subset of a Stripe Checkout session object we care about. The same
/// shape arrives from session creation, session retrieval, and inside
/// `checkout.session.completed` webhook events.
#[derive(Debug, Clone, Deserialize)]
pub struct StripeCheckoutSession {
    pub id: String,
    /// Hosted checkout page URL; present on freshly created sessions.
    pub url: Option<String>,
    pub payment_intent: Option<String>,
    pub payment_status: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
    pub customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Shipping block as Stripe sent it; stored verbatim.
    pub shipping_details: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
pub struct StripeEventData {
    pub object: serde_json::Value,
}

/// A Stripe webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct StripeWebhookEvent {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: StripeEventData,
}

impl StripeWebhookEvent {
    /// Deserialize the event's payload object as a checkout session.
    pub fn checkout_session(&self) -> Result<StripeCheckoutSession> {
        serde_json::from_value(self.data.object.clone()).map_err(Into::into)
    }
}

/// Thin Stripe API client over reqwest.
#[derive(Debug, Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    secret_key: String,
}

impl StripeClient {
    pub fn new(secret_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.to_string(),
        }
    }

    /// Create a hosted checkout session.
    pub async fn create_checkout_session(
        &self,
        req: &CheckoutSessionRequest,
    ) -> Result<StripeCheckoutSession> {
        let mut form: Vec<(String, String)> = vec![
            ("mode".into(), "payment".into()),
            ("success_url".into(), req.success_url.clone()),
            ("cancel_url".into(), req.cancel_url.clone()),
        ];

        if let Some(email) = &req.customer_email {
            form.push(("customer_email".into(), email.clone()));
        }

        for (i, item) in req.line_items.iter().enumerate() {
            form.push((
                format!("line_items[{}][price_data][currency]", i),
                req.currency.clone(),
            ));
            form.push((
                format!("line_items[{}][price_data][product_data][name]", i),
                item.name.clone(),
            ));
            form.push((
                format!("line_items[{}][price_data][unit_amount]", i),
                item.unit_amount_cents.to_string(),
            ));
            form.push((
                format!("line_items[{}][quantity]", i),
                item.quantity.to_string(),
            ));
        }

        for (key, value) in &req.metadata {
            form.push((format!("metadata[{}]", key), value.clone()));
        }

        if req.collect_shipping {
            form.push((
                "shipping_address_collection[allowed_countries][0]".into(),
                "US".into(),
            ));
            form.push((
                "shipping_address_collection[allowed_countries][1]".into(),
                "CA".into(),
            ));
        }

        let response = self
            .http
            .post(format!("{}/checkout/sessions", STRIPE_API_BASE))
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Stripe request failed: {}", e)))?;

        Self::parse_session_response(response).await
    }

    /// Retrieve a checkout session by id, used by the verify endpoints to
    /// double-check payment state against the provider.
    pub async fn get_checkout_session(&self, session_id: &str) -> Result<StripeCheckoutSession> {
        let response = self
            .http
            .get(format!(
                "{}/checkout/sessions/{}",
                STRIPE_API_BASE, session_id
            ))
            .basic_auth(&self.secret_key, None::<&str>)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Stripe request failed: {}", e)))?;

        Self::parse_session_response(response).await
    }

    async fn parse_session_response(response: reqwest::Response) -> Result<StripeCheckoutSession> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Stripe response unreadable: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Stripe API error");
            return Err(AppError::Upstream(format!(
                "Stripe returned {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Upstream(format!("Unexpected Stripe response: {}", e)))
    }
}

// ============ Webhook signature verification ============

/// Verify a `Stripe-Signature` header against the raw request body.
///
/// The header carries a timestamp and one or more `v1` HMAC candidates:
/// `t=1700000000,v1=abc...,v1=def...`. The signed payload is
/// `{timestamp}.{raw body}`. Timestamps older than the tolerance window
/// (or unreasonably in the future) are rejected to blunt replay.
pub fn verify_webhook_signature(payload: &[u8], sig_header: &str, secret: &str) -> Result<()> {
    let mut timestamp: Option<i64> = None;
    let mut candidates: Vec<&str> = Vec::new();

    for part in sig_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => {
                timestamp = Some(
                    value
                        .parse()
                        .map_err(|_| AppError::BadRequest(msg::INVALID_TIMESTAMP_IN_SIGNATURE.into()))?,
                );
            }
            Some(("v1", value)) => candidates.push(value),
            _ => {}
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| AppError::BadRequest(msg::INVALID_SIGNATURE_FORMAT.into()))?;
    if candidates.is_empty() {
        return Err(AppError::BadRequest(msg::INVALID_SIGNATURE_FORMAT.into()));
    }

    let now = chrono::Utc::now().timestamp();
    if now - timestamp > SIGNATURE_TOLERANCE_SECS || timestamp - now > SIGNATURE_FUTURE_SKEW_SECS {
        return Err(AppError::Unauthorized);
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| AppError::Internal(msg::INVALID_WEBHOOK_SECRET.into()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = mac.finalize().into_bytes();

    for candidate in candidates {
        if let Ok(bytes) = hex::decode(candidate) {
            if bytes.len() == expected.len() && bool::from(bytes.ct_eq(&expected)) {
                return Ok(());
            }
        }
    }

    Err(AppError::Unauthorized)
}

/// Produce a `Stripe-Signature` header value for a payload. Exists for
/// webhook tests; the service itself only ever verifies.
pub fn sign_payload(payload: &[u8], secret: &str, timestamp: i64) -> String {
    // HMAC accepts keys of any length, so this cannot fail.
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC accepts any key length");
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let sig = hex::encode(mac.finalize().into_bytes());
    format!("t={},v1={}", timestamp, sig)
}

// ============ Price parsing ============

/// Parse a display price string (`"$24.99"`, `"24.99 USD"`) into minor
/// currency units. Returns None when no numeric content remains.
pub fn parse_price_to_cents(display: &str) -> Option<i64> {
    let cleaned: String = display
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    let value: f64 = cleaned.parse().ok()?;
    Some((value * 100.0).round() as i64)
}
