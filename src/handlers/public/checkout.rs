//! Shop checkout: hosted session creation plus the order verify endpoint.

use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::db::{queries, AppState};
use crate::error::{msg, AppError, Result};
use crate::extractors::{Json, Query};
use crate::handlers::webhooks::reconcile;
use crate::id::gen_order_number;
use crate::models::{CreateOrder, CreateOrderItem, PaidStatus};
use crate::payments::stripe::{
    parse_price_to_cents, CheckoutLineItem, CheckoutSessionRequest, StripeClient,
};

#[derive(Debug, Deserialize)]
pub struct CheckoutItemInput {
    pub name: String,
    /// Display price string from the storefront, e.g. `"$24.99"`.
    pub price: String,
    pub quantity: i64,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub variant: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CheckoutCustomerInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<CheckoutItemInput>,
    #[serde(default)]
    pub customer: Option<CheckoutCustomerInput>,
    /// Shipping snapshot from the storefront, stored verbatim.
    #[serde(default)]
    pub shipping: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub checkout_url: String,
    pub order_number: String,
}

/// Create a hosted checkout session for a cart.
///
/// The pending order row is written best-effort after the session exists:
/// if the insert fails the customer still gets their checkout URL and the
/// webhook recovery path synthesizes the order from session metadata later.
pub async fn create_checkout(
    State(state): State<AppState>,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutResponse>> {
    let stripe = state
        .stripe
        .as_ref()
        .ok_or_else(|| AppError::NotConfigured(msg::PAYMENTS_NOT_CONFIGURED.to_string()))?;

    if body.items.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".to_string()));
    }

    let mut line_items = Vec::with_capacity(body.items.len());
    let mut order_items = Vec::with_capacity(body.items.len());
    for item in &body.items {
        if item.quantity <= 0 {
            return Err(AppError::BadRequest(format!(
                "Invalid quantity for item '{}'",
                item.name
            )));
        }
        let unit_amount_cents = parse_price_to_cents(&item.price).ok_or_else(|| {
            AppError::BadRequest(format!("Unparseable price for item '{}'", item.name))
        })?;
        line_items.push(CheckoutLineItem {
            name: item.name.clone(),
            unit_amount_cents,
            quantity: item.quantity,
        });
        order_items.push(CreateOrderItem {
            name: item.name.clone(),
            quantity: item.quantity,
            unit_amount_cents,
            variant: item.variant.clone(),
        });
    }
    // Checked math end to end: a schema-valid cart must not be able to
    // panic the handler or wrap into a garbage amount.
    let mut amount_total_cents: i64 = 0;
    for item in &order_items {
        let line_total = item.total_amount_cents().ok_or_else(|| {
            AppError::BadRequest(format!("Amount out of range for item '{}'", item.name))
        })?;
        amount_total_cents = amount_total_cents.checked_add(line_total).ok_or_else(|| {
            AppError::BadRequest("Cart total is out of range".to_string())
        })?;
    }

    let order_number = gen_order_number();
    let customer = body.customer.unwrap_or_default();
    let shipping_json = body
        .shipping
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?;

    // The metadata bag is the recovery payload: enough to rebuild the whole
    // order from the webhook alone.
    let mut metadata: Vec<(String, String)> = vec![
        ("type".to_string(), "order".to_string()),
        ("order_number".to_string(), order_number.clone()),
        ("items".to_string(), serde_json::to_string(&order_items)?),
    ];
    if let Some(name) = &customer.name {
        metadata.push(("customer_name".to_string(), name.clone()));
    }
    if let Some(email) = &customer.email {
        metadata.push(("customer_email".to_string(), email.clone()));
    }
    if let Some(shipping) = &shipping_json {
        metadata.push(("shipping".to_string(), shipping.clone()));
    }

    let client = StripeClient::new(&stripe.secret_key);
    let session = client
        .create_checkout_session(&CheckoutSessionRequest {
            success_url: format!(
                "{}/shop/success?session_id={{CHECKOUT_SESSION_ID}}",
                state.site_url
            ),
            cancel_url: format!("{}/shop", state.site_url),
            currency: "usd".to_string(),
            customer_email: customer.email.clone(),
            line_items,
            metadata,
            collect_shipping: true,
        })
        .await?;

    let checkout_url = session
        .url
        .clone()
        .ok_or_else(|| AppError::Upstream("Checkout session has no URL".to_string()))?;

    // Best-effort pending record. Log and move on if it fails.
    let pending = CreateOrder {
        order_number: order_number.clone(),
        customer_email: customer.email,
        customer_name: customer.name,
        status: PaidStatus::Pending,
        payment_status: session.payment_status.clone(),
        checkout_session_id: Some(session.id.clone()),
        payment_intent_id: session.payment_intent.clone(),
        amount_total_cents,
        currency: "usd".to_string(),
        shipping_json,
        items: order_items,
    };
    match state.db.get() {
        Ok(mut conn) => {
            if let Err(e) = queries::create_order(&mut conn, &pending) {
                tracing::error!(order_number = %order_number, error = %e,
                    "Failed to persist pending order; webhook recovery will synthesize it");
            }
        }
        Err(e) => {
            tracing::error!(order_number = %order_number, error = %e,
                "No database connection for pending order; webhook recovery will synthesize it");
        }
    }

    tracing::info!(order_number = %order_number, session_id = %session.id,
        "Checkout session created");

    Ok(Json(CheckoutResponse {
        checkout_url,
        order_number,
    }))
}

#[derive(Debug, Deserialize)]
pub struct VerifyQuery {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub struct VerifyOrderResponse {
    pub order_number: String,
    pub status: PaidStatus,
    pub payment_status: Option<String>,
}

/// Report the reconciled state of an order by checkout session id.
///
/// If the webhook has not landed yet and Stripe is configured, re-checks
/// the session directly and reconciles on the spot.
pub async fn verify_order(
    State(state): State<AppState>,
    Query(query): Query<VerifyQuery>,
) -> Result<Json<VerifyOrderResponse>> {
    let order = {
        let conn = state.db.get()?;
        queries::get_order_by_session(&conn, &query.session_id)?
    };

    let order = match (order, &state.stripe) {
        (Some(order), Some(stripe)) if order.status == PaidStatus::Pending => {
            let session = StripeClient::new(&stripe.secret_key)
                .get_checkout_session(&query.session_id)
                .await?;
            if session.payment_status.as_deref() == Some("paid") {
                let mut conn = state.db.get()?;
                reconcile::reconcile_order(&mut conn, &session)?
            } else {
                order
            }
        }
        (Some(order), _) => order,
        (None, _) => return Err(AppError::NotFound(msg::ORDER_NOT_FOUND.to_string())),
    };

    Ok(Json(VerifyOrderResponse {
        order_number: order.order_number,
        status: order.status,
        payment_status: order.payment_status,
    }))
}
