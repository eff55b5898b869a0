//! Reconciliation of completed checkout sessions into local records.
//!
//! Two paths per record kind:
//! - the pending row exists: flip it to paid (idempotent re-application)
//! - the pending row is missing: synthesize a paid record from the session
//!   payload and the metadata bag we attached at checkout time
//!
//! Either way exactly one paid record exists afterwards; the unique index
//! on `checkout_session_id` backstops concurrent deliveries.

use rusqlite::Connection;

use crate::db::queries;
use crate::error::{AppError, Result};
use crate::id::{gen_order_number, EntityType};
use crate::models::{CreateDonation, CreateOrder, CreateOrderItem, Donation, Order, PaidStatus};
use crate::payments::stripe::StripeCheckoutSession;

pub fn reconcile_order(conn: &mut Connection, session: &StripeCheckoutSession) -> Result<Order> {
    let payment_status = session.payment_status.as_deref().unwrap_or("paid");

    if let Some(order) = queries::mark_order_paid(
        conn,
        &session.id,
        session.payment_intent.as_deref(),
        payment_status,
    )? {
        tracing::info!(order_number = %order.order_number, session_id = %session.id,
            "Order marked paid");
        return Ok(order);
    }

    // No pending row: the best-effort insert at checkout time failed or
    // never ran. Rebuild the order from the session itself.
    let meta = &session.metadata;
    let items: Vec<CreateOrderItem> = match meta.get("items") {
        Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
            tracing::warn!(session_id = %session.id, error = %e,
                "Unparseable items metadata; synthesizing order without line items");
            Vec::new()
        }),
        None => Vec::new(),
    };
    let order_number = meta
        .get("order_number")
        .cloned()
        .unwrap_or_else(gen_order_number);
    let customer_email = session
        .customer_details
        .as_ref()
        .and_then(|c| c.email.clone())
        .or_else(|| meta.get("customer_email").cloned());
    let customer_name = session
        .customer_details
        .as_ref()
        .and_then(|c| c.name.clone())
        .or_else(|| meta.get("customer_name").cloned());
    let shipping_json = session
        .shipping_details
        .as_ref()
        .map(serde_json::to_string)
        .transpose()?
        .or_else(|| meta.get("shipping").cloned());
    let amount_total_cents = match session.amount_total {
        Some(total) => total,
        None => items
            .iter()
            .try_fold(0i64, |acc, item| {
                item.total_amount_cents().and_then(|t| acc.checked_add(t))
            })
            .unwrap_or(0),
    };

    let input = CreateOrder {
        order_number: order_number.clone(),
        customer_email,
        customer_name,
        status: PaidStatus::Paid,
        payment_status: Some(payment_status.to_string()),
        checkout_session_id: Some(session.id.clone()),
        payment_intent_id: session.payment_intent.clone(),
        amount_total_cents,
        currency: session.currency.clone().unwrap_or_else(|| "usd".to_string()),
        shipping_json,
        items,
    };

    match queries::create_order(conn, &input) {
        Ok(created) => {
            tracing::warn!(order_number = %order_number, session_id = %session.id,
                "No pending order found; synthesized paid order from session");
            Ok(created.order)
        }
        // A concurrent delivery inserted the row between our lookup and the
        // insert. Re-apply the paid transition to whichever row won.
        Err(AppError::Conflict(_)) => queries::mark_order_paid(
            conn,
            &session.id,
            session.payment_intent.as_deref(),
            payment_status,
        )?
        .ok_or_else(|| {
            AppError::Internal("Order vanished during concurrent reconciliation".to_string())
        }),
        Err(e) => Err(e),
    }
}

pub fn reconcile_donation(conn: &Connection, session: &StripeCheckoutSession) -> Result<Donation> {
    let payment_status = session.payment_status.as_deref().unwrap_or("paid");

    if let Some(donation) = queries::mark_donation_paid(
        conn,
        &session.id,
        session.payment_intent.as_deref(),
        payment_status,
    )? {
        tracing::info!(donation_id = %donation.id, session_id = %session.id,
            "Donation marked paid");
        return Ok(donation);
    }

    let meta = &session.metadata;
    let donation_id = meta
        .get("donation_id")
        .cloned()
        .unwrap_or_else(|| EntityType::Donation.gen_id());
    let supporter_email = session
        .customer_details
        .as_ref()
        .and_then(|c| c.email.clone());
    let supporter_name = session
        .customer_details
        .as_ref()
        .and_then(|c| c.name.clone())
        .or_else(|| meta.get("supporter_name").cloned());

    let input = CreateDonation {
        tier_id: meta.get("tier_id").cloned().unwrap_or_else(|| "custom".to_string()),
        tier_name: meta
            .get("tier_name")
            .cloned()
            .unwrap_or_else(|| "Donation".to_string()),
        amount_cents: session.amount_total.unwrap_or(0),
        currency: session.currency.clone().unwrap_or_else(|| "usd".to_string()),
        supporter_name,
        supporter_email,
        message: meta.get("message").cloned(),
        status: PaidStatus::Paid,
        payment_status: Some(payment_status.to_string()),
        checkout_session_id: Some(session.id.clone()),
        payment_intent_id: session.payment_intent.clone(),
    };

    match queries::create_donation(conn, &donation_id, &input) {
        Ok(donation) => {
            tracing::warn!(donation_id = %donation.id, session_id = %session.id,
                "No pending donation found; synthesized paid donation from session");
            Ok(donation)
        }
        Err(AppError::Conflict(_)) => queries::mark_donation_paid(
            conn,
            &session.id,
            session.payment_intent.as_deref(),
            payment_status,
        )?
        .ok_or_else(|| {
            AppError::Internal("Donation vanished during concurrent reconciliation".to_string())
        }),
        Err(e) => Err(e),
    }
}
