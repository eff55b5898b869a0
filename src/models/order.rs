use serde::{Deserialize, Serialize};

/// Local order/donation lifecycle. The provider's own payment status string
/// is stored alongside, verbatim, in `payment_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaidStatus {
    Pending,
    Paid,
    Cancelled,
}

impl PaidStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaidStatus::Pending => "pending",
            PaidStatus::Paid => "paid",
            PaidStatus::Cancelled => "cancelled",
        }
    }
}

impl std::str::FromStr for PaidStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaidStatus::Pending),
            "paid" => Ok(PaidStatus::Paid),
            "cancelled" => Ok(PaidStatus::Cancelled),
            _ => Err(()),
        }
    }
}

/// A shop customer, upserted by email during checkout/reconciliation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    /// Human-facing unique order number (e.g. `GR-7KQ2M9XT`).
    pub order_number: String,
    pub customer_id: Option<String>,
    pub status: PaidStatus,
    /// Provider payment status string, copied verbatim at reconciliation.
    pub payment_status: Option<String>,
    /// Checkout session id - the reconciliation idempotency key.
    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount_total_cents: i64,
    pub currency: String,
    /// Shipping snapshot captured at checkout time, stored as JSON.
    pub shipping_json: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub name: String,
    pub quantity: i64,
    pub unit_amount_cents: i64,
    pub total_amount_cents: i64,
    pub variant: Option<String>,
}

/// An order together with its line items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderWithItems {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderItem>,
}

/// Input for a pending order created best-effort at checkout time,
/// or synthesized from the session payload by webhook recovery.
#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub order_number: String,
    pub customer_email: Option<String>,
    pub customer_name: Option<String>,
    pub status: PaidStatus,
    pub payment_status: Option<String>,
    pub checkout_session_id: Option<String>,
    pub payment_intent_id: Option<String>,
    pub amount_total_cents: i64,
    pub currency: String,
    pub shipping_json: Option<String>,
    pub items: Vec<CreateOrderItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderItem {
    pub name: String,
    pub quantity: i64,
    pub unit_amount_cents: i64,
    #[serde(default)]
    pub variant: Option<String>,
}

impl CreateOrderItem {
    /// Line total in minor units, or None when it would overflow i64.
    /// Inputs arrive from unauthenticated checkout bodies and from webhook
    /// metadata, so the multiply must not be allowed to panic or wrap.
    pub fn total_amount_cents(&self) -> Option<i64> {
        self.unit_amount_cents.checked_mul(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(unit_amount_cents: i64, quantity: i64) -> CreateOrderItem {
        CreateOrderItem {
            name: "Tour Tee".to_string(),
            quantity,
            unit_amount_cents,
            variant: None,
        }
    }

    #[test]
    fn line_total_multiplies() {
        assert_eq!(item(2499, 2).total_amount_cents(), Some(4998));
    }

    #[test]
    fn line_total_overflow_is_none() {
        assert_eq!(item(i64::MAX, 2).total_amount_cents(), None);
        assert_eq!(item(i64::MAX / 2 + 1, 2).total_amount_cents(), None);
    }
}
