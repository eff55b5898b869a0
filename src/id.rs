//! Prefixed ID generation for Greenroom entities.
//!
//! All IDs use a `gr_` brand prefix to guarantee collision avoidance with
//! payment provider IDs (Stripe's `cs_`, `pi_`, `cus_`, etc.).
//!
//! Format: `gr_{entity}_{uuid_simple}` (32 hex chars, no hyphens)

use rand::Rng;
use uuid::Uuid;

/// Entity types that have prefixed IDs in Greenroom.
#[derive(Debug, Clone, Copy)]
pub enum EntityType {
    Episode,
    Poll,
    PollOption,
    Customer,
    Order,
    OrderItem,
    Donation,
    BlogPost,
    Signup,
}

impl EntityType {
    /// Returns the prefix for this entity type.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Episode => "gr_ep",
            Self::Poll => "gr_poll",
            Self::PollOption => "gr_opt",
            Self::Customer => "gr_cust",
            Self::Order => "gr_ord",
            Self::OrderItem => "gr_item",
            Self::Donation => "gr_don",
            Self::BlogPost => "gr_post",
            Self::Signup => "gr_sig",
        }
    }

    /// Generates a new prefixed ID for this entity type.
    pub fn gen_id(&self) -> String {
        format!("{}_{}", self.prefix(), Uuid::new_v4().as_simple())
    }
}

/// Alphabet for human-facing order numbers. Skips 0/O and 1/I to keep the
/// numbers readable over email and support chats.
const ORDER_NUMBER_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Generate a human-facing order number like `GR-7KQ2M9XT`.
///
/// Random, not guaranteed globally unique beyond the orders table's unique
/// constraint; collisions surface as a constraint violation at insert time.
pub fn gen_order_number() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..8)
        .map(|_| {
            let idx = rng.gen_range(0..ORDER_NUMBER_ALPHABET.len());
            ORDER_NUMBER_ALPHABET[idx] as char
        })
        .collect();
    format!("GR-{}", suffix)
}
