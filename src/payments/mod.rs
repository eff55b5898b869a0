//! Payment provider integration (Stripe Checkout).

pub mod stripe;
