//! Row mapping trait and helpers for reducing boilerplate in queries.
//!
//! This module provides a `FromRow` trait that models can implement to
//! define how they are constructed from database rows, plus helper functions
//! for common query patterns.

use rusqlite::{Connection, OptionalExtension, Row, ToSql};

use crate::models::*;

/// Parse a string column into an enum type, converting parse errors to
/// rusqlite errors instead of panicking on invalid stored values.
fn parse_enum<T: std::str::FromStr>(row: &Row, col: usize, col_name: &str) -> rusqlite::Result<T> {
    row.get::<_, String>(col)?.parse::<T>().map_err(|_| {
        rusqlite::Error::InvalidColumnType(col, col_name.to_string(), rusqlite::types::Type::Text)
    })
}

/// Trait for constructing a type from a database row.
pub trait FromRow: Sized {
    fn from_row(row: &Row) -> rusqlite::Result<Self>;
}

/// Query for a single optional result.
pub fn query_one<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Option<T>> {
    conn.query_row(sql, params, T::from_row)
        .optional()
        .map_err(Into::into)
}

/// Query for multiple results.
pub fn query_all<T: FromRow>(
    conn: &Connection,
    sql: &str,
    params: &[&dyn ToSql],
) -> crate::error::Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, T::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}

// ============ SQL SELECT Constants ============

pub const EPISODE_COLS: &str = "id, external_id, title, description, runtime_minutes, genres, tags, visibility, access_level, passphrase, video_url, thumbnail_url, status, created_at, updated_at";

pub const POLL_COLS: &str =
    "id, episode_id, title, description, status, starts_at, ends_at, created_at, updated_at";

pub const POLL_OPTION_COLS: &str = "id, poll_id, name, vote_count, display_order";

pub const CUSTOMER_COLS: &str = "id, email, name, created_at, updated_at";

pub const ORDER_COLS: &str = "id, order_number, customer_id, status, payment_status, checkout_session_id, payment_intent_id, amount_total_cents, currency, shipping_json, created_at, updated_at";

pub const ORDER_ITEM_COLS: &str =
    "id, order_id, name, quantity, unit_amount_cents, total_amount_cents, variant";

pub const DONATION_COLS: &str = "id, tier_id, tier_name, amount_cents, currency, supporter_name, supporter_email, message, status, payment_status, checkout_session_id, payment_intent_id, created_at, updated_at";

pub const BLOG_POST_COLS: &str =
    "id, slug, title, excerpt, body, cover_image_url, published_at, created_at";

pub const SIGNUP_COLS: &str = "id, email, created_at";

// ============ FromRow Implementations ============

impl FromRow for Episode {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let genres: String = row.get(5)?;
        let tags: String = row.get(6)?;
        Ok(Episode {
            id: row.get(0)?,
            external_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            runtime_minutes: row.get(4)?,
            genres: serde_json::from_str(&genres).unwrap_or_default(),
            tags: serde_json::from_str(&tags).unwrap_or_default(),
            visibility: parse_enum(row, 7, "visibility")?,
            access_level: parse_enum(row, 8, "access_level")?,
            passphrase: row.get(9)?,
            video_url: row.get(10)?,
            thumbnail_url: row.get(11)?,
            status: parse_enum(row, 12, "status")?,
            created_at: row.get(13)?,
            updated_at: row.get(14)?,
        })
    }
}

impl FromRow for Poll {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Poll {
            id: row.get(0)?,
            episode_id: row.get(1)?,
            title: row.get(2)?,
            description: row.get(3)?,
            status: parse_enum(row, 4, "status")?,
            starts_at: row.get(5)?,
            ends_at: row.get(6)?,
            created_at: row.get(7)?,
            updated_at: row.get(8)?,
        })
    }
}

impl FromRow for PollOption {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(PollOption {
            id: row.get(0)?,
            poll_id: row.get(1)?,
            name: row.get(2)?,
            vote_count: row.get(3)?,
            display_order: row.get(4)?,
        })
    }
}

impl FromRow for Customer {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Customer {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl FromRow for Order {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Order {
            id: row.get(0)?,
            order_number: row.get(1)?,
            customer_id: row.get(2)?,
            status: parse_enum(row, 3, "status")?,
            payment_status: row.get(4)?,
            checkout_session_id: row.get(5)?,
            payment_intent_id: row.get(6)?,
            amount_total_cents: row.get(7)?,
            currency: row.get(8)?,
            shipping_json: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }
}

impl FromRow for OrderItem {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(OrderItem {
            id: row.get(0)?,
            order_id: row.get(1)?,
            name: row.get(2)?,
            quantity: row.get(3)?,
            unit_amount_cents: row.get(4)?,
            total_amount_cents: row.get(5)?,
            variant: row.get(6)?,
        })
    }
}

impl FromRow for Donation {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Donation {
            id: row.get(0)?,
            tier_id: row.get(1)?,
            tier_name: row.get(2)?,
            amount_cents: row.get(3)?,
            currency: row.get(4)?,
            supporter_name: row.get(5)?,
            supporter_email: row.get(6)?,
            message: row.get(7)?,
            status: parse_enum(row, 8, "status")?,
            payment_status: row.get(9)?,
            checkout_session_id: row.get(10)?,
            payment_intent_id: row.get(11)?,
            created_at: row.get(12)?,
            updated_at: row.get(13)?,
        })
    }
}

impl FromRow for BlogPost {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(BlogPost {
            id: row.get(0)?,
            slug: row.get(1)?,
            title: row.get(2)?,
            excerpt: row.get(3)?,
            body: row.get(4)?,
            cover_image_url: row.get(5)?,
            published_at: row.get(6)?,
            created_at: row.get(7)?,
        })
    }
}

impl FromRow for Signup {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Signup {
            id: row.get(0)?,
            email: row.get(1)?,
            created_at: row.get(2)?,
        })
    }
}

impl FromRow for SocialClick {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(SocialClick {
            platform: row.get(0)?,
            click_count: row.get(1)?,
        })
    }
}
