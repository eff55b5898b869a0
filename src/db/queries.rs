use chrono::Utc;
use rusqlite::{params, types::Value, Connection, OptionalExtension};
use subtle::ConstantTimeEq;

use crate::error::{AppError, Result};
use crate::id::EntityType;
use crate::models::*;

use super::from_row::{
    query_all, query_one, FromRow, BLOG_POST_COLS, CUSTOMER_COLS, DONATION_COLS, EPISODE_COLS,
    ORDER_COLS, ORDER_ITEM_COLS, POLL_COLS, POLL_OPTION_COLS, SIGNUP_COLS,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

/// True when the error is a SQLite unique-constraint violation, which the
/// API surfaces as 409 Conflict.
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn map_unique(err: rusqlite::Error, conflict_msg: &str) -> AppError {
    if is_unique_violation(&err) {
        AppError::Conflict(conflict_msg.to_string())
    } else {
        AppError::Database(err)
    }
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
    track_updated_at: bool,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
            track_updated_at: false,
        }
    }

    fn with_updated_at(mut self) -> Self {
        self.track_updated_at = true;
        self
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Execute the update and return the updated entity using RETURNING.
    /// Returns None if no rows matched or there was nothing to update.
    fn execute_returning<T: FromRow>(
        mut self,
        conn: &Connection,
        returning_cols: &str,
    ) -> Result<Option<T>> {
        if self.fields.is_empty() {
            return Ok(None);
        }
        if self.track_updated_at {
            self.fields.push(("updated_at", now().into()));
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? RETURNING {}",
            self.table,
            sets.join(", "),
            returning_cols
        );
        conn.query_row(&sql, rusqlite::params_from_iter(values), T::from_row)
            .optional()
            .map_err(Into::into)
    }
}

// ============ Episodes ============

pub fn create_episode(conn: &Connection, input: &CreateEpisode) -> Result<Episode> {
    let id = EntityType::Episode.gen_id();
    let now = now();
    let genres = serde_json::to_string(&input.genres)?;
    let tags = serde_json::to_string(&input.tags)?;

    conn.execute(
        "INSERT INTO episodes (id, external_id, title, description, runtime_minutes, genres, tags,
                               visibility, access_level, passphrase, video_url, thumbnail_url,
                               status, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
        params![
            &id,
            &input.external_id,
            &input.title,
            &input.description,
            input.runtime_minutes,
            &genres,
            &tags,
            input.visibility.as_str(),
            input.access_level.as_str(),
            &input.passphrase,
            &input.video_url,
            &input.thumbnail_url,
            input.status.as_str(),
            now,
            now,
        ],
    )
    .map_err(|e| map_unique(e, "An episode with this external_id already exists"))?;

    Ok(Episode {
        id,
        external_id: input.external_id.clone(),
        title: input.title.clone(),
        description: input.description.clone(),
        runtime_minutes: input.runtime_minutes,
        genres: input.genres.clone(),
        tags: input.tags.clone(),
        visibility: input.visibility,
        access_level: input.access_level,
        passphrase: input.passphrase.clone(),
        video_url: input.video_url.clone(),
        thumbnail_url: input.thumbnail_url.clone(),
        status: input.status,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_episode_by_id(conn: &Connection, id: &str) -> Result<Option<Episode>> {
    query_one(
        conn,
        &format!("SELECT {} FROM episodes WHERE id = ?1", EPISODE_COLS),
        &[&id],
    )
}

pub fn get_episode_by_external_id(conn: &Connection, external_id: &str) -> Result<Option<Episode>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM episodes WHERE external_id = ?1",
            EPISODE_COLS
        ),
        &[&external_id],
    )
}

/// List episodes, optionally filtered to a visibility bucket.
/// The public surface calls this with `status = published`.
pub fn list_episodes(
    conn: &Connection,
    status: Option<EpisodeStatus>,
    visibility: Option<Visibility>,
) -> Result<Vec<Episode>> {
    match (status, visibility) {
        (Some(s), Some(v)) => query_all(
            conn,
            &format!(
                "SELECT {} FROM episodes WHERE status = ?1 AND visibility = ?2 ORDER BY created_at DESC",
                EPISODE_COLS
            ),
            &[&s.as_str(), &v.as_str()],
        ),
        (Some(s), None) => query_all(
            conn,
            &format!(
                "SELECT {} FROM episodes WHERE status = ?1 ORDER BY created_at DESC",
                EPISODE_COLS
            ),
            &[&s.as_str()],
        ),
        (None, Some(v)) => query_all(
            conn,
            &format!(
                "SELECT {} FROM episodes WHERE visibility = ?1 ORDER BY created_at DESC",
                EPISODE_COLS
            ),
            &[&v.as_str()],
        ),
        (None, None) => query_all(
            conn,
            &format!("SELECT {} FROM episodes ORDER BY created_at DESC", EPISODE_COLS),
            &[],
        ),
    }
}

/// Update an episode. Returns the updated episode, or None if not found.
pub fn update_episode(
    conn: &Connection,
    id: &str,
    input: &UpdateEpisode,
) -> Result<Option<Episode>> {
    let genres = input
        .genres
        .as_ref()
        .map(|g| serde_json::to_string(g))
        .transpose()?;
    let tags = input
        .tags
        .as_ref()
        .map(|t| serde_json::to_string(t))
        .transpose()?;

    UpdateBuilder::new("episodes", id)
        .with_updated_at()
        .set_opt("title", input.title.clone())
        .set_opt("description", input.description.clone())
        .set_opt("runtime_minutes", input.runtime_minutes)
        .set_opt("genres", genres)
        .set_opt("tags", tags)
        .set_opt("visibility", input.visibility.map(|v| v.as_str().to_string()))
        .set_opt("access_level", input.access_level.map(|a| a.as_str().to_string()))
        .set_opt("passphrase", input.passphrase.clone())
        .set_opt("video_url", input.video_url.clone())
        .set_opt("thumbnail_url", input.thumbnail_url.clone())
        .set_opt("status", input.status.map(|s| s.as_str().to_string()))
        .execute_returning(conn, EPISODE_COLS)
}

/// Delete an episode. Polls and their options go with it (FK cascade).
pub fn delete_episode(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM episodes WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Compare a submitted passphrase against the stored one in constant time.
/// Never mutates the episode. An episode without a passphrase never unlocks.
pub fn verify_episode_passphrase(
    conn: &Connection,
    episode_id: &str,
    submitted: &str,
) -> Result<Option<bool>> {
    let stored: Option<Option<String>> = conn
        .query_row(
            "SELECT passphrase FROM episodes WHERE id = ?1",
            params![episode_id],
            |row| row.get(0),
        )
        .optional()?;

    let Some(stored) = stored else {
        return Ok(None); // episode not found
    };

    let unlocked = match stored {
        Some(ref phrase) => {
            let a = phrase.as_bytes();
            let b = submitted.as_bytes();
            // Length is not secret; only the comparison itself must be
            // constant-time.
            a.len() == b.len() && bool::from(a.ct_eq(b))
        }
        None => false,
    };

    Ok(Some(unlocked))
}

// ============ Polls ============

/// Create a poll with its options in one transaction.
/// A poll needs at least two options.
pub fn create_poll(conn: &mut Connection, input: &CreatePoll) -> Result<PollWithOptions> {
    if input.options.len() < 2 {
        return Err(AppError::BadRequest(
            "A poll needs at least two options".into(),
        ));
    }

    let id = EntityType::Poll.gen_id();
    let now = now();
    let duration_days = input.duration_days.unwrap_or(DEFAULT_POLL_DURATION_DAYS);
    if duration_days <= 0 {
        return Err(AppError::BadRequest(
            "Poll duration must be positive".into(),
        ));
    }
    let ends_at = duration_days
        .checked_mul(86400)
        .and_then(|secs| now.checked_add(secs))
        .ok_or_else(|| AppError::BadRequest("Poll duration is too long".into()))?;
    let status = input.status.unwrap_or(PollStatus::Draft);

    let tx = conn.transaction()?;

    tx.execute(
        "INSERT INTO polls (id, episode_id, title, description, status, starts_at, ends_at, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            &id,
            &input.episode_id,
            &input.title,
            &input.description,
            status.as_str(),
            now,
            ends_at,
            now,
            now,
        ],
    )?;

    let mut options = Vec::with_capacity(input.options.len());
    for (order, name) in input.options.iter().enumerate() {
        let option_id = EntityType::PollOption.gen_id();
        tx.execute(
            "INSERT INTO poll_options (id, poll_id, name, vote_count, display_order)
             VALUES (?1, ?2, ?3, 0, ?4)",
            params![&option_id, &id, name, order as i64],
        )?;
        options.push(PollOption {
            id: option_id,
            poll_id: id.clone(),
            name: name.clone(),
            vote_count: 0,
            display_order: order as i64,
        });
    }

    tx.commit()?;

    Ok(PollWithOptions {
        poll: Poll {
            id,
            episode_id: input.episode_id.clone(),
            title: input.title.clone(),
            description: input.description.clone(),
            status,
            starts_at: now,
            ends_at,
            created_at: now,
            updated_at: now,
        },
        options,
    })
}

pub fn get_poll_by_id(conn: &Connection, id: &str) -> Result<Option<Poll>> {
    query_one(
        conn,
        &format!("SELECT {} FROM polls WHERE id = ?1", POLL_COLS),
        &[&id],
    )
}

pub fn get_poll_options(conn: &Connection, poll_id: &str) -> Result<Vec<PollOption>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM poll_options WHERE poll_id = ?1 ORDER BY display_order",
            POLL_OPTION_COLS
        ),
        &[&poll_id],
    )
}

pub fn get_poll_with_options(conn: &Connection, id: &str) -> Result<Option<PollWithOptions>> {
    let Some(poll) = get_poll_by_id(conn, id)? else {
        return Ok(None);
    };
    let options = get_poll_options(conn, id)?;
    Ok(Some(PollWithOptions { poll, options }))
}

pub fn list_polls_by_episode(
    conn: &Connection,
    episode_id: &str,
    status: Option<PollStatus>,
) -> Result<Vec<Poll>> {
    match status {
        Some(s) => query_all(
            conn,
            &format!(
                "SELECT {} FROM polls WHERE episode_id = ?1 AND status = ?2 ORDER BY created_at DESC",
                POLL_COLS
            ),
            &[&episode_id, &s.as_str()],
        ),
        None => query_all(
            conn,
            &format!(
                "SELECT {} FROM polls WHERE episode_id = ?1 ORDER BY created_at DESC",
                POLL_COLS
            ),
            &[&episode_id],
        ),
    }
}

/// The most recently created LIVE poll for an episode - the one votes land on.
pub fn get_latest_live_poll(conn: &Connection, episode_id: &str) -> Result<Option<Poll>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM polls WHERE episode_id = ?1 AND status = 'live'
             ORDER BY created_at DESC, rowid DESC LIMIT 1",
            POLL_COLS
        ),
        &[&episode_id],
    )
}

pub fn update_poll(conn: &Connection, id: &str, input: &UpdatePoll) -> Result<Option<Poll>> {
    UpdateBuilder::new("polls", id)
        .with_updated_at()
        .set_opt("title", input.title.clone())
        .set_opt("description", input.description.clone())
        .set_opt("status", input.status.map(|s| s.as_str().to_string()))
        .set_opt("ends_at", input.ends_at)
        .execute_returning(conn, POLL_COLS)
}

pub fn delete_poll(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM polls WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

/// Apply one vote as a single atomic server-side increment.
///
/// The `poll_id` predicate doubles as the ownership check: an option id from
/// a different poll matches zero rows and no vote is recorded. Concurrent
/// votes cannot lose increments because the read and write are one statement.
pub fn increment_vote(
    conn: &Connection,
    poll_id: &str,
    option_id: &str,
) -> Result<Option<PollOption>> {
    conn.query_row(
        &format!(
            "UPDATE poll_options SET vote_count = vote_count + 1
             WHERE id = ?1 AND poll_id = ?2 RETURNING {}",
            POLL_OPTION_COLS
        ),
        params![option_id, poll_id],
        PollOption::from_row,
    )
    .optional()
    .map_err(Into::into)
}

// ============ Customers ============

/// Upsert a customer by email. A later order with the same email refreshes
/// the stored name instead of creating a second row.
pub fn upsert_customer(conn: &Connection, email: &str, name: Option<&str>) -> Result<Customer> {
    let id = EntityType::Customer.gen_id();
    let now = now();
    let email = email.trim().to_lowercase();

    conn.query_row(
        &format!(
            "INSERT INTO customers (id, email, name, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)
             ON CONFLICT(email) DO UPDATE SET
                 name = COALESCE(excluded.name, customers.name),
                 updated_at = excluded.updated_at
             RETURNING {}",
            CUSTOMER_COLS
        ),
        params![&id, &email, name, now],
        Customer::from_row,
    )
    .map_err(Into::into)
}

pub fn get_customer_by_email(conn: &Connection, email: &str) -> Result<Option<Customer>> {
    let email = email.trim().to_lowercase();
    query_one(
        conn,
        &format!("SELECT {} FROM customers WHERE email = ?1", CUSTOMER_COLS),
        &[&email],
    )
}

// ============ Orders ============

/// Create an order with its items in one transaction.
/// Upserts the customer when an email is present.
pub fn create_order(conn: &mut Connection, input: &CreateOrder) -> Result<OrderWithItems> {
    let id = EntityType::Order.gen_id();
    let now = now();

    let tx = conn.transaction()?;

    let customer_id = match &input.customer_email {
        Some(email) => Some(upsert_customer(&tx, email, input.customer_name.as_deref())?.id),
        None => None,
    };

    tx.execute(
        "INSERT INTO orders (id, order_number, customer_id, status, payment_status,
                             checkout_session_id, payment_intent_id, amount_total_cents,
                             currency, shipping_json, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            &id,
            &input.order_number,
            &customer_id,
            input.status.as_str(),
            &input.payment_status,
            &input.checkout_session_id,
            &input.payment_intent_id,
            input.amount_total_cents,
            &input.currency,
            &input.shipping_json,
            now,
            now,
        ],
    )
    .map_err(|e| map_unique(e, "An order with this number or session already exists"))?;

    let mut items = Vec::with_capacity(input.items.len());
    for item in &input.items {
        let total_amount_cents = item.total_amount_cents().ok_or_else(|| {
            AppError::BadRequest(format!("Amount out of range for item '{}'", item.name))
        })?;
        let item_id = EntityType::OrderItem.gen_id();
        tx.execute(
            "INSERT INTO order_items (id, order_id, name, quantity, unit_amount_cents,
                                      total_amount_cents, variant)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                &item_id,
                &id,
                &item.name,
                item.quantity,
                item.unit_amount_cents,
                total_amount_cents,
                &item.variant,
            ],
        )?;
        items.push(OrderItem {
            id: item_id,
            order_id: id.clone(),
            name: item.name.clone(),
            quantity: item.quantity,
            unit_amount_cents: item.unit_amount_cents,
            total_amount_cents,
            variant: item.variant.clone(),
        });
    }

    tx.commit()?;

    Ok(OrderWithItems {
        order: Order {
            id,
            order_number: input.order_number.clone(),
            customer_id,
            status: input.status,
            payment_status: input.payment_status.clone(),
            checkout_session_id: input.checkout_session_id.clone(),
            payment_intent_id: input.payment_intent_id.clone(),
            amount_total_cents: input.amount_total_cents,
            currency: input.currency.clone(),
            shipping_json: input.shipping_json.clone(),
            created_at: now,
            updated_at: now,
        },
        items,
    })
}

pub fn get_order_by_id(conn: &Connection, id: &str) -> Result<Option<Order>> {
    query_one(
        conn,
        &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLS),
        &[&id],
    )
}

pub fn get_order_by_number(conn: &Connection, order_number: &str) -> Result<Option<Order>> {
    query_one(
        conn,
        &format!("SELECT {} FROM orders WHERE order_number = ?1", ORDER_COLS),
        &[&order_number],
    )
}

pub fn get_order_by_session(conn: &Connection, session_id: &str) -> Result<Option<Order>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM orders WHERE checkout_session_id = ?1",
            ORDER_COLS
        ),
        &[&session_id],
    )
}

pub fn get_order_items(conn: &Connection, order_id: &str) -> Result<Vec<OrderItem>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM order_items WHERE order_id = ?1",
            ORDER_ITEM_COLS
        ),
        &[&order_id],
    )
}

pub fn list_orders(conn: &Connection) -> Result<Vec<Order>> {
    query_all(
        conn,
        &format!("SELECT {} FROM orders ORDER BY created_at DESC", ORDER_COLS),
        &[],
    )
}

/// Mark the order for a checkout session as paid.
///
/// Idempotent by construction: re-delivery of the same completed-session
/// event re-applies the same terminal values. Returns None when no order
/// carries this session id (the recovery path then synthesizes one).
pub fn mark_order_paid(
    conn: &Connection,
    session_id: &str,
    payment_intent_id: Option<&str>,
    payment_status: &str,
) -> Result<Option<Order>> {
    conn.query_row(
        &format!(
            "UPDATE orders SET status = 'paid', payment_status = ?2,
                               payment_intent_id = ?3, updated_at = ?4
             WHERE checkout_session_id = ?1 RETURNING {}",
            ORDER_COLS
        ),
        params![session_id, payment_status, payment_intent_id, now()],
        Order::from_row,
    )
    .optional()
    .map_err(Into::into)
}

// ============ Donations ============

/// Insert a donation row. The caller supplies the id so it can be handed to
/// the payment provider as metadata before the row exists.
pub fn create_donation(conn: &Connection, id: &str, input: &CreateDonation) -> Result<Donation> {
    let now = now();

    conn.execute(
        "INSERT INTO donations (id, tier_id, tier_name, amount_cents, currency, supporter_name,
                                supporter_email, message, status, payment_status,
                                checkout_session_id, payment_intent_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
        params![
            &id,
            &input.tier_id,
            &input.tier_name,
            input.amount_cents,
            &input.currency,
            &input.supporter_name,
            &input.supporter_email,
            &input.message,
            input.status.as_str(),
            &input.payment_status,
            &input.checkout_session_id,
            &input.payment_intent_id,
            now,
            now,
        ],
    )
    .map_err(|e| map_unique(e, "A donation with this session already exists"))?;

    Ok(Donation {
        id: id.to_string(),
        tier_id: input.tier_id.clone(),
        tier_name: input.tier_name.clone(),
        amount_cents: input.amount_cents,
        currency: input.currency.clone(),
        supporter_name: input.supporter_name.clone(),
        supporter_email: input.supporter_email.clone(),
        message: input.message.clone(),
        status: input.status,
        payment_status: input.payment_status.clone(),
        checkout_session_id: input.checkout_session_id.clone(),
        payment_intent_id: input.payment_intent_id.clone(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_donation_by_id(conn: &Connection, id: &str) -> Result<Option<Donation>> {
    query_one(
        conn,
        &format!("SELECT {} FROM donations WHERE id = ?1", DONATION_COLS),
        &[&id],
    )
}

pub fn get_donation_by_session(conn: &Connection, session_id: &str) -> Result<Option<Donation>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM donations WHERE checkout_session_id = ?1",
            DONATION_COLS
        ),
        &[&session_id],
    )
}

pub fn list_donations(conn: &Connection) -> Result<Vec<Donation>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM donations ORDER BY created_at DESC",
            DONATION_COLS
        ),
        &[],
    )
}

/// Donation counterpart of [`mark_order_paid`], same idempotency contract.
pub fn mark_donation_paid(
    conn: &Connection,
    session_id: &str,
    payment_intent_id: Option<&str>,
    payment_status: &str,
) -> Result<Option<Donation>> {
    conn.query_row(
        &format!(
            "UPDATE donations SET status = 'paid', payment_status = ?2,
                                  payment_intent_id = ?3, updated_at = ?4
             WHERE checkout_session_id = ?1 RETURNING {}",
            DONATION_COLS
        ),
        params![session_id, payment_status, payment_intent_id, now()],
        Donation::from_row,
    )
    .optional()
    .map_err(Into::into)
}

// ============ Blog posts ============

pub fn create_blog_post(conn: &Connection, input: &CreateBlogPost) -> Result<BlogPost> {
    let id = EntityType::BlogPost.gen_id();
    let now = now();
    let published_at = input.published_at.unwrap_or(now);

    conn.execute(
        "INSERT INTO blog_posts (id, slug, title, excerpt, body, cover_image_url, published_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            &id,
            &input.slug,
            &input.title,
            &input.excerpt,
            &input.body,
            &input.cover_image_url,
            published_at,
            now,
        ],
    )
    .map_err(|e| map_unique(e, "A post with this slug already exists"))?;

    Ok(BlogPost {
        id,
        slug: input.slug.clone(),
        title: input.title.clone(),
        excerpt: input.excerpt.clone(),
        body: input.body.clone(),
        cover_image_url: input.cover_image_url.clone(),
        published_at,
        created_at: now,
    })
}

pub fn get_blog_post_by_slug(conn: &Connection, slug: &str) -> Result<Option<BlogPost>> {
    query_one(
        conn,
        &format!("SELECT {} FROM blog_posts WHERE slug = ?1", BLOG_POST_COLS),
        &[&slug],
    )
}

/// Published posts, newest first. Posts dated in the future stay hidden.
pub fn list_published_posts(conn: &Connection) -> Result<Vec<BlogPost>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM blog_posts WHERE published_at <= ?1 ORDER BY published_at DESC",
            BLOG_POST_COLS
        ),
        &[&now()],
    )
}

// ============ Signups ============

pub fn create_signup(conn: &Connection, email: &str) -> Result<Signup> {
    let id = EntityType::Signup.gen_id();
    let now = now();
    let email = email.trim().to_lowercase();

    conn.execute(
        "INSERT INTO signups (id, email, created_at) VALUES (?1, ?2, ?3)",
        params![&id, &email, now],
    )
    .map_err(|e| map_unique(e, crate::error::msg::EMAIL_ALREADY_SIGNED_UP))?;

    Ok(Signup {
        id,
        email,
        created_at: now,
    })
}

pub fn get_signup_by_email(conn: &Connection, email: &str) -> Result<Option<Signup>> {
    let email = email.trim().to_lowercase();
    query_one(
        conn,
        &format!("SELECT {} FROM signups WHERE email = ?1", SIGNUP_COLS),
        &[&email],
    )
}

// ============ Social clicks ============

/// Record one click on a social link. Same single-statement increment as
/// votes, seeding the row on first click.
pub fn record_social_click(conn: &Connection, platform: &str) -> Result<SocialClick> {
    conn.query_row(
        "INSERT INTO social_clicks (platform, click_count) VALUES (?1, 1)
         ON CONFLICT(platform) DO UPDATE SET click_count = click_count + 1
         RETURNING platform, click_count",
        params![platform],
        SocialClick::from_row,
    )
    .map_err(Into::into)
}
