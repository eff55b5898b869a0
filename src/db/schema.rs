use rusqlite::Connection;

/// Initialize the database schema.
pub fn init_db(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        PRAGMA foreign_keys = ON;

        -- Premiere episodes. genres/tags are JSON arrays; the passphrase is
        -- a plaintext presentation gate, never returned by public endpoints.
        CREATE TABLE IF NOT EXISTS episodes (
            id TEXT PRIMARY KEY,
            external_id TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            description TEXT,
            runtime_minutes INTEGER,
            genres TEXT NOT NULL DEFAULT '[]',
            tags TEXT NOT NULL DEFAULT '[]',
            visibility TEXT NOT NULL CHECK (visibility IN ('available', 'upcoming', 'locked', 'draft', 'archived')),
            access_level TEXT NOT NULL CHECK (access_level IN ('free', 'premium', 'vip')),
            passphrase TEXT,
            video_url TEXT,
            thumbnail_url TEXT,
            status TEXT NOT NULL CHECK (status IN ('draft', 'published')),
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_episodes_status ON episodes(status);
        CREATE INDEX IF NOT EXISTS idx_episodes_visibility ON episodes(visibility);

        -- Audience polls. Deleting an episode removes its polls.
        CREATE TABLE IF NOT EXISTS polls (
            id TEXT PRIMARY KEY,
            episode_id TEXT NOT NULL REFERENCES episodes(id) ON DELETE CASCADE,
            title TEXT NOT NULL,
            description TEXT,
            status TEXT NOT NULL CHECK (status IN ('draft', 'live', 'ended', 'archived')),
            starts_at INTEGER NOT NULL,
            ends_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_polls_episode ON polls(episode_id);
        CREATE INDEX IF NOT EXISTS idx_polls_episode_status ON polls(episode_id, status, created_at DESC);

        CREATE TABLE IF NOT EXISTS poll_options (
            id TEXT PRIMARY KEY,
            poll_id TEXT NOT NULL REFERENCES polls(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            vote_count INTEGER NOT NULL DEFAULT 0,
            display_order INTEGER NOT NULL DEFAULT 0
        );
        CREATE INDEX IF NOT EXISTS idx_poll_options_poll ON poll_options(poll_id, display_order);

        -- Shop customers, upserted by email.
        CREATE TABLE IF NOT EXISTS customers (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_customers_email ON customers(email);

        -- Orders. checkout_session_id is the reconciliation idempotency key.
        CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY,
            order_number TEXT NOT NULL UNIQUE,
            customer_id TEXT REFERENCES customers(id),
            status TEXT NOT NULL CHECK (status IN ('pending', 'paid', 'cancelled')),
            payment_status TEXT,
            checkout_session_id TEXT,
            payment_intent_id TEXT,
            amount_total_cents INTEGER NOT NULL DEFAULT 0,
            currency TEXT NOT NULL DEFAULT 'usd',
            shipping_json TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_orders_session ON orders(checkout_session_id) WHERE checkout_session_id IS NOT NULL;
        CREATE INDEX IF NOT EXISTS idx_orders_customer ON orders(customer_id);

        CREATE TABLE IF NOT EXISTS order_items (
            id TEXT PRIMARY KEY,
            order_id TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            name TEXT NOT NULL,
            quantity INTEGER NOT NULL,
            unit_amount_cents INTEGER NOT NULL,
            total_amount_cents INTEGER NOT NULL,
            variant TEXT
        );
        CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id);

        -- Donations share the order reconciliation shape, minus items.
        CREATE TABLE IF NOT EXISTS donations (
            id TEXT PRIMARY KEY,
            tier_id TEXT NOT NULL,
            tier_name TEXT NOT NULL,
            amount_cents INTEGER NOT NULL,
            currency TEXT NOT NULL DEFAULT 'usd',
            supporter_name TEXT,
            supporter_email TEXT,
            message TEXT,
            status TEXT NOT NULL CHECK (status IN ('pending', 'paid', 'cancelled')),
            payment_status TEXT,
            checkout_session_id TEXT,
            payment_intent_id TEXT,
            created_at INTEGER NOT NULL,
            updated_at INTEGER NOT NULL
        );
        CREATE UNIQUE INDEX IF NOT EXISTS idx_donations_session ON donations(checkout_session_id) WHERE checkout_session_id IS NOT NULL;

        CREATE TABLE IF NOT EXISTS blog_posts (
            id TEXT PRIMARY KEY,
            slug TEXT NOT NULL UNIQUE,
            title TEXT NOT NULL,
            excerpt TEXT,
            body TEXT,
            cover_image_url TEXT,
            published_at INTEGER NOT NULL,
            created_at INTEGER NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_blog_posts_published ON blog_posts(published_at DESC);

        -- Secret-drop mailing list.
        CREATE TABLE IF NOT EXISTS signups (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            created_at INTEGER NOT NULL
        );

        -- Social-link click counters, incremented server-side in one statement.
        CREATE TABLE IF NOT EXISTS social_clicks (
            platform TEXT PRIMARY KEY,
            click_count INTEGER NOT NULL DEFAULT 0
        );
        "#,
    )?;
    Ok(())
}
