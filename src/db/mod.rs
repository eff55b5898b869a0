mod from_row;
pub mod queries;
mod schema;

pub use schema::init_db;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::config::{CatalogConfig, StripeConfig};

pub type DbPool = Pool<SqliteConnectionManager>;

/// Application state holding the database pool and runtime configuration.
/// Constructed once at startup and shared by reference across requests.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    /// Base URL of this API (for callback URLs).
    pub base_url: String,
    /// Front-end URL the payment processor redirects to after checkout.
    pub site_url: String,
    /// Admin bearer token; `None` disables the admin surface.
    pub admin_token: Option<String>,
    /// Stripe credentials; `None` degrades payment endpoints to
    /// "not configured" errors.
    pub stripe: Option<StripeConfig>,
    /// Print-on-demand catalog credentials.
    pub catalog: Option<CatalogConfig>,
}

pub fn create_pool(database_path: &str) -> Result<DbPool, r2d2::Error> {
    let manager = SqliteConnectionManager::file(database_path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    Pool::builder().max_size(10).build(manager)
}
