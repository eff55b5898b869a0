use std::env;

/// Stripe credentials loaded from the environment.
///
/// Absent credentials leave this as `None` and the checkout/webhook
/// endpoints respond with a clean "not configured" error instead of
/// panicking at startup.
#[derive(Debug, Clone)]
pub struct StripeConfig {
    pub secret_key: String,
    pub webhook_secret: String,
}

/// Print-on-demand catalog credentials.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub api_key: String,
    pub store_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: String,
    pub base_url: String,
    /// Front-end URL the payment processor redirects to after checkout.
    pub site_url: String,
    pub admin_token: Option<String>,
    pub stripe: Option<StripeConfig>,
    pub catalog: Option<CatalogConfig>,
    pub dev_mode: bool,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let dev_mode = env::var("GREENROOM_ENV")
            .map(|v| v == "dev" || v == "development")
            .unwrap_or(false);

        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        let base_url =
            env::var("BASE_URL").unwrap_or_else(|_| format!("http://{}:{}", host, port));
        let site_url = env::var("SITE_URL").unwrap_or_else(|_| base_url.clone());

        // Stripe is configured only when both keys are present; a partial
        // configuration is treated as unconfigured and logged.
        let stripe = match (
            env::var("STRIPE_SECRET_KEY").ok(),
            env::var("STRIPE_WEBHOOK_SECRET").ok(),
        ) {
            (Some(secret_key), Some(webhook_secret)) => Some(StripeConfig {
                secret_key,
                webhook_secret,
            }),
            (None, None) => None,
            _ => {
                tracing::warn!(
                    "Partial Stripe configuration (need both STRIPE_SECRET_KEY and STRIPE_WEBHOOK_SECRET); payments disabled"
                );
                None
            }
        };

        let catalog = env::var("CATALOG_API_KEY").ok().map(|api_key| CatalogConfig {
            api_key,
            store_id: env::var("CATALOG_STORE_ID").ok(),
        });

        Self {
            host,
            port,
            database_path: env::var("DATABASE_PATH")
                .unwrap_or_else(|_| "greenroom.db".to_string()),
            base_url,
            site_url,
            admin_token: env::var("ADMIN_TOKEN").ok(),
            stripe,
            catalog,
            dev_mode,
        }
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
