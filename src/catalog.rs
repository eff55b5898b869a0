//! Print-on-demand catalog client.
//!
//! The shop endpoints proxy the provider's product catalog: the site never
//! mirrors products locally, it reshapes the provider's responses into a
//! front-end friendly form on every request.

use serde::{Deserialize, Serialize};

use crate::config::CatalogConfig;
use crate::error::{AppError, Result};
use crate::payments::stripe::parse_price_to_cents;

const CATALOG_API_BASE: &str = "https://api.printful.com";

// Provider wire types, kept private; only the reshaped forms leave this
// module.

#[derive(Debug, Deserialize)]
struct ProviderListResponse {
    result: Vec<ProviderProductSummary>,
}

#[derive(Debug, Deserialize)]
struct ProviderProductSummary {
    id: i64,
    name: String,
    thumbnail_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ProviderDetailResponse {
    result: ProviderProductDetail,
}

#[derive(Debug, Deserialize)]
struct ProviderProductDetail {
    sync_product: ProviderProductSummary,
    #[serde(default)]
    sync_variants: Vec<ProviderVariant>,
}

#[derive(Debug, Deserialize)]
struct ProviderVariant {
    id: i64,
    name: String,
    retail_price: Option<String>,
    currency: Option<String>,
    #[serde(default)]
    files: Vec<ProviderFile>,
}

#[derive(Debug, Deserialize)]
struct ProviderFile {
    #[serde(rename = "type")]
    file_type: Option<String>,
    preview_url: Option<String>,
}

/// Catalog product as served to the front end.
#[derive(Debug, Clone, Serialize)]
pub struct ShopProduct {
    pub id: i64,
    pub name: String,
    pub thumbnail_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopVariant {
    pub id: i64,
    pub name: String,
    /// Display price string as the provider sent it (e.g. "24.99").
    pub price_display: Option<String>,
    /// Price in minor currency units, parsed from the display price.
    pub price_cents: Option<i64>,
    pub currency: Option<String>,
    pub preview_url: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShopProductDetail {
    pub id: i64,
    pub name: String,
    pub thumbnail_url: Option<String>,
    pub variants: Vec<ShopVariant>,
}

/// Thin client over the provider's store API, authenticated with a bearer
/// token.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    api_key: String,
    store_id: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            store_id: config.store_id.clone(),
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(format!("{}{}", CATALOG_API_BASE, path))
            .bearer_auth(&self.api_key);
        if let Some(store_id) = &self.store_id {
            req = req.header("X-PF-Store-Id", store_id);
        }
        req
    }

    pub async fn list_products(&self) -> Result<Vec<ShopProduct>> {
        let body: ProviderListResponse = self.send("/store/products").await?;
        Ok(body
            .result
            .into_iter()
            .map(|p| ShopProduct {
                id: p.id,
                name: p.name,
                thumbnail_url: p.thumbnail_url,
            })
            .collect())
    }

    pub async fn get_product(&self, product_id: i64) -> Result<ShopProductDetail> {
        let body: ProviderDetailResponse =
            self.send(&format!("/store/products/{}", product_id)).await?;
        let detail = body.result;
        let variants = detail
            .sync_variants
            .into_iter()
            .map(|v| {
                let preview_url = v
                    .files
                    .iter()
                    .find(|f| f.file_type.as_deref() == Some("preview"))
                    .and_then(|f| f.preview_url.clone());
                let price_cents = v.retail_price.as_deref().and_then(parse_price_to_cents);
                ShopVariant {
                    id: v.id,
                    name: v.name,
                    price_display: v.retail_price,
                    price_cents,
                    currency: v.currency,
                    preview_url,
                }
            })
            .collect();

        Ok(ShopProductDetail {
            id: detail.sync_product.id,
            name: detail.sync_product.name,
            thumbnail_url: detail.sync_product.thumbnail_url,
            variants,
        })
    }

    async fn send<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .request(path)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Catalog request failed: {}", e)))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(AppError::NotFound("Product not found".to_string()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::Upstream(format!("Catalog response unreadable: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Catalog API error");
            return Err(AppError::Upstream(format!(
                "Catalog provider returned {}",
                status
            )));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Upstream(format!("Unexpected catalog response: {}", e)))
    }
}
