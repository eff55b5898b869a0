use axum::extract::State;
use serde::Serialize;

use crate::catalog::{CatalogClient, ShopProduct, ShopProductDetail};
use crate::db::AppState;
use crate::error::{msg, AppError, Result};
use crate::extractors::{Json, Path};

fn catalog_client(state: &AppState) -> Result<CatalogClient> {
    state
        .catalog
        .as_ref()
        .map(CatalogClient::new)
        .ok_or_else(|| AppError::NotConfigured(msg::CATALOG_NOT_CONFIGURED.to_string()))
}

#[derive(Debug, Serialize)]
pub struct ProductsResponse {
    pub products: Vec<ShopProduct>,
}

pub async fn list_products(State(state): State<AppState>) -> Result<Json<ProductsResponse>> {
    let client = catalog_client(&state)?;
    let products = client.list_products().await?;
    Ok(Json(ProductsResponse { products }))
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: ShopProductDetail,
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ProductResponse>> {
    let client = catalog_client(&state)?;
    let product = client.get_product(id).await?;
    Ok(Json(ProductResponse { product }))
}
