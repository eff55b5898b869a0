use axum::extract::State;
use serde::Serialize;

use crate::db::{queries, AppState};
use crate::error::Result;
use crate::extractors::Json;
use crate::models::{Donation, OrderWithItems};

#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<OrderWithItems>,
}

pub async fn list_orders(State(state): State<AppState>) -> Result<Json<OrdersResponse>> {
    let conn = state.db.get()?;
    let orders = queries::list_orders(&conn)?;
    let mut with_items = Vec::with_capacity(orders.len());
    for order in orders {
        let items = queries::get_order_items(&conn, &order.id)?;
        with_items.push(OrderWithItems { order, items });
    }
    Ok(Json(OrdersResponse { orders: with_items }))
}

#[derive(Debug, Serialize)]
pub struct DonationsResponse {
    pub donations: Vec<Donation>,
}

pub async fn list_donations(State(state): State<AppState>) -> Result<Json<DonationsResponse>> {
    let conn = state.db.get()?;
    let donations = queries::list_donations(&conn)?;
    Ok(Json(DonationsResponse { donations }))
}
