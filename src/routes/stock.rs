use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::stock::{AvailableQuantity, ItemQuantity, RemainingQuantity},
    error::{AppError, AppResult},
    models::StockLevel,
    routes::params::{AppQuery, AvailableQuantityQuery, TopConsumedQuery},
    services::stock_ledger,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/low-stock", get(low_stock))
        .route("/items/quantity", get(available_quantity))
        .route("/items/remainingQuantity", get(remaining_quantities))
        .route("/items/top-consumed", get(top_consumed))
}

#[utoipa::path(
    get,
    path = "/api/item/low-stock",
    responses(
        (status = 200, description = "Items at or below their low-stock threshold", body = Vec<StockLevel>),
        (status = 404, description = "No items found with low stock"),
    ),
    tag = "Stock"
)]
pub async fn low_stock(State(state): State<AppState>) -> AppResult<Json<Vec<StockLevel>>> {
    let items = stock_ledger::low_stock(&state.orm).await?;
    if items.is_empty() {
        return Err(AppError::NotFound("No items found with low stock.".into()));
    }
    Ok(Json(items))
}

#[utoipa::path(
    get,
    path = "/api/item/items/quantity",
    params(AvailableQuantityQuery),
    responses((status = 200, description = "Warehouse quantity of one item", body = AvailableQuantity)),
    tag = "Stock"
)]
pub async fn available_quantity(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AvailableQuantityQuery>,
) -> AppResult<Json<AvailableQuantity>> {
    Ok(Json(
        stock_ledger::available_quantity(&state.orm, &query.product_name).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/item/items/remainingQuantity",
    responses((status = 200, description = "Warehouse quantity of every tracked item", body = Vec<RemainingQuantity>)),
    tag = "Stock"
)]
pub async fn remaining_quantities(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<RemainingQuantity>>> {
    Ok(Json(stock_ledger::remaining_quantities(&state.orm).await?))
}

#[utoipa::path(
    get,
    path = "/api/item/items/top-consumed",
    params(TopConsumedQuery),
    responses(
        (status = 200, description = "Items sent to the kitchen most often in the range", body = Vec<ItemQuantity>),
        (status = 400, description = "Malformed date"),
    ),
    tag = "Stock"
)]
pub async fn top_consumed(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TopConsumedQuery>,
) -> AppResult<Json<Vec<ItemQuantity>>> {
    let (start, end) = query.bounds(state.day_boundary.today());
    Ok(Json(
        stock_ledger::top_consumed(&state.orm, start, end, query.limit()).await?,
    ))
}
