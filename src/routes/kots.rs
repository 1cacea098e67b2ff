use axum::{
    Json, Router,
    extract::State,
    routing::{delete, get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::{
        kots::{CancelKotItemsRequest, CanceledItemList, CreateKotRequest, DailyItemList},
        stock::ItemQuantityList,
    },
    error::AppResult,
    models::Kot,
    response::MessageResponse,
    routes::params::{AppJson, AppPath},
    services::kot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/kotOrder/{tableId}", post(create_kot))
        .route("/kot/{tableId}", get(latest_kot))
        .route("/kot/settle/{tableId}", patch(settle_kots))
        .route("/{tableId}", delete(cancel_kot_items))
        .route("/items/quantity", get(top_items_today))
        .route("/items", get(daily_items))
        .route("/cancel-items", get(daily_canceled_items))
}

#[utoipa::path(
    post,
    path = "/api/kot/kotOrder/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    request_body = CreateKotRequest,
    responses(
        (status = 200, description = "Ticket sent to the kitchen", body = Kot),
        (status = 400, description = "Invalid body"),
    ),
    tag = "KOT"
)]
pub async fn create_kot(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateKotRequest>,
) -> AppResult<Json<Kot>> {
    Ok(Json(
        kot_service::create_ticket(&state, table_id, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/kot/kot/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    responses(
        (status = 200, description = "Newest ticket with live lines only", body = Kot),
        (status = 404, description = "KOT not found"),
    ),
    tag = "KOT"
)]
pub async fn latest_kot(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
) -> AppResult<Json<Kot>> {
    Ok(Json(kot_service::latest_ticket(&state, table_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/kot/kot/settle/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    responses((status = 200, description = "All tickets of the table settled", body = MessageResponse)),
    tag = "KOT"
)]
pub async fn settle_kots(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(kot_service::settle(&state, table_id).await?))
}

#[utoipa::path(
    delete,
    path = "/api/kot/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    request_body = CancelKotItemsRequest,
    responses(
        (status = 200, description = "Named lines canceled on tickets and the open order", body = MessageResponse),
        (status = 404, description = "No unsettled tickets for the table"),
    ),
    tag = "KOT"
)]
pub async fn cancel_kot_items(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CancelKotItemsRequest>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(
        kot_service::cancel_items(&state, table_id, payload.canceled_item_names).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/kot/items/quantity",
    responses((status = 200, description = "Four busiest items today", body = ItemQuantityList)),
    tag = "KOT"
)]
pub async fn top_items_today(State(state): State<AppState>) -> AppResult<Json<ItemQuantityList>> {
    let items = kot_service::top_items_today(&state).await?;
    Ok(Json(ItemQuantityList { items }))
}

#[utoipa::path(
    get,
    path = "/api/kot/items",
    responses((status = 200, description = "Daily quantities of live ticket lines", body = DailyItemList)),
    tag = "KOT"
)]
pub async fn daily_items(State(state): State<AppState>) -> AppResult<Json<DailyItemList>> {
    let items = kot_service::daily_item_quantities(&state.orm, false).await?;
    Ok(Json(DailyItemList { items }))
}

#[utoipa::path(
    get,
    path = "/api/kot/cancel-items",
    responses((status = 200, description = "Daily quantities of canceled ticket lines", body = CanceledItemList)),
    tag = "KOT"
)]
pub async fn daily_canceled_items(
    State(state): State<AppState>,
) -> AppResult<Json<CanceledItemList>> {
    let canceled_items = kot_service::daily_item_quantities(&state.orm, true).await?;
    Ok(Json(CanceledItemList { canceled_items }))
}
