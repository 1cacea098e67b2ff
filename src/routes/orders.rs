use axum::{
    Json, Router,
    extract::State,
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::{
        orders::{
            CreateOrderRequest, MergeResult, MergeTablesRequest, OrderWithTableName,
            UpdateOrderRequest,
        },
        reports::{
            MenuStatistics, MenuwiseSummary, NextOrderNumber, PaymentSummary,
            TemporaryOrdersCount, TotalAmountsByMonth, TotalForCurrentDate,
            TotalForPreviousMonth,
        },
    },
    error::AppResult,
    models::Order,
    response::MessageResponse,
    routes::params::{AppJson, AppPath, AppQuery, DateRangeQuery, MenuwiseQuery},
    services::{merge_service, order_service, report_service, sequence, settlement_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/order/{id}",
            get(open_orders_for_table)
                .post(create_order)
                .delete(delete_order),
        )
        .route(
            "/order/update-order-by-table/{tableId}",
            patch(update_order_by_table),
        )
        .route("/update-order-by-id/{orderId}", patch(update_order_by_id))
        .route(
            "/update-order-by-number/{orderNumber}",
            patch(update_order_by_number),
        )
        .route("/orders", get(list_orders))
        .route("/orders/date", get(finalized_orders))
        .route("/merge/date", get(merged_orders))
        .route("/menu-statistics", get(menu_statistics))
        .route("/get/order/{orderNumber}", get(get_order_by_number))
        .route("/latest-orders", get(latest_orders))
        .route("/orders/list/menuwise", get(menuwise))
        .route("/get-next-order-number", get(next_order_number))
        .route("/temporary-orders-count", get(temporary_orders_count))
        .route("/total-amount-for-current-date", get(total_for_current_date))
        .route(
            "/total-amount-for-previous-month",
            get(total_for_previous_month),
        )
        .route("/total-amounts-by-month", get(totals_by_month))
        .route("/summary", get(payment_summary))
        .route("/savedBills/{tableId}", get(saved_bills))
        .route("/mergeTables", patch(merge_tables))
        .route("/orders/flag", put(apply_settlement))
        .route("/order/update-flag/{orderNumber}", put(mark_for_settle))
}

#[utoipa::path(
    post,
    path = "/api/order/{id}",
    params(("id" = Uuid, Path, description = "Dining table ID")),
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Order created", body = Order),
        (status = 400, description = "Insufficient stock or invalid body"),
    ),
    tag = "Orders"
)]
pub async fn create_order(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<Order>> {
    let order = order_service::create_order(&state, table_id, payload).await?;
    Ok(Json(order))
}

#[utoipa::path(
    get,
    path = "/api/order/{id}",
    params(("id" = Uuid, Path, description = "Dining table ID")),
    responses((status = 200, description = "Open orders of the table, newest first", body = Vec<Order>)),
    tag = "Orders"
)]
pub async fn open_orders_for_table(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(
        order_service::open_orders_for_table(&state, table_id).await?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/order/{id}",
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order deleted", body = MessageResponse),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn delete_order(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(order_service::delete_order(&state, order_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/order/update-order-by-table/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Open order of the table replaced", body = Order),
        (status = 400, description = "Insufficient stock or invalid body"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_by_table(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        order_service::update_by_table(&state, table_id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/update-order-by-id/{orderId}",
    params(("orderId" = Uuid, Path, description = "Order ID")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order edited", body = Order),
        (status = 400, description = "Insufficient stock, merged order or invalid id"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_by_id(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<Uuid>,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        order_service::update_by_id(&state, order_id, payload).await?,
    ))
}

#[utoipa::path(
    patch,
    path = "/api/update-order-by-number/{orderNumber}",
    params(("orderNumber" = String, Path, description = "Order number")),
    request_body = UpdateOrderRequest,
    responses(
        (status = 200, description = "Order replaced", body = Order),
        (status = 400, description = "Insufficient stock or merged order"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn update_order_by_number(
    State(state): State<AppState>,
    AppPath(order_number): AppPath<String>,
    AppJson(payload): AppJson<UpdateOrderRequest>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        order_service::update_by_number(&state, &order_number, payload).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    responses((status = 200, description = "Every order with its table name", body = Vec<OrderWithTableName>)),
    tag = "Orders"
)]
pub async fn list_orders(State(state): State<AppState>) -> AppResult<Json<Vec<OrderWithTableName>>> {
    Ok(Json(
        order_service::list_orders_with_table_names(&state).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/orders/date",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Closed unprinted orders by business date", body = Vec<Order>),
        (status = 400, description = "Malformed date"),
    ),
    tag = "Orders"
)]
pub async fn finalized_orders(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let (start, end) = range.bounds(state.day_boundary.today());
    Ok(Json(
        order_service::finalized_between(&state, start, end).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/merge/date",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Orders merged away in the range", body = Vec<Order>),
        (status = 400, description = "Malformed date"),
    ),
    tag = "Orders"
)]
pub async fn merged_orders(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let (start, end) = range.bounds(state.day_boundary.today());
    Ok(Json(order_service::merged_between(&state, start, end).await?))
}

#[utoipa::path(
    get,
    path = "/api/menu-statistics",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Per-item sales statistics", body = MenuStatistics),
        (status = 400, description = "Malformed date"),
    ),
    tag = "Reports"
)]
pub async fn menu_statistics(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> AppResult<Json<MenuStatistics>> {
    let menu_statistics =
        report_service::menu_statistics(&state, range.start_date, range.end_date).await?;
    Ok(Json(MenuStatistics { menu_statistics }))
}

#[utoipa::path(
    get,
    path = "/api/get/order/{orderNumber}",
    params(("orderNumber" = String, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 400, description = "Invalid Order Number"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Orders"
)]
pub async fn get_order_by_number(
    State(state): State<AppState>,
    AppPath(order_number): AppPath<String>,
) -> AppResult<Json<Order>> {
    Ok(Json(
        order_service::get_by_number(&state, &order_number).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/latest-orders",
    responses(
        (status = 200, description = "Ten most recent bills", body = Vec<Order>),
        (status = 404, description = "No orders found"),
    ),
    tag = "Orders"
)]
pub async fn latest_orders(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(order_service::latest_orders(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/orders/list/menuwise",
    params(MenuwiseQuery),
    responses(
        (status = 200, description = "Sales of one item on one day", body = MenuwiseSummary),
        (status = 400, description = "Missing or malformed query"),
    ),
    tag = "Reports"
)]
pub async fn menuwise(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<MenuwiseQuery>,
) -> AppResult<Json<MenuwiseSummary>> {
    Ok(Json(
        report_service::menuwise(&state, query.date, &query.menu_name).await?,
    ))
}

#[utoipa::path(
    get,
    path = "/api/get-next-order-number",
    responses((status = 200, description = "Number the next order will get", body = NextOrderNumber)),
    tag = "Orders"
)]
pub async fn next_order_number(State(state): State<AppState>) -> AppResult<Json<NextOrderNumber>> {
    let next_order_number = sequence::peek_next_order_number(&state.orm).await?;
    Ok(Json(NextOrderNumber { next_order_number }))
}

#[utoipa::path(
    get,
    path = "/api/temporary-orders-count",
    responses((status = 200, description = "Number of open orders", body = TemporaryOrdersCount)),
    tag = "Reports"
)]
pub async fn temporary_orders_count(
    State(state): State<AppState>,
) -> AppResult<Json<TemporaryOrdersCount>> {
    let temporary_orders_count = report_service::temporary_orders_count(&state).await?;
    Ok(Json(TemporaryOrdersCount {
        temporary_orders_count,
    }))
}

#[utoipa::path(
    get,
    path = "/api/total-amount-for-current-date",
    responses((status = 200, description = "Sum of today's order totals", body = TotalForCurrentDate)),
    tag = "Reports"
)]
pub async fn total_for_current_date(
    State(state): State<AppState>,
) -> AppResult<Json<TotalForCurrentDate>> {
    let total_for_current_date = report_service::total_for_current_date(&state).await?;
    Ok(Json(TotalForCurrentDate {
        total_for_current_date,
    }))
}

#[utoipa::path(
    get,
    path = "/api/total-amount-for-previous-month",
    responses((status = 200, description = "Sum of last month's order totals", body = TotalForPreviousMonth)),
    tag = "Reports"
)]
pub async fn total_for_previous_month(
    State(state): State<AppState>,
) -> AppResult<Json<TotalForPreviousMonth>> {
    let total_for_previous_month = report_service::total_for_previous_month(&state).await?;
    Ok(Json(TotalForPreviousMonth {
        total_for_previous_month,
    }))
}

#[utoipa::path(
    get,
    path = "/api/total-amounts-by-month",
    responses((status = 200, description = "Monthly totals of the current year", body = TotalAmountsByMonth)),
    tag = "Reports"
)]
pub async fn totals_by_month(State(state): State<AppState>) -> AppResult<Json<TotalAmountsByMonth>> {
    let total_amounts_by_month = report_service::totals_by_month(&state).await?;
    Ok(Json(TotalAmountsByMonth {
        total_amounts_by_month,
    }))
}

#[utoipa::path(
    get,
    path = "/api/summary",
    responses((status = 200, description = "Today's payment totals", body = PaymentSummary)),
    tag = "Reports"
)]
pub async fn payment_summary(State(state): State<AppState>) -> AppResult<Json<PaymentSummary>> {
    Ok(Json(report_service::payment_summary(&state).await?))
}

#[utoipa::path(
    get,
    path = "/api/savedBills/{tableId}",
    params(("tableId" = Uuid, Path, description = "Dining table ID")),
    responses((status = 200, description = "Unprinted open bills without canceled lines", body = Vec<Order>)),
    tag = "Orders"
)]
pub async fn saved_bills(
    State(state): State<AppState>,
    AppPath(table_id): AppPath<Uuid>,
) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(order_service::saved_bills(&state, table_id).await?))
}

#[utoipa::path(
    patch,
    path = "/api/mergeTables",
    request_body = MergeTablesRequest,
    responses(
        (status = 200, description = "Source order folded into destination", body = MergeResult),
        (status = 400, description = "Same table on both sides"),
        (status = 404, description = "Order or table not found"),
    ),
    tag = "Orders"
)]
pub async fn merge_tables(
    State(state): State<AppState>,
    AppJson(payload): AppJson<MergeTablesRequest>,
) -> AppResult<Json<MergeResult>> {
    Ok(Json(merge_service::merge_tables(&state, payload).await?))
}

#[utoipa::path(
    put,
    path = "/api/orders/flag",
    responses(
        (status = 200, description = "Every marked order settled", body = Vec<Order>),
        (status = 404, description = "No marked orders or settle category missing"),
    ),
    tag = "Settlement"
)]
pub async fn apply_settlement(State(state): State<AppState>) -> AppResult<Json<Vec<Order>>> {
    Ok(Json(settlement_service::apply_settlement(&state).await?))
}

#[utoipa::path(
    put,
    path = "/api/order/update-flag/{orderNumber}",
    params(("orderNumber" = String, Path, description = "Order number")),
    responses(
        (status = 200, description = "Order marked for settlement", body = MessageResponse),
        (status = 400, description = "Order is still open or was merged away"),
        (status = 404, description = "Order not found"),
    ),
    tag = "Settlement"
)]
pub async fn mark_for_settle(
    State(state): State<AppState>,
    AppPath(order_number): AppPath<String>,
) -> AppResult<Json<MessageResponse>> {
    Ok(Json(
        settlement_service::mark_for_settle(&state, &order_number).await?,
    ))
}
