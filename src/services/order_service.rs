use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CreateOrderRequest, OrderItemInput, OrderWithTableName, UpdateOrderRequest},
    entity::{
        dining_tables::{Column as TableCol, Entity as DiningTables},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        sea_orm_active_enums::OrderState,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::MessageResponse,
    services::{sequence, stock_ledger},
    state::AppState,
};

const UNKNOWN_TABLE: &str = "Unknown Table";
const LATEST_ORDERS_LIMIT: u64 = 10;

pub async fn create_order(
    state: &AppState,
    table_id: Uuid,
    payload: CreateOrderRequest,
) -> AppResult<Order> {
    validate_items(&payload.items)?;

    let txn = state.orm.begin().await?;

    let mut lines = Vec::with_capacity(payload.items.len());
    for item in payload.items {
        let booked = stock_ledger::consume(&txn, &item.name, item.quantity).await?;
        lines.push(line_from_input(item, booked.remaining_warehouse()));
    }

    let order_number = sequence::next_order_number(&txn).await?;
    let stamp = state.day_boundary.now();
    let order_state = if payload.is_temporary == Some(false) {
        OrderState::Finalized
    } else {
        OrderState::Open
    };

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        order_number: Set(order_number),
        table_id: Set(table_id),
        subtotal: Set(payload.subtotal),
        cgst: Set(payload.cgst),
        sgst: Set(payload.sgst),
        total: Set(payload.total),
        ac_percentage_amount: Set(payload.ac_percentage_amount),
        is_print: Set(payload.is_print.unwrap_or(0)),
        state: Set(order_state),
        cash_amount: Set(None),
        online_payment_amount: Set(None),
        complimentary_amount: Set(None),
        due_amount: Set(None),
        discount: Set(None),
        destination_table_name: Set(None),
        destination_order_number: Set(None),
        order_date: Set(stamp.into()),
        created_at: Set(stamp.into()),
        inserted_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let items = insert_items(&txn, order.id, &lines).await?;

    txn.commit().await?;

    tracing::info!(
        order_number = %order.order_number,
        table_id = %table_id,
        lines = items.len(),
        "order created"
    );
    audit::record(
        state,
        "order_created",
        "orders",
        serde_json::json!({ "order_id": order.id, "order_number": order.order_number }),
    )
    .await;

    Ok(Order::from_entity(order, items))
}

/// Replace the table's open order. New quantities are booked in full against
/// stock, without looking at what the order held before.
pub async fn update_by_table(
    state: &AppState,
    table_id: Uuid,
    mut payload: UpdateOrderRequest,
) -> AppResult<Order> {
    let txn = state.orm.begin().await?;

    let order = latest_open_order(&txn, table_id)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    let lines = match payload.items.take() {
        Some(items) => {
            validate_items(&items)?;
            let mut lines = Vec::with_capacity(items.len());
            for item in items {
                let booked = stock_ledger::consume(&txn, &item.name, item.quantity).await?;
                lines.push(line_from_input(item, booked.remaining_warehouse()));
            }
            Some(lines)
        }
        None => None,
    };

    let order = apply_update(&txn, order, &payload, false).await?;
    let items = match lines {
        Some(lines) => replace_items(&txn, order.id, &lines).await?,
        None => load_items(&txn, order.id).await?,
    };

    txn.commit().await?;
    tracing::info!(order_number = %order.order_number, "order updated by table");

    Ok(Order::from_entity(order, items))
}

/// Edit an order by id. Each new line books only the difference against the
/// first same-named line previously on the order. Lines dropped from the
/// order do not return their stock.
pub async fn update_by_id(
    state: &AppState,
    order_id: Uuid,
    mut payload: UpdateOrderRequest,
) -> AppResult<Order> {
    let txn = state.orm.begin().await?;

    let order = Orders::find_by_id(order_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    ensure_editable(&order)?;

    let lines = match payload.items.take() {
        Some(items) => {
            validate_items(&items)?;
            let previous = load_items(&txn, order.id).await?;
            let previous: Vec<(&str, i32)> =
                previous.iter().map(|l| (l.name.as_str(), l.quantity)).collect();
            let next: Vec<(&str, i32)> =
                items.iter().map(|l| (l.name.as_str(), l.quantity)).collect();

            let mut remaining = Vec::with_capacity(items.len());
            for (name, delta) in moves_for_edit(&previous, &next) {
                let booked = stock_ledger::adjust(&txn, name, delta).await?;
                remaining.push(booked.remaining_warehouse());
            }
            Some(
                items
                    .into_iter()
                    .zip(remaining)
                    .map(|(item, stock)| line_from_input(item, stock))
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };

    let order = apply_update(&txn, order, &payload, false).await?;
    let items = match lines {
        Some(lines) => replace_items(&txn, order.id, &lines).await?,
        None => load_items(&txn, order.id).await?,
    };

    txn.commit().await?;
    tracing::info!(order_number = %order.order_number, "order updated by id");

    Ok(Order::from_entity(order, items))
}

/// Full replacement keyed by order number. Changed lines book their delta,
/// newly added names book their whole quantity, removed lines are ignored.
pub async fn update_by_number(
    state: &AppState,
    order_number: &str,
    mut payload: UpdateOrderRequest,
) -> AppResult<Order> {
    let txn = state.orm.begin().await?;

    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(order_number))
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    ensure_editable(&order)?;

    let lines = match payload.items.take() {
        Some(items) => {
            validate_items(&items)?;
            let previous = load_items(&txn, order.id).await?;
            let previous: Vec<(&str, i32)> =
                previous.iter().map(|l| (l.name.as_str(), l.quantity)).collect();
            let next: Vec<(&str, i32)> =
                items.iter().map(|l| (l.name.as_str(), l.quantity)).collect();

            let mut remaining: HashMap<String, Option<i32>> = HashMap::new();
            for (name, delta) in moves_for_replacement(&previous, &next) {
                let booked = stock_ledger::adjust(&txn, name, delta).await?;
                remaining.insert(name.to_owned(), booked.remaining_warehouse());
            }
            Some(
                items
                    .into_iter()
                    .map(|item| {
                        let stock = remaining.get(&item.name).copied().flatten();
                        line_from_input(item, stock)
                    })
                    .collect::<Vec<_>>(),
            )
        }
        None => None,
    };

    let order = apply_update(&txn, order, &payload, true).await?;
    let items = match lines {
        Some(lines) => replace_items(&txn, order.id, &lines).await?,
        None => load_items(&txn, order.id).await?,
    };

    txn.commit().await?;
    tracing::info!(order_number = %order.order_number, "order replaced by number");

    Ok(Order::from_entity(order, items))
}

/// Hard delete. Booked stock is not returned.
pub async fn delete_order(state: &AppState, order_id: Uuid) -> AppResult<MessageResponse> {
    let result = Orders::delete_by_id(order_id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::not_found("Order"));
    }

    tracing::info!(order_id = %order_id, "order deleted");
    audit::record(
        state,
        "order_deleted",
        "orders",
        serde_json::json!({ "order_id": order_id }),
    )
    .await;

    Ok(MessageResponse::new("Order deleted successfully"))
}

pub async fn list_orders_with_table_names(state: &AppState) -> AppResult<Vec<OrderWithTableName>> {
    let orders = Orders::find()
        .order_by_asc(OrderCol::InsertedAt)
        .all(&state.orm)
        .await?;

    let mut table_ids: Vec<Uuid> = orders.iter().map(|o| o.table_id).collect();
    table_ids.sort();
    table_ids.dedup();
    let names: HashMap<Uuid, String> = DiningTables::find()
        .filter(TableCol::Id.is_in(table_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|t| (t.id, t.table_name))
        .collect();

    let orders = attach_items(&state.orm, orders).await?;
    Ok(orders
        .into_iter()
        .map(|order| {
            let table_name = names
                .get(&order.table_id)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_TABLE.to_string());
            OrderWithTableName { order, table_name }
        })
        .collect())
}

pub async fn open_orders_for_table(state: &AppState, table_id: Uuid) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::State.eq(OrderState::Open))
        .order_by_desc(OrderCol::InsertedAt)
        .all(&state.orm)
        .await?;
    attach_items(&state.orm, orders).await
}

pub async fn get_by_number(state: &AppState, order_number: &str) -> AppResult<Order> {
    if order_number.trim().is_empty() {
        return Err(AppError::BadRequest("Invalid Order Number".into()));
    }
    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(order_number))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;
    let items = load_items(&state.orm, order.id).await?;
    Ok(Order::from_entity(order, items))
}

/// Printed bills still open at their table, plus unprinted closed bills.
pub async fn latest_orders(state: &AppState) -> AppResult<Vec<Order>> {
    let condition = Condition::any()
        .add(
            Condition::all()
                .add(OrderCol::IsPrint.eq(1))
                .add(OrderCol::State.eq(OrderState::Open)),
        )
        .add(
            Condition::all()
                .add(OrderCol::IsPrint.eq(0))
                .add(OrderCol::State.is_in(closed_states())),
        );

    let orders = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::InsertedAt)
        .limit(LATEST_ORDERS_LIMIT)
        .all(&state.orm)
        .await?;
    if orders.is_empty() {
        return Err(AppError::NotFound("No orders found".into()));
    }
    attach_items(&state.orm, orders).await
}

/// Unprinted open bills of a table with canceled lines stripped; bills left
/// without any line are dropped.
pub async fn saved_bills(state: &AppState, table_id: Uuid) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::State.eq(OrderState::Open))
        .filter(OrderCol::IsPrint.eq(0))
        .order_by_desc(OrderCol::InsertedAt)
        .all(&state.orm)
        .await?;

    Ok(attach_items(&state.orm, orders)
        .await?
        .into_iter()
        .filter_map(|mut order| {
            order.items.retain(|item| !item.is_canceled);
            (!order.items.is_empty()).then_some(order)
        })
        .collect())
}

/// Closed, unprinted, unmerged orders whose business date is in `[start, end)`.
pub async fn finalized_between(
    state: &AppState,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::IsPrint.eq(0))
        .filter(OrderCol::State.is_in(closed_states()))
        .filter(OrderCol::OrderDate.gte(start))
        .filter(OrderCol::OrderDate.lt(end))
        .order_by_asc(OrderCol::OrderDate)
        .all(&state.orm)
        .await?;
    attach_items(&state.orm, orders).await
}

pub async fn merged_between(
    state: &AppState,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Vec<Order>> {
    let orders = Orders::find()
        .filter(OrderCol::IsPrint.eq(0))
        .filter(OrderCol::State.eq(OrderState::MergedAway))
        .filter(OrderCol::CreatedAt.gte(start))
        .filter(OrderCol::CreatedAt.lt(end))
        .order_by_asc(OrderCol::CreatedAt)
        .all(&state.orm)
        .await?;
    attach_items(&state.orm, orders).await
}

fn closed_states() -> [OrderState; 3] {
    [
        OrderState::Finalized,
        OrderState::SettlePending,
        OrderState::Settled,
    ]
}

fn validate_items(items: &[OrderItemInput]) -> AppResult<()> {
    if let Some(item) = items.iter().find(|item| item.quantity < 0) {
        return Err(AppError::BadRequest(format!(
            "quantity for item {} must not be negative",
            item.name
        )));
    }
    Ok(())
}

fn ensure_editable(order: &OrderModel) -> AppResult<()> {
    if order.state.is_merged() {
        return Err(AppError::BadRequest(format!(
            "Order {} was merged into another table and can no longer be edited",
            order.order_number
        )));
    }
    Ok(())
}

fn line_from_input(item: OrderItemInput, stock_qty: Option<i32>) -> OrderItem {
    OrderItem {
        name: item.name,
        price: item.price,
        quantity: item.quantity,
        taste: item.taste.unwrap_or_default(),
        is_canceled: item.is_canceled.unwrap_or(false),
        stock_qty,
    }
}

/// Stock moves for an edit: every new line books `new - old`, where `old` is
/// the quantity of the first same-named previous line (0 when absent).
fn moves_for_edit<'a>(previous: &[(&str, i32)], next: &[(&'a str, i32)]) -> Vec<(&'a str, i32)> {
    next.iter()
        .map(|&(name, quantity)| {
            let old = previous
                .iter()
                .find(|(prev, _)| *prev == name)
                .map(|&(_, q)| q)
                .unwrap_or(0);
            (name, quantity - old)
        })
        .collect()
}

/// Stock moves for a full replacement: previous lines that survive book their
/// delta (in previous order), then names new to the order book their quantity.
fn moves_for_replacement<'a>(
    previous: &[(&'a str, i32)],
    next: &[(&'a str, i32)],
) -> Vec<(&'a str, i32)> {
    let changed = previous.iter().filter_map(|&(name, old)| {
        next.iter()
            .find(|(candidate, _)| *candidate == name)
            .map(|&(_, new)| (name, new - old))
    });
    let added = next
        .iter()
        .filter(|(name, _)| !previous.iter().any(|(prev, _)| prev == name))
        .copied();
    changed.chain(added).collect()
}

/// Write the scalar fields carried by an update body. `table_id` is only
/// honoured for full replacements.
async fn apply_update<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
    payload: &UpdateOrderRequest,
    allow_table_change: bool,
) -> AppResult<OrderModel> {
    let next_state = order.state.with_temporary(payload.is_temporary);
    let mut active: OrderActive = order.into();

    if let Some(subtotal) = payload.subtotal {
        active.subtotal = Set(subtotal);
    }
    if let Some(cgst) = payload.cgst {
        active.cgst = Set(cgst);
    }
    if let Some(sgst) = payload.sgst {
        active.sgst = Set(sgst);
    }
    if let Some(total) = payload.total {
        active.total = Set(total);
    }
    if let Some(ac) = payload.ac_percentage_amount {
        active.ac_percentage_amount = Set(Some(ac));
    }
    if let Some(is_print) = payload.is_print {
        active.is_print = Set(is_print);
    }
    if let Some(cash) = &payload.cash_amount {
        active.cash_amount = Set(Some(cash.clone()));
    }
    if let Some(online) = &payload.online_payment_amount {
        active.online_payment_amount = Set(Some(online.clone()));
    }
    if let Some(due) = &payload.due_amount {
        active.due_amount = Set(Some(due.clone()));
    }
    if let Some(complimentary) = &payload.complimentary_amount {
        active.complimentary_amount = Set(Some(complimentary.clone()));
    }
    if let Some(discount) = &payload.discount {
        active.discount = Set(Some(discount.clone()));
    }
    if allow_table_change {
        if let Some(table_id) = payload.table_id {
            active.table_id = Set(table_id);
        }
    }
    active.state = Set(next_state);

    Ok(active.update(conn).await?)
}

/// Newest open order of a table, locked for the rest of the transaction.
pub(crate) async fn latest_open_order<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
) -> AppResult<Option<OrderModel>> {
    Ok(Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::State.eq(OrderState::Open))
        .order_by_desc(OrderCol::InsertedAt)
        .lock(LockType::Update)
        .one(conn)
        .await?)
}

pub(crate) async fn load_items<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
) -> AppResult<Vec<OrderItemModel>> {
    Ok(OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .order_by_asc(OrderItemCol::Position)
        .all(conn)
        .await?)
}

pub(crate) async fn attach_items<C: ConnectionTrait>(
    conn: &C,
    orders: Vec<OrderModel>,
) -> AppResult<Vec<Order>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut by_order: HashMap<Uuid, Vec<OrderItemModel>> = HashMap::new();
    for item in OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(ids))
        .order_by_asc(OrderItemCol::Position)
        .all(conn)
        .await?
    {
        by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            Order::from_entity(order, items)
        })
        .collect())
}

async fn insert_items<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    lines: &[OrderItem],
) -> AppResult<Vec<OrderItemModel>> {
    let mut saved = Vec::with_capacity(lines.len());
    for (position, line) in lines.iter().enumerate() {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order_id),
            position: Set(position as i32),
            name: Set(line.name.clone()),
            price: Set(line.price),
            quantity: Set(line.quantity),
            taste: Set(line.taste.clone()),
            is_canceled: Set(line.is_canceled),
            stock_qty: Set(line.stock_qty),
        }
        .insert(conn)
        .await?;
        saved.push(item);
    }
    Ok(saved)
}

/// Swap an order's lines for `lines`, keeping their order.
pub(crate) async fn replace_items<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    lines: &[OrderItem],
) -> AppResult<Vec<OrderItemModel>> {
    OrderItems::delete_many()
        .filter(OrderItemCol::OrderId.eq(order_id))
        .exec(conn)
        .await?;
    insert_items(conn, order_id, lines).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn edit_books_difference_against_previous_line() {
        let previous = [("Tea", 2), ("Coffee", 1)];
        let next = [("Tea", 5), ("Coffee", 1)];
        assert_eq!(moves_for_edit(&previous, &next), vec![("Tea", 3), ("Coffee", 0)]);
    }

    #[test]
    fn edit_books_full_quantity_for_new_names_and_ignores_removed() {
        let previous = [("Tea", 2), ("Samosa", 4)];
        let next = [("Tea", 1), ("Lassi", 2)];
        assert_eq!(moves_for_edit(&previous, &next), vec![("Tea", -1), ("Lassi", 2)]);
    }

    #[test]
    fn replacement_walks_previous_lines_then_additions() {
        let previous = [("Samosa", 4), ("Tea", 2), ("Vada", 1)];
        let next = [("Lassi", 2), ("Tea", 3), ("Samosa", 1)];
        assert_eq!(
            moves_for_replacement(&previous, &next),
            vec![("Samosa", -3), ("Tea", 1), ("Lassi", 2)]
        );
    }

    #[test]
    fn negative_quantities_are_rejected() {
        let items = vec![OrderItemInput {
            name: "Tea".into(),
            price: Decimal::from(20),
            quantity: -1,
            taste: None,
            is_canceled: None,
        }];
        assert!(matches!(validate_items(&items), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn input_lines_default_taste_and_cancel_flag() {
        let line = line_from_input(
            OrderItemInput {
                name: "Tea".into(),
                price: Decimal::from(20),
                quantity: 2,
                taste: None,
                is_canceled: None,
            },
            Some(8),
        );
        assert_eq!(line.taste, "");
        assert!(!line.is_canceled);
        assert_eq!(line.stock_qty, Some(8));
    }
}
