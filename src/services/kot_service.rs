use std::collections::HashMap;

use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, Set, Statement, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    business_day::day_bounds,
    dto::{
        kots::{CreateKotRequest, DailyItemQuantity},
        stock::ItemQuantity,
    },
    entity::{
        kot_items::{ActiveModel as KotItemActive, Column as KotItemCol, Entity as KotItems},
        kots::{ActiveModel as KotActive, Column as KotCol, Entity as Kots},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{Column as OrderCol, Entity as Orders},
        sea_orm_active_enums::OrderState,
    },
    error::{AppError, AppResult},
    models::Kot,
    response::MessageResponse,
    services::stock_ledger,
    state::AppState,
};

const TOP_ITEMS_LIMIT: u64 = 4;

pub async fn create_ticket(
    state: &AppState,
    table_id: Uuid,
    payload: CreateKotRequest,
) -> AppResult<Kot> {
    if let Some(item) = payload.items.iter().find(|item| item.quantity < 0) {
        return Err(AppError::BadRequest(format!(
            "quantity for item {} must not be negative",
            item.name
        )));
    }

    let stamp = state.day_boundary.now();
    let txn = state.orm.begin().await?;

    let kot = KotActive {
        id: Set(Uuid::new_v4()),
        table_id: Set(table_id),
        waiter_name: Set(payload.waiter_name),
        settled: Set(false),
        kot_date: Set(stamp.into()),
        created_at: Set(stamp.into()),
        inserted_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    let mut items = Vec::with_capacity(payload.items.len());
    for (position, item) in payload.items.into_iter().enumerate() {
        let saved = KotItemActive {
            id: Set(Uuid::new_v4()),
            kot_id: Set(kot.id),
            position: Set(position as i32),
            name: Set(item.name),
            quantity: Set(item.quantity),
            taste: Set(item.taste.unwrap_or_default()),
            is_canceled: Set(false),
        }
        .insert(&txn)
        .await?;
        items.push(saved);
    }

    txn.commit().await?;

    tracing::info!(kot_id = %kot.id, table_id = %table_id, lines = items.len(), "kot created");
    Ok(Kot::from_entity(kot, items))
}

/// Newest ticket of a table, showing only lines still going to the kitchen.
pub async fn latest_ticket(state: &AppState, table_id: Uuid) -> AppResult<Kot> {
    let kot = Kots::find()
        .filter(KotCol::TableId.eq(table_id))
        .order_by_desc(KotCol::InsertedAt)
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("KOT"))?;

    let items = KotItems::find()
        .filter(KotItemCol::KotId.eq(kot.id))
        .filter(KotItemCol::IsCanceled.eq(false))
        .order_by_asc(KotItemCol::Position)
        .all(&state.orm)
        .await?;

    Ok(Kot::from_entity(kot, items))
}

pub async fn settle(state: &AppState, table_id: Uuid) -> AppResult<MessageResponse> {
    let result = Kots::update_many()
        .col_expr(KotCol::Settled, Expr::value(true))
        .filter(KotCol::TableId.eq(table_id))
        .exec(&state.orm)
        .await?;

    tracing::info!(table_id = %table_id, tickets = result.rows_affected, "kots settled");
    Ok(MessageResponse::new("KOTs settled successfully"))
}

/// Cancel the named lines on every unsettled ticket of a table and mirror
/// each cancellation onto the table's open order.
pub async fn cancel_items(
    state: &AppState,
    table_id: Uuid,
    item_names: Vec<String>,
) -> AppResult<MessageResponse> {
    let txn = state.orm.begin().await?;

    let kots = Kots::find()
        .filter(KotCol::TableId.eq(table_id))
        .filter(KotCol::Settled.eq(false))
        .order_by_asc(KotCol::InsertedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if kots.is_empty() {
        return Err(AppError::NotFound(
            "No unsettled KOTs found for this table".into(),
        ));
    }

    let kot_ids: Vec<Uuid> = kots.iter().map(|k| k.id).collect();
    let mut lines = KotItems::find()
        .filter(KotItemCol::KotId.is_in(kot_ids))
        .filter(KotItemCol::IsCanceled.eq(false))
        .filter(KotItemCol::Name.is_in(item_names))
        .order_by_asc(KotItemCol::Position)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    // Keep ticket order: lines of older tickets first.
    let rank: HashMap<Uuid, usize> = kots.iter().enumerate().map(|(i, k)| (k.id, i)).collect();
    lines.sort_by_key(|line| (rank.get(&line.kot_id).copied(), line.position));

    let mut canceled = Vec::with_capacity(lines.len());
    for line in lines {
        let name = line.name.clone();
        let mut active: KotItemActive = line.into();
        active.is_canceled = Set(true);
        active.update(&txn).await?;

        if !cancel_open_order_line(&txn, table_id, &name).await? {
            tracing::warn!(
                table_id = %table_id,
                item = %name,
                "no open order line to cancel for kot item"
            );
        }
        canceled.push(name);
    }

    txn.commit().await?;

    tracing::info!(table_id = %table_id, canceled = canceled.len(), "kot items canceled");
    audit::record(
        state,
        "kot_items_canceled",
        "kots",
        serde_json::json!({ "table_id": table_id, "items": canceled }),
    )
    .await;

    Ok(MessageResponse::new(
        "Selected KOT items and corresponding orders canceled successfully",
    ))
}

/// Mark the first live line named `name` on the table's open orders as
/// canceled. Returns whether such a line existed.
async fn cancel_open_order_line<C: ConnectionTrait>(
    conn: &C,
    table_id: Uuid,
    name: &str,
) -> AppResult<bool> {
    let open_ids: Vec<Uuid> = Orders::find()
        .filter(OrderCol::TableId.eq(table_id))
        .filter(OrderCol::State.eq(OrderState::Open))
        .order_by_desc(OrderCol::InsertedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(|order| order.id)
        .collect();

    for order_id in open_ids {
        let line = OrderItems::find()
            .filter(OrderItemCol::OrderId.eq(order_id))
            .filter(OrderItemCol::Name.eq(name))
            .filter(OrderItemCol::IsCanceled.eq(false))
            .order_by_asc(OrderItemCol::Position)
            .lock(LockType::Update)
            .one(conn)
            .await?;
        if let Some(line) = line {
            let mut active: OrderItemActive = line.into();
            active.is_canceled = Set(true);
            active.update(conn).await?;
            return Ok(true);
        }
    }
    Ok(false)
}

/// Kitchen's four busiest items of the current business day.
pub async fn top_items_today(state: &AppState) -> AppResult<Vec<ItemQuantity>> {
    let (start, end) = day_bounds(state.day_boundary.today());
    stock_ledger::top_consumed(&state.orm, start, end, TOP_ITEMS_LIMIT).await
}

#[derive(Debug, FromQueryResult)]
struct DailyItemRow {
    item_name: String,
    date: String,
    total_quantity: i64,
}

/// Per day and item quantity sums over ticket lines with the given
/// cancellation status, keyed by the ticket's creation date.
pub async fn daily_item_quantities<C: ConnectionTrait>(
    conn: &C,
    canceled: bool,
) -> AppResult<Vec<DailyItemQuantity>> {
    let rows = DailyItemRow::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT ki.name AS item_name,
               to_char(k.created_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
               SUM(ki.quantity)::BIGINT AS total_quantity
        FROM kot_items ki
        JOIN kots k ON k.id = ki.kot_id
        WHERE ki.is_canceled = $1
        GROUP BY 2, ki.name
        ORDER BY 2 DESC, ki.name ASC
        "#,
        [canceled.into()],
    ))
    .all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| DailyItemQuantity {
            item_name: row.item_name,
            date: row.date,
            total_quantity: row.total_quantity,
        })
        .collect())
}
