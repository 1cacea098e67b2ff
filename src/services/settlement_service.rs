//! Settlement flag workflow.
//!
//! Marking is per order; applying is a system-wide batch that rewrites every
//! marked order into the fixed bundle listed under the settle menu category.

use rust_decimal::Decimal;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};

use crate::{
    audit,
    entity::{
        menu_categories::{Column as CategoryCol, Entity as MenuCategories},
        menu_entries::{Column as EntryCol, Entity as MenuEntries, Model as MenuEntryModel},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        sea_orm_active_enums::OrderState,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    response::MessageResponse,
    services::order_service::replace_items,
    state::AppState,
};

const ZERO_AMOUNT: &str = "0.00";

pub async fn mark_for_settle(state: &AppState, order_number: &str) -> AppResult<MessageResponse> {
    let order = Orders::find()
        .filter(OrderCol::OrderNumber.eq(order_number))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::not_found("Order"))?;

    ensure_markable(order_number, order.state)?;

    if order.state != OrderState::SettlePending {
        let mut active: OrderActive = order.into();
        active.state = Set(OrderState::SettlePending);
        active.update(&state.orm).await?;
        tracing::info!(order_number, "order marked for settlement");
    }

    Ok(MessageResponse::new("Flag updated successfully"))
}

/// Batch job: settle every order currently marked, across all tables.
pub async fn apply_settlement(state: &AppState) -> AppResult<Vec<Order>> {
    let category = MenuCategories::find()
        .filter(CategoryCol::Name.eq(state.settle.category.as_str()))
        .one(&state.orm)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("{} category not found", state.settle.category)))?;
    let entries = MenuEntries::find()
        .filter(EntryCol::CategoryId.eq(category.id))
        .order_by_asc(EntryCol::Position)
        .all(&state.orm)
        .await?;

    let bundle = settle_bundle(&entries);
    let subtotal = bundle_subtotal(&bundle);

    let txn = state.orm.begin().await?;

    let pending = Orders::find()
        .filter(OrderCol::State.eq(OrderState::SettlePending))
        .order_by_asc(OrderCol::InsertedAt)
        .lock(LockType::Update)
        .all(&txn)
        .await?;
    if pending.is_empty() {
        return Err(AppError::NotFound(
            "No orders with flag equal to 1 found".into(),
        ));
    }

    let mut settled = Vec::with_capacity(pending.len());
    for order in pending {
        let mut active: OrderActive = order.into();
        active.cash_amount = Set(Some(state.settle.cash_amount.clone()));
        active.online_payment_amount = Set(Some(ZERO_AMOUNT.to_string()));
        active.discount = Set(Some(ZERO_AMOUNT.to_string()));
        active.complimentary_amount = Set(Some(ZERO_AMOUNT.to_string()));
        active.due_amount = Set(Some(ZERO_AMOUNT.to_string()));
        active.subtotal = Set(subtotal);
        active.cgst = Set(Decimal::ZERO);
        active.sgst = Set(Decimal::ZERO);
        active.total = Set(subtotal);
        active.state = Set(OrderState::Settled);
        let order = active.update(&txn).await?;

        let items = replace_items(&txn, order.id, &bundle).await?;
        settled.push(Order::from_entity(order, items));
    }

    txn.commit().await?;

    tracing::info!(orders = settled.len(), category = %state.settle.category, "settlement applied");
    audit::record(
        state,
        "settlement_applied",
        "orders",
        serde_json::json!({
            "order_numbers": settled.iter().map(|o| o.order_number.as_str()).collect::<Vec<_>>(),
        }),
    )
    .await;

    Ok(settled)
}

/// Only closed bills can carry the settle marker. The table's running bill
/// stays open for edits until it is finalized.
fn ensure_markable(order_number: &str, state: OrderState) -> AppResult<()> {
    match state {
        OrderState::MergedAway => Err(AppError::BadRequest(format!(
            "Order {order_number} was merged into another table and cannot be settled"
        ))),
        OrderState::Open => Err(AppError::BadRequest(format!(
            "Order {order_number} is still open and must be finalized before settlement"
        ))),
        OrderState::Finalized | OrderState::SettlePending | OrderState::Settled => Ok(()),
    }
}

/// One of each settle-category entry, in category order.
fn settle_bundle(entries: &[MenuEntryModel]) -> Vec<OrderItem> {
    entries
        .iter()
        .map(|entry| OrderItem {
            name: entry.name.clone(),
            price: entry.price,
            quantity: 1,
            taste: String::new(),
            is_canceled: false,
            stock_qty: None,
        })
        .collect()
}

fn bundle_subtotal(bundle: &[OrderItem]) -> Decimal {
    bundle
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn entry(name: &str, price: Decimal, position: i32) -> MenuEntryModel {
        MenuEntryModel {
            id: Uuid::new_v4(),
            category_id: Uuid::nil(),
            position,
            name: name.into(),
            price,
        }
    }

    #[test]
    fn bundle_has_one_of_each_entry() {
        let entries = vec![
            entry("Black Forest", Decimal::new(45000, 2), 0),
            entry("Candles", Decimal::new(2000, 2), 1),
        ];
        let bundle = settle_bundle(&entries);

        assert_eq!(bundle.len(), 2);
        assert!(bundle.iter().all(|item| item.quantity == 1 && !item.is_canceled));
        assert_eq!(bundle[0].name, "Black Forest");
        assert_eq!(bundle[1].name, "Candles");
    }

    #[test]
    fn subtotal_is_sum_of_prices() {
        let entries = vec![
            entry("Black Forest", Decimal::new(45000, 2), 0),
            entry("Candles", Decimal::new(2050, 2), 1),
        ];
        assert_eq!(bundle_subtotal(&settle_bundle(&entries)), Decimal::new(47050, 2));
    }

    #[test]
    fn only_closed_orders_take_the_settle_marker() {
        assert!(matches!(
            ensure_markable("7", OrderState::Open),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            ensure_markable("7", OrderState::MergedAway),
            Err(AppError::BadRequest(_))
        ));
        assert!(ensure_markable("7", OrderState::Finalized).is_ok());
        assert!(ensure_markable("7", OrderState::SettlePending).is_ok());
        assert!(ensure_markable("7", OrderState::Settled).is_ok());
    }

    #[test]
    fn empty_category_settles_to_zero() {
        assert_eq!(bundle_subtotal(&settle_bundle(&[])), Decimal::ZERO);
    }
}
