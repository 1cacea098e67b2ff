use sea_orm::{ActiveModelTrait, EntityTrait, Set, TransactionTrait};

use crate::{
    audit,
    dto::orders::{MergeResult, MergeTablesRequest},
    entity::{
        dining_tables::Entity as DiningTables, orders::ActiveModel as OrderActive,
        sea_orm_active_enums::OrderState,
    },
    error::{AppError, AppResult},
    models::{Order, OrderItem},
    services::order_service::{latest_open_order, load_items, replace_items},
    state::AppState,
};

/// Fold the source table's open order into the destination table's open
/// order. The source is retired as merged away; there is no way back.
pub async fn merge_tables(state: &AppState, payload: MergeTablesRequest) -> AppResult<MergeResult> {
    let MergeTablesRequest {
        destination_table_id,
        source_table_id,
    } = payload;
    if destination_table_id == source_table_id {
        return Err(AppError::BadRequest(
            "A table cannot be merged into itself".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    let destination = latest_open_order(&txn, destination_table_id)
        .await?
        .ok_or_else(|| AppError::not_found("Destination order"))?;
    let source = latest_open_order(&txn, source_table_id)
        .await?
        .ok_or_else(|| AppError::not_found("Source order"))?;
    let destination_table = DiningTables::find_by_id(destination_table_id)
        .one(&txn)
        .await?
        .ok_or_else(|| AppError::not_found("Destination table"))?;

    let mut lines: Vec<OrderItem> = load_items(&txn, destination.id)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    let source_lines: Vec<OrderItem> = load_items(&txn, source.id)
        .await?
        .into_iter()
        .map(OrderItem::from)
        .collect();
    merge_lines(&mut lines, &source_lines)?;

    let mut dest_active: OrderActive = destination.clone().into();
    dest_active.subtotal = Set(destination.subtotal + source.subtotal);
    dest_active.cgst = Set(destination.cgst + source.cgst);
    dest_active.sgst = Set(destination.sgst + source.sgst);
    dest_active.total = Set(destination.total + source.total);
    let destination = dest_active.update(&txn).await?;
    let items = replace_items(&txn, destination.id, &lines).await?;

    let source_number = source.order_number.clone();
    let mut source_active: OrderActive = source.into();
    source_active.state = Set(OrderState::MergedAway);
    source_active.destination_table_name = Set(Some(destination_table.table_name));
    source_active.destination_order_number = Set(Some(destination.order_number.clone()));
    source_active.update(&txn).await?;

    txn.commit().await?;

    tracing::info!(
        source_order = %source_number,
        destination_order = %destination.order_number,
        "tables merged"
    );
    audit::record(
        state,
        "tables_merged",
        "orders",
        serde_json::json!({
            "source_table_id": source_table_id,
            "destination_table_id": destination_table_id,
            "source_order_number": source_number,
            "destination_order_number": destination.order_number,
        }),
    )
    .await;

    Ok(MergeResult {
        success: true,
        merged_order: Order::from_entity(destination, items),
    })
}

/// Same-named lines add their quantities onto the first destination line of
/// that name; everything else is appended in source order.
pub fn merge_lines(destination: &mut Vec<OrderItem>, source: &[OrderItem]) -> AppResult<()> {
    for line in source {
        match destination.iter_mut().find(|existing| existing.name == line.name) {
            Some(existing) => {
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "merged quantity for item {} is out of range",
                        line.name
                    ))
                })?;
            }
            None => destination.push(line.clone()),
        }
    }
    Ok(())
}
