mod common;

use restaurant_pos_api::{
    business_day::day_bounds,
    dto::orders::{CreateOrderRequest, MergeTablesRequest, OrderItemInput, UpdateOrderRequest},
    entity::sea_orm_active_enums::OrderState,
    error::AppError,
    services::{merge_service, order_service, report_service, settlement_service},
};
use rust_decimal::Decimal;

fn order_of(items: &[(&str, i64, i32)]) -> CreateOrderRequest {
    let items: Vec<OrderItemInput> = items
        .iter()
        .map(|&(name, price, quantity)| OrderItemInput {
            name: name.into(),
            price: Decimal::from(price),
            quantity,
            taste: None,
            is_canceled: None,
        })
        .collect();
    let subtotal: Decimal = items
        .iter()
        .map(|item| item.price * Decimal::from(item.quantity))
        .sum();
    CreateOrderRequest {
        items,
        subtotal,
        cgst: Decimal::ONE,
        sgst: Decimal::ONE,
        total: subtotal + Decimal::TWO,
        is_temporary: None,
        ac_percentage_amount: None,
        is_print: None,
    }
}

// Integration flow: merge two tables, then mark and settle the merged bill.
#[tokio::test]
async fn merge_then_settle_rewrites_the_bill() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let t1 = common::create_table(&state, "T1").await?;
    let t2 = common::create_table(&state, "T2").await?;

    let destination =
        order_service::create_order(&state, t1, order_of(&[("Tea", 20, 2), ("Samosa", 15, 1)]))
            .await?;
    let source =
        order_service::create_order(&state, t2, order_of(&[("Tea", 20, 3), ("Lassi", 40, 1)]))
            .await?;

    assert!(matches!(
        merge_service::merge_tables(
            &state,
            MergeTablesRequest {
                destination_table_id: t1,
                source_table_id: t1,
            },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));

    let merged = merge_service::merge_tables(
        &state,
        MergeTablesRequest {
            destination_table_id: t1,
            source_table_id: t2,
        },
    )
    .await?;
    assert!(merged.success);
    let lines: Vec<(&str, i32)> = merged
        .merged_order
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.quantity))
        .collect();
    assert_eq!(lines, vec![("Tea", 5), ("Samosa", 1), ("Lassi", 1)]);
    assert_eq!(
        merged.merged_order.subtotal,
        destination.subtotal + source.subtotal
    );
    assert_eq!(merged.merged_order.cgst, Decimal::TWO);
    assert_eq!(merged.merged_order.total, destination.total + source.total);

    let retired = order_service::get_by_number(&state, &source.order_number).await?;
    assert!(retired.is_merged);
    assert!(!retired.is_temporary);
    assert_eq!(retired.state, OrderState::MergedAway);
    assert_eq!(retired.destination_table_name.as_deref(), Some("T1"));
    assert_eq!(
        retired.destination_order_number.as_deref(),
        Some(destination.order_number.as_str())
    );

    // Today's merged bills list the source and nothing else.
    let (start, end) = day_bounds(state.day_boundary.today());
    let merged_today = order_service::merged_between(&state, start, end).await?;
    assert_eq!(merged_today.len(), 1);
    assert_eq!(merged_today[0].order_number, source.order_number);

    // Menu statistics skip the merged-away copy of the source lines.
    let stats = report_service::menu_statistics(&state, None, None).await?;
    assert_eq!(stats["Tea"].total_quantity, 5);
    assert_eq!(stats["Lassi"].count, 1);

    // A merged-away order is frozen.
    assert!(matches!(
        order_service::update_by_number(&state, &source.order_number, UpdateOrderRequest::default())
            .await,
        Err(AppError::BadRequest(_))
    ));
    assert!(matches!(
        settlement_service::mark_for_settle(&state, &source.order_number).await,
        Err(AppError::BadRequest(_))
    ));

    // The source table has nothing left to merge.
    assert!(matches!(
        merge_service::merge_tables(
            &state,
            MergeTablesRequest {
                destination_table_id: t1,
                source_table_id: t2,
            },
        )
        .await,
        Err(AppError::NotFound(_))
    ));

    // Settlement needs the settle category and at least one marked order.
    assert!(matches!(
        settlement_service::apply_settlement(&state).await,
        Err(AppError::NotFound(_))
    ));
    common::settle_category(
        &state,
        &[("Veg Thali", Decimal::from(60)), ("Water Bottle", Decimal::from(20))],
    )
    .await?;
    assert!(matches!(
        settlement_service::apply_settlement(&state).await,
        Err(AppError::NotFound(_))
    ));

    // The table's running bill cannot be marked and stays open at its table.
    assert!(matches!(
        settlement_service::mark_for_settle(&state, &destination.order_number).await,
        Err(AppError::BadRequest(_))
    ));
    let still_open = order_service::open_orders_for_table(&state, t1).await?;
    assert_eq!(still_open.len(), 1);
    assert_eq!(still_open[0].order_number, destination.order_number);
    assert_eq!(still_open[0].flag, 0);
    assert_eq!(report_service::temporary_orders_count(&state).await?, 1);

    let closed = order_service::update_by_number(
        &state,
        &destination.order_number,
        UpdateOrderRequest {
            is_temporary: Some(false),
            ..Default::default()
        },
    )
    .await?;
    assert!(!closed.is_temporary);

    let marked = settlement_service::mark_for_settle(&state, &destination.order_number).await?;
    assert_eq!(marked.message, "Flag updated successfully");
    settlement_service::mark_for_settle(&state, &destination.order_number).await?;
    let pending = order_service::get_by_number(&state, &destination.order_number).await?;
    assert_eq!(pending.flag, 1);

    let settled = settlement_service::apply_settlement(&state).await?;
    assert_eq!(settled.len(), 1);
    let bill = &settled[0];
    assert_eq!(bill.flag, 2);
    assert_eq!(bill.state, OrderState::Settled);
    let lines: Vec<(&str, i32)> = bill
        .items
        .iter()
        .map(|item| (item.name.as_str(), item.quantity))
        .collect();
    assert_eq!(lines, vec![("Veg Thali", 1), ("Water Bottle", 1)]);
    assert_eq!(bill.subtotal, Decimal::from(80));
    assert_eq!(bill.total, bill.subtotal);
    assert_eq!(bill.cgst, Decimal::ZERO);
    assert_eq!(bill.cash_amount.as_deref(), Some("100.00"));
    assert_eq!(bill.discount.as_deref(), Some("0.00"));

    // Nothing is left marked.
    assert!(matches!(
        settlement_service::apply_settlement(&state).await,
        Err(AppError::NotFound(_))
    ));

    // Summed quantities that leave the i32 range abort the merge untouched.
    let t3 = common::create_table(&state, "T3").await?;
    let t4 = common::create_table(&state, "T4").await?;
    order_service::create_order(&state, t3, order_of(&[("Chef Special", 0, i32::MAX)])).await?;
    let t4_bill = order_service::create_order(&state, t4, order_of(&[("Chef Special", 0, 1)])).await?;
    assert!(matches!(
        merge_service::merge_tables(
            &state,
            MergeTablesRequest {
                destination_table_id: t3,
                source_table_id: t4,
            },
        )
        .await,
        Err(AppError::BadRequest(_))
    ));
    let untouched = order_service::get_by_number(&state, &t4_bill.order_number).await?;
    assert!(untouched.is_temporary);
    assert!(!untouched.is_merged);

    Ok(())
}
