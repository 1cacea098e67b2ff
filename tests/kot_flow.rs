mod common;

use restaurant_pos_api::{
    business_day::day_bounds,
    dto::{
        kots::{CreateKotRequest, KotItemInput},
        orders::{CreateOrderRequest, OrderItemInput},
    },
    error::AppError,
    services::{kot_service, order_service, stock_ledger},
};
use chrono::TimeDelta;
use rust_decimal::Decimal;

fn ticket_line(name: &str, quantity: i32) -> KotItemInput {
    KotItemInput {
        name: name.into(),
        quantity,
        taste: None,
    }
}

// Integration flow: ticket -> cancel a line on ticket and order -> reports -> settle.
#[tokio::test]
async fn canceling_ticket_lines_reaches_the_open_order() -> anyhow::Result<()> {
    let Some(database_url) = common::database_url() else {
        return Ok(());
    };
    let state = common::setup_state(&database_url).await?;

    let table = common::create_table(&state, "T1").await?;
    let other_table = common::create_table(&state, "T2").await?;

    let order = order_service::create_order(
        &state,
        table,
        CreateOrderRequest {
            items: vec![
                OrderItemInput {
                    name: "Tea".into(),
                    price: Decimal::from(20),
                    quantity: 2,
                    taste: None,
                    is_canceled: None,
                },
                OrderItemInput {
                    name: "Samosa".into(),
                    price: Decimal::from(15),
                    quantity: 1,
                    taste: Some("spicy".into()),
                    is_canceled: None,
                },
            ],
            subtotal: Decimal::from(55),
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            total: Decimal::from(55),
            is_temporary: None,
            ac_percentage_amount: None,
            is_print: None,
        },
    )
    .await?;

    let kot = kot_service::create_ticket(
        &state,
        table,
        CreateKotRequest {
            items: vec![ticket_line("Tea", 2), ticket_line("Samosa", 1)],
            waiter_name: Some("Ravi".into()),
        },
    )
    .await?;
    assert!(!kot.settled);
    assert_eq!(kot.items[0].taste, "");
    assert_eq!(kot.kot_date, kot.created_at);

    // Nothing to cancel on a table without tickets.
    assert!(matches!(
        kot_service::cancel_items(&state, other_table, vec!["Tea".into()]).await,
        Err(AppError::NotFound(_))
    ));

    let canceled = kot_service::cancel_items(&state, table, vec!["Tea".into()]).await?;
    assert_eq!(
        canceled.message,
        "Selected KOT items and corresponding orders canceled successfully"
    );

    // The latest ticket hides the canceled line.
    let latest = kot_service::latest_ticket(&state, table).await?;
    assert_eq!(latest.items.len(), 1);
    assert_eq!(latest.items[0].name, "Samosa");

    // A second ticket is the latest even when its business stamp sorts earlier.
    let second = kot_service::create_ticket(
        &state,
        table,
        CreateKotRequest {
            items: vec![ticket_line("Lassi", 1), ticket_line("Samosa", 2)],
            waiter_name: None,
        },
    )
    .await?;
    common::restamp_kot(&state, second.id, kot.created_at - TimeDelta::seconds(1)).await?;
    let latest = kot_service::latest_ticket(&state, table).await?;
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.items.len(), 2);

    // The open order carries the cancellation too.
    let order = order_service::get_by_number(&state, &order.order_number).await?;
    let tea = order
        .items
        .iter()
        .find(|item| item.name == "Tea")
        .ok_or_else(|| anyhow::anyhow!("tea line missing"))?;
    assert!(tea.is_canceled);
    assert!(!order.items.iter().any(|item| item.name == "Samosa" && item.is_canceled));

    // Saved bills drop the canceled line.
    let bills = order_service::saved_bills(&state, table).await?;
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].items.len(), 1);

    // Reports split live and canceled quantities.
    let live = kot_service::daily_item_quantities(&state.orm, false).await?;
    assert!(live.iter().any(|row| row.item_name == "Samosa" && row.total_quantity == 3));
    assert!(live.iter().any(|row| row.item_name == "Lassi" && row.total_quantity == 1));
    assert!(!live.iter().any(|row| row.item_name == "Tea"));
    let dead = kot_service::daily_item_quantities(&state.orm, true).await?;
    assert!(dead.iter().any(|row| row.item_name == "Tea" && row.total_quantity == 2));

    // Top items count canceled lines too: Samosa 3, Tea 2, Lassi 1.
    let top = kot_service::top_items_today(&state).await?;
    let ranked: Vec<(&str, i64)> = top
        .iter()
        .map(|row| (row.item_name.as_str(), row.total_quantity))
        .collect();
    assert_eq!(ranked, vec![("Samosa", 3), ("Tea", 2), ("Lassi", 1)]);

    let (start, end) = day_bounds(state.day_boundary.today());
    let top_two = stock_ledger::top_consumed(&state.orm, start, end, 2).await?;
    assert_eq!(top_two.len(), 2);
    assert_eq!(top_two[1].item_name, "Tea");
    let tomorrow = day_bounds(end.date_naive());
    assert!(stock_ledger::top_consumed(&state.orm, tomorrow.0, tomorrow.1, 10)
        .await?
        .is_empty());

    // Settling is idempotent and also fine for tables without tickets.
    kot_service::settle(&state, table).await?;
    let settled = kot_service::settle(&state, table).await?;
    assert_eq!(settled.message, "KOTs settled successfully");
    kot_service::settle(&state, other_table).await?;
    assert!(kot_service::latest_ticket(&state, table).await?.settled);

    // Settled tickets can no longer be canceled.
    assert!(matches!(
        kot_service::cancel_items(&state, table, vec!["Samosa".into()]).await,
        Err(AppError::NotFound(_))
    ));

    assert!(matches!(
        kot_service::latest_ticket(&state, other_table).await,
        Err(AppError::NotFound(_))
    ));

    Ok(())
}
