//! Read-only aggregations over persisted orders.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter,
    Statement,
};

use crate::{
    business_day::{day_bounds, month_start, previous_month_bounds},
    dto::reports::{MenuStatistic, MenuwiseSummary, MonthTotal, PaymentSummary},
    entity::{
        orders::{Column as OrderCol, Entity as Orders, Model as OrderModel},
        sea_orm_active_enums::OrderState,
    },
    error::{AppError, AppResult},
    models::OrderItem,
    services::order_service::attach_items,
    state::AppState,
};

/// Per-item totals over non-merged orders whose business date falls between
/// the given days (inclusive). A missing bound leaves that side open.
pub async fn menu_statistics(
    state: &AppState,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> AppResult<BTreeMap<String, MenuStatistic>> {
    let mut query = Orders::find().filter(OrderCol::State.ne(OrderState::MergedAway));
    if let Some(start) = start_date {
        query = query.filter(OrderCol::OrderDate.gte(day_bounds(start).0));
    }
    if let Some(end) = end_date {
        query = query.filter(OrderCol::OrderDate.lt(day_bounds(end).1));
    }

    let orders = attach_items(&state.orm, query.all(&state.orm).await?).await?;
    Ok(tally_menu(orders.iter().flat_map(|order| order.items.iter())))
}

pub async fn menuwise(
    state: &AppState,
    date: NaiveDate,
    menu_name: &str,
) -> AppResult<MenuwiseSummary> {
    let (start, end) = day_bounds(date);
    let orders = Orders::find()
        .filter(OrderCol::OrderDate.gte(start))
        .filter(OrderCol::OrderDate.lt(end))
        .all(&state.orm)
        .await?;

    let orders = attach_items(&state.orm, orders).await?;
    Ok(summarize_menu_item(
        orders.iter().flat_map(|order| order.items.iter()),
        menu_name,
    ))
}

/// Open orders, one per occupied table.
pub async fn temporary_orders_count(state: &AppState) -> AppResult<u64> {
    Ok(Orders::find()
        .filter(OrderCol::State.eq(OrderState::Open))
        .count(&state.orm)
        .await?)
}

pub async fn total_for_current_date(state: &AppState) -> AppResult<Decimal> {
    let (start, end) = day_bounds(state.day_boundary.today());
    sum_totals(&state.orm, start, end).await
}

pub async fn total_for_previous_month(state: &AppState) -> AppResult<Decimal> {
    let today = state.day_boundary.today();
    let (start, end) = previous_month_bounds(today).ok_or_else(|| {
        AppError::Internal(anyhow::anyhow!("no previous month for {today}"))
    })?;
    sum_totals(&state.orm, start, end).await
}

#[derive(Debug, FromQueryResult)]
struct TotalRow {
    total: Decimal,
}

async fn sum_totals<C: ConnectionTrait>(
    conn: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> AppResult<Decimal> {
    let row = TotalRow::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT COALESCE(SUM(total), 0) AS total
        FROM orders
        WHERE created_at >= $1 AND created_at < $2
        "#,
        [start.into(), end.into()],
    ))
    .one(conn)
    .await?;
    Ok(row.map(|r| r.total).unwrap_or(Decimal::ZERO))
}

#[derive(Debug, FromQueryResult)]
struct MonthRow {
    month: i32,
    total: Decimal,
}

/// Order totals per calendar month of the current year; months without
/// orders report zero.
pub async fn totals_by_month(state: &AppState) -> AppResult<Vec<MonthTotal>> {
    let year = state.day_boundary.today().year();
    let start = month_start(year, 1)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("invalid year {year}")))?;

    let rows = MonthRow::find_by_statement(Statement::from_sql_and_values(
        state.orm.get_database_backend(),
        r#"
        SELECT EXTRACT(MONTH FROM created_at AT TIME ZONE 'UTC')::INT AS month,
               COALESCE(SUM(total), 0) AS total
        FROM orders
        WHERE created_at >= $1
        GROUP BY 1
        "#,
        [start.into()],
    ))
    .all(&state.orm)
    .await?;

    Ok(fill_months(rows.into_iter().map(|row| (row.month, row.total))))
}

/// Payment totals over orders whose business date is today or later.
pub async fn payment_summary(state: &AppState) -> AppResult<PaymentSummary> {
    let (start, _) = day_bounds(state.day_boundary.today());
    let orders = Orders::find()
        .filter(OrderCol::OrderDate.gte(start))
        .all(&state.orm)
        .await?;
    Ok(accumulate_payments(&orders))
}

fn tally_menu<'a>(items: impl Iterator<Item = &'a OrderItem>) -> BTreeMap<String, MenuStatistic> {
    let mut stats: BTreeMap<String, MenuStatistic> = BTreeMap::new();
    for item in items.filter(|item| !item.is_canceled) {
        let line_total = item.price * Decimal::from(item.quantity);
        stats
            .entry(item.name.clone())
            .and_modify(|stat| {
                stat.count += 1;
                stat.total_quantity += i64::from(item.quantity);
                stat.total_price += line_total;
            })
            .or_insert_with(|| MenuStatistic {
                count: 1,
                total_quantity: i64::from(item.quantity),
                total_price: line_total,
                price: item.price,
            });
    }
    stats
}

fn summarize_menu_item<'a>(
    items: impl Iterator<Item = &'a OrderItem>,
    menu_name: &str,
) -> MenuwiseSummary {
    items
        .filter(|item| item.name == menu_name && !item.is_canceled)
        .fold(MenuwiseSummary::default(), |mut acc, item| {
            acc.menu_counts += 1;
            acc.total_quantity += i64::from(item.quantity);
            acc.total_price += item.price * Decimal::from(item.quantity);
            acc
        })
}

fn fill_months(rows: impl Iterator<Item = (i32, Decimal)>) -> Vec<MonthTotal> {
    let found: BTreeMap<i32, Decimal> = rows.collect();
    (1..=12u32)
        .map(|month| MonthTotal {
            month,
            total_amount: found.get(&(month as i32)).copied().unwrap_or(Decimal::ZERO),
        })
        .collect()
}

/// Missing or non-numeric amounts become NaN and poison their sum.
fn parse_amount(raw: Option<&str>) -> f64 {
    raw.and_then(|value| value.trim().parse::<f64>().ok())
        .unwrap_or(f64::NAN)
}

fn accumulate_payments(orders: &[OrderModel]) -> PaymentSummary {
    orders
        .iter()
        .fold(PaymentSummary::default(), |mut summary, order| {
            summary.cash_amount += parse_amount(order.cash_amount.as_deref());
            summary.due_amount += parse_amount(order.due_amount.as_deref());
            summary.online_payment_amount +=
                parse_amount(order.online_payment_amount.as_deref());
            summary.complimentary_amount += parse_amount(order.complimentary_amount.as_deref());
            summary.discount += parse_amount(order.discount.as_deref());
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn item(name: &str, price: i64, quantity: i32, is_canceled: bool) -> OrderItem {
        OrderItem {
            name: name.into(),
            price: Decimal::from(price),
            quantity,
            taste: String::new(),
            is_canceled,
            stock_qty: None,
        }
    }

    fn order_with_payments(cash: Option<&str>, due: Option<&str>) -> OrderModel {
        let stamp = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        OrderModel {
            id: Uuid::new_v4(),
            order_number: "1".into(),
            table_id: Uuid::nil(),
            subtotal: Decimal::ZERO,
            cgst: Decimal::ZERO,
            sgst: Decimal::ZERO,
            total: Decimal::ZERO,
            ac_percentage_amount: None,
            is_print: 0,
            state: OrderState::Finalized,
            cash_amount: cash.map(str::to_string),
            online_payment_amount: Some("0".into()),
            complimentary_amount: Some("0".into()),
            due_amount: due.map(str::to_string),
            discount: Some("0".into()),
            destination_table_name: None,
            destination_order_number: None,
            order_date: stamp.into(),
            created_at: stamp.into(),
            inserted_at: stamp.into(),
        }
    }

    #[test]
    fn menu_tally_skips_canceled_lines_and_keeps_first_price() {
        let items = vec![
            item("Tea", 20, 2, false),
            item("Tea", 25, 1, false),
            item("Tea", 20, 5, true),
            item("Samosa", 15, 3, false),
        ];
        let stats = tally_menu(items.iter());

        let tea = &stats["Tea"];
        assert_eq!(tea.count, 2);
        assert_eq!(tea.total_quantity, 3);
        assert_eq!(tea.total_price, Decimal::from(65));
        assert_eq!(tea.price, Decimal::from(20));
        assert_eq!(stats["Samosa"].total_price, Decimal::from(45));
    }

    #[test]
    fn menuwise_counts_only_the_named_item() {
        let items = vec![
            item("Tea", 20, 2, false),
            item("Coffee", 30, 1, false),
            item("Tea", 20, 1, false),
            item("Tea", 20, 4, true),
        ];
        let summary = summarize_menu_item(items.iter(), "Tea");
        assert_eq!(
            summary,
            MenuwiseSummary {
                menu_counts: 2,
                total_quantity: 3,
                total_price: Decimal::from(60),
            }
        );
    }

    #[test]
    fn every_month_is_reported() {
        let months = fill_months(vec![(3, Decimal::from(150)), (11, Decimal::from(20))].into_iter());
        assert_eq!(months.len(), 12);
        assert_eq!(months[0].total_amount, Decimal::ZERO);
        assert_eq!(months[2].total_amount, Decimal::from(150));
        assert_eq!(months[10].month, 11);
        assert_eq!(months[10].total_amount, Decimal::from(20));
    }

    #[test]
    fn payments_sum_numeric_strings() {
        let orders = vec![
            order_with_payments(Some("100.50"), Some("0")),
            order_with_payments(Some("49.50"), Some("10")),
        ];
        let summary = accumulate_payments(&orders);
        assert_eq!(summary.cash_amount, 150.0);
        assert_eq!(summary.due_amount, 10.0);
    }

    #[test]
    fn missing_or_garbage_amount_poisons_only_its_field() {
        let orders = vec![
            order_with_payments(Some("100"), None),
            order_with_payments(Some("abc"), Some("5")),
        ];
        let summary = accumulate_payments(&orders);
        assert!(summary.cash_amount.is_nan());
        assert!(summary.due_amount.is_nan());
        assert_eq!(summary.discount, 0.0);

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json["cashAmount"].is_null());
    }

    #[test]
    fn empty_day_reports_zeroes() {
        assert_eq!(accumulate_payments(&[]), PaymentSummary::default());
    }
}
