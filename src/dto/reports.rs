use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NextOrderNumber {
    pub next_order_number: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TemporaryOrdersCount {
    pub temporary_orders_count: u64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalForCurrentDate {
    pub total_for_current_date: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalForPreviousMonth {
    pub total_for_previous_month: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MonthTotal {
    pub month: u32,
    pub total_amount: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalAmountsByMonth {
    pub total_amounts_by_month: Vec<MonthTotal>,
}

/// Today's payment totals. A sum is `null` when any order carried a missing
/// or non-numeric amount for that field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub cash_amount: f64,
    pub due_amount: f64,
    pub online_payment_amount: f64,
    pub complimentary_amount: f64,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuStatistic {
    pub count: i64,
    pub total_quantity: i64,
    pub total_price: Decimal,
    pub price: Decimal,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuStatistics {
    pub menu_statistics: BTreeMap<String, MenuStatistic>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuwiseSummary {
    pub menu_counts: i64,
    pub total_quantity: i64,
    pub total_price: Decimal,
}
