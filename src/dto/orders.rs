use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Order;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    #[serde(default)]
    pub taste: Option<String>,
    #[serde(default)]
    pub is_canceled: Option<bool>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
    pub subtotal: Decimal,
    #[serde(rename = "CGST")]
    pub cgst: Decimal,
    #[serde(rename = "SGST")]
    pub sgst: Decimal,
    pub total: Decimal,
    pub is_temporary: Option<bool>,
    pub ac_percentage_amount: Option<Decimal>,
    pub is_print: Option<i32>,
}

/// Body shared by the three update policies. Omitted fields keep their stored value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderRequest {
    pub items: Option<Vec<OrderItemInput>>,
    pub table_id: Option<Uuid>,
    pub subtotal: Option<Decimal>,
    #[serde(rename = "CGST")]
    pub cgst: Option<Decimal>,
    #[serde(rename = "SGST")]
    pub sgst: Option<Decimal>,
    pub total: Option<Decimal>,
    pub is_temporary: Option<bool>,
    pub ac_percentage_amount: Option<Decimal>,
    pub is_print: Option<i32>,
    pub cash_amount: Option<String>,
    pub online_payment_amount: Option<String>,
    pub due_amount: Option<String>,
    pub complimentary_amount: Option<String>,
    pub discount: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeTablesRequest {
    pub destination_table_id: Uuid,
    pub source_table_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    pub success: bool,
    pub merged_order: Order,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderWithTableName {
    #[serde(flatten)]
    pub order: Order,
    pub table_name: String,
}
