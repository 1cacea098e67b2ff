use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entity::{
    kot_items::Model as KotItemModel, kots::Model as KotModel,
    order_items::Model as OrderItemModel, orders::Model as OrderModel,
    sea_orm_active_enums::OrderState,
};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub order_number: String,
    pub table_id: Uuid,
    pub items: Vec<OrderItem>,
    pub subtotal: Decimal,
    #[serde(rename = "CGST")]
    pub cgst: Decimal,
    #[serde(rename = "SGST")]
    pub sgst: Decimal,
    pub total: Decimal,
    pub ac_percentage_amount: Option<Decimal>,
    pub state: OrderState,
    pub is_temporary: bool,
    pub is_merged: bool,
    pub flag: i32,
    pub is_print: i32,
    pub cash_amount: Option<String>,
    pub online_payment_amount: Option<String>,
    pub complimentary_amount: Option<String>,
    pub due_amount: Option<String>,
    pub discount: Option<String>,
    pub destination_table_name: Option<String>,
    pub destination_order_number: Option<String>,
    pub order_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub taste: String,
    pub is_canceled: bool,
    /// Warehouse stock left right after this line was booked; absent for untracked items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock_qty: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Kot {
    pub id: Uuid,
    pub table_id: Uuid,
    pub items: Vec<KotItem>,
    pub waiter_name: Option<String>,
    #[serde(rename = "setteled")]
    pub settled: bool,
    #[serde(rename = "KOTDate")]
    pub kot_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KotItem {
    pub name: String,
    pub quantity: i32,
    pub taste: String,
    pub is_canceled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    pub item_name: String,
    pub stock_qty: i32,
}

impl Order {
    pub fn from_entity(model: OrderModel, items: Vec<OrderItemModel>) -> Self {
        Order {
            id: model.id,
            order_number: model.order_number,
            table_id: model.table_id,
            items: items.into_iter().map(OrderItem::from).collect(),
            subtotal: model.subtotal,
            cgst: model.cgst,
            sgst: model.sgst,
            total: model.total,
            ac_percentage_amount: model.ac_percentage_amount,
            state: model.state,
            is_temporary: model.state.is_temporary(),
            is_merged: model.state.is_merged(),
            flag: model.state.flag(),
            is_print: model.is_print,
            cash_amount: model.cash_amount,
            online_payment_amount: model.online_payment_amount,
            complimentary_amount: model.complimentary_amount,
            due_amount: model.due_amount,
            discount: model.discount,
            destination_table_name: model.destination_table_name,
            destination_order_number: model.destination_order_number,
            order_date: model.order_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<OrderItemModel> for OrderItem {
    fn from(model: OrderItemModel) -> Self {
        OrderItem {
            name: model.name,
            price: model.price,
            quantity: model.quantity,
            taste: model.taste,
            is_canceled: model.is_canceled,
            stock_qty: model.stock_qty,
        }
    }
}

impl Kot {
    pub fn from_entity(model: KotModel, items: Vec<KotItemModel>) -> Self {
        Kot {
            id: model.id,
            table_id: model.table_id,
            items: items.into_iter().map(KotItem::from).collect(),
            waiter_name: model.waiter_name,
            settled: model.settled,
            kot_date: model.kot_date.with_timezone(&Utc),
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

impl From<KotItemModel> for KotItem {
    fn from(model: KotItemModel) -> Self {
        KotItem {
            name: model.name,
            quantity: model.quantity,
            taste: model.taste,
            is_canceled: model.is_canceled,
        }
    }
}
