use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemQuantity {
    pub item_name: String,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ItemQuantityList {
    pub items: Vec<ItemQuantity>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableQuantity {
    pub available_quantity: i32,
    pub unit: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemainingQuantity {
    pub item_name: String,
    pub remaining_quantity: i32,
    pub unit: String,
}
