use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KotItemInput {
    pub name: String,
    pub quantity: i32,
    #[serde(default)]
    pub taste: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateKotRequest {
    #[serde(default)]
    pub items: Vec<KotItemInput>,
    pub waiter_name: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CancelKotItemsRequest {
    #[serde(default)]
    pub canceled_item_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyItemQuantity {
    pub item_name: String,
    pub date: String,
    pub total_quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DailyItemList {
    pub items: Vec<DailyItemQuantity>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CanceledItemList {
    pub canceled_items: Vec<DailyItemQuantity>,
}
