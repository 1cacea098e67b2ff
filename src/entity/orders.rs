use sea_orm::entity::prelude::*;

use super::sea_orm_active_enums::OrderState;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub order_number: String,
    pub table_id: Uuid,
    pub subtotal: Decimal,
    pub cgst: Decimal,
    pub sgst: Decimal,
    pub total: Decimal,
    pub ac_percentage_amount: Option<Decimal>,
    pub is_print: i32,
    pub state: OrderState,
    pub cash_amount: Option<String>,
    pub online_payment_amount: Option<String>,
    pub complimentary_amount: Option<String>,
    pub due_amount: Option<String>,
    pub discount: Option<String>,
    pub destination_table_name: Option<String>,
    pub destination_order_number: Option<String>,
    pub order_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub inserted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::order_items::Entity")]
    OrderItems,
}

impl Related<super::order_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
