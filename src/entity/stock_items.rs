use sea_orm::entity::prelude::*;

/// Both inventory counters of one item, kept on a single row so they are
/// always locked and written together.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "stock_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub catalog_qty: i32,
    pub warehouse_qty: i32,
    pub unit: String,
    pub less_stock: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
