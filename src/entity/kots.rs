use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub table_id: Uuid,
    pub waiter_name: Option<String>,
    pub settled: bool,
    pub kot_date: DateTimeWithTimeZone,
    pub created_at: DateTimeWithTimeZone,
    pub inserted_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::kot_items::Entity")]
    KotItems,
}

impl Related<super::kot_items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::KotItems.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
