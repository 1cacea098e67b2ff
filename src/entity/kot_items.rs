use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "kot_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kot_id: Uuid,
    pub position: i32,
    pub name: String,
    pub quantity: i32,
    pub taste: String,
    pub is_canceled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::kots::Entity",
        from = "Column::KotId",
        to = "super::kots::Column::Id",
        on_delete = "Cascade"
    )]
    Kots,
}

impl Related<super::kots::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Kots.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
