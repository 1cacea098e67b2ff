use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "menu_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::menu_entries::Entity")]
    MenuEntries,
}

impl Related<super::menu_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MenuEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
