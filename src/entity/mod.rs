pub mod dining_tables;
pub mod kot_items;
pub mod kots;
pub mod menu_categories;
pub mod menu_entries;
pub mod order_items;
pub mod order_sequences;
pub mod orders;
pub mod sea_orm_active_enums;
pub mod stock_items;

pub use dining_tables::Entity as DiningTables;
pub use kot_items::Entity as KotItems;
pub use kots::Entity as Kots;
pub use menu_categories::Entity as MenuCategories;
pub use menu_entries::Entity as MenuEntries;
pub use order_items::Entity as OrderItems;
pub use order_sequences::Entity as OrderSequences;
pub use orders::Entity as Orders;
pub use stock_items::Entity as StockItems;
