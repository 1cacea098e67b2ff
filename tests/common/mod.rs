#![allow(dead_code)]

use chrono::{DateTime, Utc};
use restaurant_pos_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    entity::{
        dining_tables::ActiveModel as TableActive, kots::Column as KotCol,
        kots::Entity as Kots, menu_categories::ActiveModel as CategoryActive,
        menu_entries::ActiveModel as EntryActive, orders::Column as OrderCol,
        orders::Entity as Orders, stock_items::ActiveModel as StockActive,
        stock_items::Entity as StockItems, stock_items::Model as StockModel,
    },
    state::AppState,
};
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set, Statement};
use uuid::Uuid;

/// Allow skipping when no DB is configured in the environment.
pub fn database_url() -> Option<String> {
    match std::env::var("TEST_DATABASE_URL").or_else(|_| std::env::var("DATABASE_URL")) {
        Ok(url) => Some(url),
        Err(_) => {
            eprintln!("Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests.");
            None
        }
    }
}

pub async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, kot_items, kots, stock_items, menu_entries, \
         menu_categories, dining_tables, order_sequences, audit_logs CASCADE",
    ))
    .await?;

    let pool = create_pool(database_url).await?;
    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        day_cutoff_hour: 3,
        day_offset_minutes: 0,
        settle_category: "Settle".into(),
        settle_cash_amount: "100.00".into(),
    };
    Ok(AppState::new(pool, orm, &config))
}

pub async fn create_table(state: &AppState, name: &str) -> anyhow::Result<Uuid> {
    let table = TableActive {
        id: Set(Uuid::new_v4()),
        table_name: Set(name.into()),
    }
    .insert(&state.orm)
    .await?;
    Ok(table.id)
}

pub async fn stock_item(state: &AppState, name: &str, qty: i32) -> anyhow::Result<()> {
    StockActive {
        name: Set(name.into()),
        catalog_qty: Set(qty),
        warehouse_qty: Set(qty),
        unit: Set("pcs".into()),
        less_stock: Set(2),
    }
    .insert(&state.orm)
    .await?;
    Ok(())
}

pub async fn stock_of(state: &AppState, name: &str) -> anyhow::Result<StockModel> {
    StockItems::find_by_id(name.to_owned())
        .one(&state.orm)
        .await?
        .ok_or_else(|| anyhow::anyhow!("stock row {name} missing"))
}

pub async fn settle_category(state: &AppState, entries: &[(&str, Decimal)]) -> anyhow::Result<()> {
    let category = CategoryActive {
        id: Set(Uuid::new_v4()),
        name: Set(state.settle.category.clone()),
    }
    .insert(&state.orm)
    .await?;
    for (position, (name, price)) in entries.iter().enumerate() {
        EntryActive {
            id: Set(Uuid::new_v4()),
            category_id: Set(category.id),
            position: Set(position as i32),
            name: Set((*name).into()),
            price: Set(*price),
        }
        .insert(&state.orm)
        .await?;
    }
    Ok(())
}

/// Rewrite an order's business timestamp, leaving its insertion time alone.
pub async fn restamp_order(state: &AppState, id: Uuid, created_at: DateTime<Utc>) -> anyhow::Result<()> {
    Orders::update_many()
        .col_expr(OrderCol::CreatedAt, Expr::value(created_at))
        .filter(OrderCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    Ok(())
}

/// Rewrite a ticket's business timestamp, leaving its insertion time alone.
pub async fn restamp_kot(state: &AppState, id: Uuid, created_at: DateTime<Utc>) -> anyhow::Result<()> {
    Kots::update_many()
        .col_expr(KotCol::CreatedAt, Expr::value(created_at))
        .filter(KotCol::Id.eq(id))
        .exec(&state.orm)
        .await?;
    Ok(())
}
