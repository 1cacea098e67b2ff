use restaurant_pos_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
};
use rust_decimal::Decimal;
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    // Ensure migrations are applied.
    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;
    seed_tables(&pool).await?;
    seed_stock(&pool).await?;
    let category_id = ensure_category(&pool, &config.settle_category).await?;
    seed_settle_entries(&pool, category_id).await?;

    println!("Seed completed. {} category ID: {category_id}", config.settle_category);
    Ok(())
}

async fn seed_tables(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for number in 1..=8 {
        let table_name = format!("T{number}");
        sqlx::query(
            r#"
            INSERT INTO dining_tables (id, table_name)
            SELECT $1, $2
            WHERE NOT EXISTS (SELECT 1 FROM dining_tables WHERE table_name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&table_name)
        .execute(pool)
        .await?;
    }

    println!("Seeded dining tables");
    Ok(())
}

async fn seed_stock(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let items = vec![
        ("Tea", 100, "cup", 10),
        ("Coffee", 80, "cup", 10),
        ("Samosa", 60, "pcs", 15),
        ("Lassi", 40, "glass", 5),
    ];

    for (name, qty, unit, less_stock) in items {
        sqlx::query(
            r#"
            INSERT INTO stock_items (name, catalog_qty, warehouse_qty, unit, less_stock)
            VALUES ($1, $2, $2, $3, $4)
            ON CONFLICT (name) DO NOTHING
            "#,
        )
        .bind(name)
        .bind(qty)
        .bind(unit)
        .bind(less_stock)
        .execute(pool)
        .await?;
    }

    println!("Seeded stock items");
    Ok(())
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO menu_categories (id, name)
        VALUES ($1, $2)
        ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .fetch_one(pool)
    .await?;

    println!("Ensured menu category {name}");
    Ok(id)
}

async fn seed_settle_entries(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let (existing,): (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM menu_entries WHERE category_id = $1")
            .bind(category_id)
            .fetch_one(pool)
            .await?;
    if existing > 0 {
        println!("Settle entries already present");
        return Ok(());
    }

    let entries = [
        ("Veg Thali", Decimal::new(6000, 2)),
        ("Tea", Decimal::new(2000, 2)),
        ("Water Bottle", Decimal::new(2000, 2)),
    ];
    for (position, (name, price)) in entries.into_iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO menu_entries (id, category_id, position, name, price)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_id)
        .bind(position as i32)
        .bind(name)
        .bind(price)
        .execute(pool)
        .await?;
    }

    println!("Seeded settle entries");
    Ok(())
}
