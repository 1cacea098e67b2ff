//! Inventory bookkeeping for ordered items.
//!
//! Every tracked item carries two counters on one row: the catalog count
//! shown on the menu and the warehouse count used for procurement. Only the
//! warehouse count can block an order.

use chrono::{DateTime, Utc};
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ConnectionTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder,
    QuerySelect, Set, Statement,
};

use crate::{
    dto::stock::{AvailableQuantity, ItemQuantity, RemainingQuantity},
    entity::stock_items::{ActiveModel as StockActive, Column as StockCol, Entity as StockItems},
    error::{AppError, AppResult},
    models::StockLevel,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockLevels {
    pub catalog: i32,
    pub warehouse: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingError {
    /// The warehouse cannot cover the quantity.
    Shortage,
    /// A counter would leave the `i32` range.
    Overflow,
}

impl StockLevels {
    /// Take `quantity` out of stock. The catalog counter is only lowered when
    /// it can cover the quantity too.
    pub fn consume(self, quantity: i32) -> Result<Self, BookingError> {
        if self.warehouse < quantity {
            return Err(BookingError::Shortage);
        }
        let catalog = if self.catalog >= quantity {
            self.catalog - quantity
        } else {
            self.catalog
        };
        let warehouse = self
            .warehouse
            .checked_sub(quantity)
            .ok_or(BookingError::Overflow)?;
        Ok(Self { catalog, warehouse })
    }

    /// Apply the difference between a newly requested and a previously
    /// booked quantity. Negative deltas put stock back.
    pub fn adjust(self, delta: i32) -> Result<Self, BookingError> {
        if self.warehouse < delta {
            return Err(BookingError::Shortage);
        }
        Ok(Self {
            catalog: self.catalog.checked_sub(delta).ok_or(BookingError::Overflow)?,
            warehouse: self.warehouse.checked_sub(delta).ok_or(BookingError::Overflow)?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consumption {
    /// The item has no stock row; nothing was booked.
    Untracked,
    Tracked(StockLevels),
}

impl Consumption {
    pub fn remaining_warehouse(&self) -> Option<i32> {
        match self {
            Consumption::Untracked => None,
            Consumption::Tracked(levels) => Some(levels.warehouse),
        }
    }
}

pub async fn consume<C: ConnectionTrait>(
    conn: &C,
    item_name: &str,
    quantity: i32,
) -> AppResult<Consumption> {
    book(conn, item_name, |levels| levels.consume(quantity)).await
}

pub async fn adjust<C: ConnectionTrait>(
    conn: &C,
    item_name: &str,
    delta: i32,
) -> AppResult<Consumption> {
    book(conn, item_name, |levels| levels.adjust(delta)).await
}

async fn book<C, F>(conn: &C, item_name: &str, op: F) -> AppResult<Consumption>
where
    C: ConnectionTrait,
    F: FnOnce(StockLevels) -> Result<StockLevels, BookingError>,
{
    let record = StockItems::find_by_id(item_name.to_owned())
        .lock(LockType::Update)
        .one(conn)
        .await?;
    let Some(record) = record else {
        tracing::debug!(item = item_name, "item not tracked, skipping stock booking");
        return Ok(Consumption::Untracked);
    };

    let current = StockLevels {
        catalog: record.catalog_qty,
        warehouse: record.warehouse_qty,
    };
    let next = op(current).map_err(|err| match err {
        BookingError::Shortage => AppError::InsufficientStock(item_name.to_owned()),
        BookingError::Overflow => {
            AppError::BadRequest(format!("quantity for item {item_name} is out of range"))
        }
    })?;

    if next != current {
        let mut active: StockActive = record.into();
        active.catalog_qty = Set(next.catalog);
        active.warehouse_qty = Set(next.warehouse);
        active.update(conn).await?;
    }

    tracing::debug!(
        item = item_name,
        catalog = next.catalog,
        warehouse = next.warehouse,
        "stock booked"
    );
    Ok(Consumption::Tracked(next))
}

/// Items whose warehouse count has reached their own low-stock threshold.
pub async fn low_stock<C: ConnectionTrait>(conn: &C) -> AppResult<Vec<StockLevel>> {
    let items = StockItems::find()
        .filter(Expr::col(StockCol::WarehouseQty).lte(Expr::col(StockCol::LessStock)))
        .order_by_asc(StockCol::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(|item| StockLevel {
            item_name: item.name,
            stock_qty: item.warehouse_qty,
        })
        .collect();
    Ok(items)
}

pub async fn available_quantity<C: ConnectionTrait>(
    conn: &C,
    item_name: &str,
) -> AppResult<AvailableQuantity> {
    let item = StockItems::find_by_id(item_name.to_owned()).one(conn).await?;
    Ok(match item {
        Some(item) => AvailableQuantity {
            available_quantity: item.warehouse_qty,
            unit: item.unit,
        },
        None => AvailableQuantity {
            available_quantity: 0,
            unit: String::new(),
        },
    })
}

pub async fn remaining_quantities<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Vec<RemainingQuantity>> {
    let items = StockItems::find()
        .order_by_asc(StockCol::Name)
        .all(conn)
        .await?
        .into_iter()
        .map(|item| RemainingQuantity {
            item_name: item.name,
            remaining_quantity: item.warehouse_qty,
            unit: item.unit,
        })
        .collect();
    Ok(items)
}

#[derive(Debug, FromQueryResult)]
struct ItemTotalRow {
    item_name: String,
    total_quantity: i64,
}

/// Quantity sent to the kitchen per item for tickets created in `[start, end)`,
/// largest first.
pub async fn top_consumed<C: ConnectionTrait>(
    conn: &C,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    limit: u64,
) -> AppResult<Vec<ItemQuantity>> {
    let rows = ItemTotalRow::find_by_statement(Statement::from_sql_and_values(
        conn.get_database_backend(),
        r#"
        SELECT ki.name AS item_name, SUM(ki.quantity)::BIGINT AS total_quantity
        FROM kot_items ki
        JOIN kots k ON k.id = ki.kot_id
        WHERE k.created_at >= $1 AND k.created_at < $2
        GROUP BY ki.name
        ORDER BY total_quantity DESC, ki.name ASC
        LIMIT $3
        "#,
        [start.into(), end.into(), (limit as i64).into()],
    ))
    .all(conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| ItemQuantity {
            item_name: row.item_name,
            total_quantity: row.total_quantity,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn levels(catalog: i32, warehouse: i32) -> StockLevels {
        StockLevels { catalog, warehouse }
    }

    #[test]
    fn consume_lowers_both_counters() {
        assert_eq!(levels(10, 10).consume(2), Ok(levels(8, 8)));
    }

    #[test]
    fn warehouse_shortage_blocks_and_leaves_levels_untouched() {
        let before = levels(10, 1);
        assert_eq!(before.consume(2), Err(BookingError::Shortage));
        assert_eq!(before, levels(10, 1));
    }

    #[test]
    fn second_consume_past_zero_fails() {
        let after_first = levels(5, 5).consume(4).unwrap();
        assert_eq!(after_first, levels(1, 1));
        assert_eq!(after_first.consume(2), Err(BookingError::Shortage));
    }

    #[test]
    fn catalog_shortage_is_not_blocking() {
        assert_eq!(levels(1, 10).consume(3), Ok(levels(1, 7)));
    }

    #[test]
    fn adjust_applies_only_the_delta() {
        let old_qty = 2;
        let new_qty = 5;
        let delta = new_qty - old_qty;
        assert_eq!(levels(8, 8).adjust(delta), Ok(levels(5, 5)));
    }

    #[test]
    fn negative_adjust_returns_stock() {
        assert_eq!(levels(3, 3).adjust(-2), Ok(levels(5, 5)));
        assert_eq!(levels(0, 0).adjust(-1), Ok(levels(1, 1)));
    }

    #[test]
    fn adjust_beyond_warehouse_fails() {
        assert_eq!(levels(8, 2).adjust(3), Err(BookingError::Shortage));
    }

    #[test]
    fn returning_stock_past_i32_max_is_an_overflow() {
        assert_eq!(
            levels(i32::MAX, i32::MAX).adjust(-1),
            Err(BookingError::Overflow)
        );
        assert_eq!(levels(5, i32::MAX).adjust(-1), Err(BookingError::Overflow));
        assert_eq!(levels(i32::MIN, 10).adjust(1), Err(BookingError::Overflow));
    }

    #[test]
    fn untracked_consumption_reports_no_stock() {
        assert_eq!(Consumption::Untracked.remaining_warehouse(), None);
        assert_eq!(
            Consumption::Tracked(levels(4, 7)).remaining_warehouse(),
            Some(7)
        );
    }
}
