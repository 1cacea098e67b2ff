use crate::{
    business_day::DayBoundary,
    config::AppConfig,
    db::{DbPool, OrmConn},
};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub day_boundary: DayBoundary,
    pub settle: SettleSettings,
}

/// What the settlement batch rewrites flagged orders into.
#[derive(Debug, Clone)]
pub struct SettleSettings {
    pub category: String,
    pub cash_amount: String,
}

impl AppState {
    pub fn new(pool: DbPool, orm: OrmConn, config: &AppConfig) -> Self {
        Self {
            pool,
            orm,
            day_boundary: DayBoundary::new(config.day_cutoff_hour, config.day_offset_minutes),
            settle: SettleSettings {
                category: config.settle_category.clone(),
                cash_amount: config.settle_cash_amount.clone(),
            },
        }
    }
}
