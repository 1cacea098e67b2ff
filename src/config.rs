use std::env;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Hour (0-23) before which stamps are filed under the previous business day.
    pub day_cutoff_hour: u32,
    pub day_offset_minutes: i64,
    pub settle_category: String,
    pub settle_cash_amount: String,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let day_cutoff_hour = env::var("BUSINESS_DAY_CUTOFF_HOUR")
            .ok()
            .and_then(|h| h.parse::<u32>().ok())
            .filter(|h| *h < 24)
            .unwrap_or(3);
        let day_offset_minutes = env::var("BUSINESS_DAY_OFFSET_MINUTES")
            .ok()
            .and_then(|m| m.parse::<i64>().ok())
            .unwrap_or(0);
        let settle_category =
            env::var("SETTLE_CATEGORY").unwrap_or_else(|_| "Settle".to_string());
        let settle_cash_amount =
            env::var("SETTLE_CASH_AMOUNT").unwrap_or_else(|_| "100.00".to_string());
        Ok(Self {
            port,
            database_url,
            host,
            day_cutoff_hour,
            day_offset_minutes,
            settle_category,
            settle_cash_amount,
        })
    }
}
