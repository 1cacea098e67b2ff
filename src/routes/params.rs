use axum::extract::{FromRequest, FromRequestParts};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{business_day::days_bounds, error::AppError};

/// `axum::Json` whose rejections surface as `{"error": ...}` 400s.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Path extractor; a malformed id is a bad request, not a plain-text 400.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct AppPath<T>(pub T);

/// Inclusive `YYYY-MM-DD` day range; each missing bound means the current
/// business day.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl DateRangeQuery {
    pub fn bounds(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        days_bounds(
            self.start_date.unwrap_or(today),
            self.end_date.unwrap_or(today),
        )
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MenuwiseQuery {
    pub date: NaiveDate,
    pub menu_name: String,
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TopConsumedQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub limit: Option<u64>,
}

impl TopConsumedQuery {
    pub fn bounds(&self, today: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
        days_bounds(
            self.start_date.unwrap_or(today),
            self.end_date.unwrap_or(today),
        )
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(10).clamp(1, 100)
    }
}

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailableQuantityQuery {
    pub product_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_consumed_limit_defaults_and_clamps() {
        let query = |limit| TopConsumedQuery {
            start_date: None,
            end_date: None,
            limit,
        };
        assert_eq!(query(None).limit(), 10);
        assert_eq!(query(Some(0)).limit(), 1);
        assert_eq!(query(Some(500)).limit(), 100);
        assert_eq!(query(Some(4)).limit(), 4);
    }

    #[test]
    fn date_range_parses_camel_case_days() {
        let range: DateRangeQuery =
            serde_json::from_str(r#"{"startDate":"2024-05-01","endDate":"2024-05-03"}"#).unwrap();
        assert_eq!(range.start_date, NaiveDate::from_ymd_opt(2024, 5, 1));
        assert_eq!(range.end_date, NaiveDate::from_ymd_opt(2024, 5, 3));
    }

    #[test]
    fn missing_bounds_fall_back_to_today() {
        let today = NaiveDate::from_ymd_opt(2024, 5, 10).unwrap();
        let (start, end) = DateRangeQuery::default().bounds(today);
        assert_eq!(start.date_naive(), today);
        assert_eq!(end.date_naive(), today.succ_opt().unwrap());

        let since = DateRangeQuery {
            start_date: NaiveDate::from_ymd_opt(2024, 5, 1),
            end_date: None,
        };
        let (start, end) = since.bounds(today);
        assert_eq!(start.date_naive(), NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(end.date_naive(), today.succ_opt().unwrap());
    }
}
