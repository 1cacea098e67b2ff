//! Business-date stamping for orders and kitchen tickets.
//!
//! A restaurant's "today" runs past local midnight: anything stamped before
//! the cutoff hour belongs to the previous calendar day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Timelike, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayBoundary {
    cutoff_hour: u32,
    offset: TimeDelta,
}

impl DayBoundary {
    pub fn new(cutoff_hour: u32, offset_minutes: i64) -> Self {
        Self {
            cutoff_hour,
            offset: TimeDelta::minutes(offset_minutes),
        }
    }

    pub fn cutoff_hour(&self) -> u32 {
        self.cutoff_hour
    }

    /// Roll forward a day when at or past the cutoff, roll back a day, then shift.
    pub fn apply(&self, wall_clock: DateTime<Utc>) -> DateTime<Utc> {
        let mut stamp = wall_clock;
        if wall_clock.hour() >= self.cutoff_hour {
            stamp += TimeDelta::days(1);
        }
        stamp - TimeDelta::days(1) + self.offset
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.apply(Utc::now())
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

impl Default for DayBoundary {
    fn default() -> Self {
        Self::new(3, 0)
    }
}

/// Half-open `[start, end)` bounds covering the whole of `date`.
pub fn day_bounds(date: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + TimeDelta::days(1))
}

/// Half-open bounds covering every day from `first` through `last` inclusive.
pub fn days_bounds(first: NaiveDate, last: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let (start, _) = day_bounds(first);
    let (_, end) = day_bounds(last);
    (start, end)
}

pub fn month_start(year: i32, month: u32) -> Option<DateTime<Utc>> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| day_bounds(d).0)
}

/// Bounds of the calendar month preceding the one `today` falls in.
pub fn previous_month_bounds(today: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let end = month_start(today.year(), today.month())?;
    let (year, month) = if today.month() == 1 {
        (today.year() - 1, 12)
    } else {
        (today.year(), today.month() - 1)
    };
    Some((month_start(year, month)?, end))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn stamps_after_cutoff_keep_their_calendar_day() {
        let boundary = DayBoundary::new(3, 0);
        assert_eq!(boundary.apply(at(2024, 5, 10, 14, 0)), at(2024, 5, 10, 14, 0));
        assert_eq!(boundary.apply(at(2024, 5, 10, 3, 0)), at(2024, 5, 10, 3, 0));
    }

    #[test]
    fn late_night_stamps_roll_back_to_previous_day() {
        let boundary = DayBoundary::new(3, 0);
        assert_eq!(boundary.apply(at(2024, 5, 10, 1, 30)), at(2024, 5, 9, 1, 30));
        assert_eq!(boundary.apply(at(2024, 3, 1, 2, 59)), at(2024, 2, 29, 2, 59));
    }

    #[test]
    fn offset_is_added_after_the_roll() {
        let boundary = DayBoundary::new(3, 330);
        assert_eq!(boundary.apply(at(2024, 5, 10, 20, 0)), at(2024, 5, 11, 1, 30));
        assert_eq!(boundary.apply(at(2024, 5, 10, 0, 15)), at(2024, 5, 9, 5, 45));
    }

    #[test]
    fn same_wall_clock_gives_same_business_date() {
        let boundary = DayBoundary::default();
        let input = at(2024, 12, 31, 23, 45);
        let first = boundary.apply(input);
        for _ in 0..5 {
            assert_eq!(boundary.apply(input), first);
        }
        assert_eq!(first.date_naive(), NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn previous_month_wraps_year() {
        let today = NaiveDate::from_ymd_opt(2025, 1, 17).unwrap();
        let (start, end) = previous_month_bounds(today).unwrap();
        assert_eq!(start, at(2024, 12, 1, 0, 0));
        assert_eq!(end, at(2025, 1, 1, 0, 0));
    }

    #[test]
    fn day_range_is_inclusive_of_last_day() {
        let first = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let (start, end) = days_bounds(first, last);
        assert_eq!(start, at(2024, 6, 1, 0, 0));
        assert_eq!(end, at(2024, 6, 4, 0, 0));
    }
}
