//! Day-resolution calendar helpers used by recurrence expansion and the views.
//!
//! All dates are [`NaiveDate`]s: no time of day, no timezone.

use chrono::{Datelike, Months, NaiveDate};
use crate::error::{ChoreError, Result};

/// Parses a `YYYY-MM-DD` string.
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| ChoreError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

/// Formats a date as `YYYY-MM-DD`.
pub fn to_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Number of days in the given month (28..=31).
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = next_month(year, month);
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(28)
}

/// The year/month pair following `(year, month)`.
pub fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month >= 12 { (year + 1, 1) } else { (year, month + 1) }
}

/// Resolves `day` within the given month, clamping to the month's last day.
///
/// Day 31 in April gives April 30; day 30 in a common-year February gives
/// February 28. Returns `None` only for `day == 0` or an unrepresentable month.
pub fn clamped_day(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    if day == 0 {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day.min(days_in_month(year, month)))
}

/// Weekday index with Sunday as 0 and Saturday as 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// First and last day of the month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap_or(date);
    let last = clamped_day(date.year(), date.month(), 31).unwrap_or(date);
    (first, last)
}

/// First day of the month `delta` months away from the month containing `date`.
pub fn shift_month(date: NaiveDate, delta: i32) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    let shifted = if delta >= 0 {
        first.checked_add_months(Months::new(delta.unsigned_abs()))
    } else {
        first.checked_sub_months(Months::new(delta.unsigned_abs()))
    };
    shifted.unwrap_or(first)
}
