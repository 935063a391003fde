//! Shared calendar math for the Penny crates.

use chrono::{Datelike, Duration, NaiveDate};

/// Adds `months` to a date. When the source day does not exist in the
/// target month the result clamps to that month's last day, and the
/// clamped day becomes the base for any further stepping.
pub fn shift_month(date: NaiveDate, months: i32) -> NaiveDate {
    let mut year = date.year();
    let mut month = date.month() as i32 + months;
    let mut day = date.day();
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    day = day.min(days_in_month(year, month as u32));
    NaiveDate::from_ymd_opt(year, month as u32, day).unwrap()
}

/// Adds `years` to a date, clamping Feb 29 to Feb 28 outside leap years.
pub fn shift_year(date: NaiveDate, years: i32) -> NaiveDate {
    let year = date.year() + years;
    let month = date.month();
    let day = date.day().min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let next_month = if month == 12 { 1 } else { month + 1 };
    let next_year = if month == 12 { year + 1 } else { year };
    let first_next = NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .unwrap_or_else(|| NaiveDate::from_ymd_opt(year, month, 28).unwrap());
    let last_current = first_next - Duration::days(1);
    last_current.day()
}

/// First and last day of the calendar month containing `date`.
pub fn month_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let first = date.with_day(1).unwrap();
    let last = NaiveDate::from_ymd_opt(
        date.year(),
        date.month(),
        days_in_month(date.year(), date.month()),
    )
    .unwrap();
    (first, last)
}

/// Date in (`year`, `month`) with `day` clamped to the month's length.
pub fn date_with_clamped_day(year: i32, month: u32, day: u32) -> NaiveDate {
    let day = day.max(1).min(days_in_month(year, month));
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_month_clamps_to_short_months() {
        assert_eq!(shift_month(date(2024, 1, 31), 1), date(2024, 2, 29));
        assert_eq!(shift_month(date(2025, 1, 31), 1), date(2025, 2, 28));
        assert_eq!(shift_month(date(2024, 10, 31), 1), date(2024, 11, 30));
    }

    #[test]
    fn shift_month_rebases_after_clamp() {
        let clamped = shift_month(date(2025, 1, 31), 1);
        assert_eq!(shift_month(clamped, 1), date(2025, 3, 28));
    }

    #[test]
    fn shift_month_crosses_year_boundaries() {
        assert_eq!(shift_month(date(2024, 11, 15), 3), date(2025, 2, 15));
        assert_eq!(shift_month(date(2024, 2, 10), -3), date(2023, 11, 10));
    }

    #[test]
    fn shift_year_handles_leap_day() {
        assert_eq!(shift_year(date(2024, 2, 29), 1), date(2025, 2, 28));
        assert_eq!(shift_year(date(2024, 2, 29), 4), date(2028, 2, 29));
    }

    #[test]
    fn month_bounds_cover_whole_month() {
        assert_eq!(
            month_bounds(date(2024, 2, 14)),
            (date(2024, 2, 1), date(2024, 2, 29))
        );
        assert_eq!(
            month_bounds(date(2023, 12, 31)),
            (date(2023, 12, 1), date(2023, 12, 31))
        );
    }

    #[test]
    fn clamped_day_respects_month_length() {
        assert_eq!(date_with_clamped_day(2024, 6, 31), date(2024, 6, 30));
        assert_eq!(date_with_clamped_day(2024, 6, 15), date(2024, 6, 15));
    }
}
