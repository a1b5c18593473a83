use chrono::{Datelike, NaiveDate, Weekday};

use crate::models::{DayType, WeekKey};

pub fn day_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub fn day_type(date: NaiveDate) -> DayType {
    if date.weekday().num_days_from_monday() >= 5 {
        DayType::Weekend
    } else {
        DayType::Weekday
    }
}

/// ISO-8601 week key: weeks start Monday, week 1 holds the year's first
/// Thursday. The ISO year can differ from the calendar year near January 1.
pub fn week_key(date: NaiveDate) -> WeekKey {
    let iso = date.iso_week();
    WeekKey {
        iso_year: iso.year(),
        week: iso.week(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn monday_is_a_weekday() {
        let monday = date(2025, 11, 3);
        assert_eq!(day_name(monday), "Monday");
        assert_eq!(day_type(monday), DayType::Weekday);
    }

    #[test]
    fn saturday_and_sunday_are_weekend() {
        assert_eq!(day_type(date(2025, 11, 8)), DayType::Weekend);
        assert_eq!(day_type(date(2025, 11, 9)), DayType::Weekend);
        assert_eq!(day_type(date(2025, 11, 7)), DayType::Weekday);
    }

    #[test]
    fn iso_week_crosses_the_year_boundary() {
        // Dec 29 2025 is a Monday and already belongs to ISO 2026-W01.
        let key = week_key(date(2025, 12, 29));
        assert_eq!(key, WeekKey { iso_year: 2026, week: 1 });
        assert_eq!(week_key(date(2026, 1, 1)), key);
    }

    #[test]
    fn same_week_number_in_different_years_stays_distinct() {
        let a = week_key(date(2024, 12, 30));
        let b = week_key(date(2025, 12, 29));
        assert_eq!(a.week, 1);
        assert_eq!(b.week, 1);
        assert_ne!(a, b);
    }
}
