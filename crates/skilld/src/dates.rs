//! Calendar helpers for the date intents.
//!
//! All functions take the date explicitly; callers decide what "today" is.

use chrono::{Datelike, NaiveDate};

/// ISO-8601 week number (1..=53).
pub fn iso_week_number(date: NaiveDate) -> u32 {
    date.iso_week().week()
}

/// Year the ISO week belongs to. Differs from the calendar year for a few
/// days around new year (e.g. 2024-12-30 is week 1 of 2025).
pub fn iso_week_year(date: NaiveDate) -> i32 {
    date.iso_week().year()
}

/// Day of the year, 1-based (Jan 1 is day 1).
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// English ordinal suffix: 1st, 2nd, 3rd, 4th, 11th, 12th, 13th, 21st...
pub fn ordinal_suffix(n: i64) -> &'static str {
    match (n.rem_euclid(10), n.rem_euclid(100)) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

/// Number followed by its ordinal suffix.
pub fn ordinal(n: i64) -> String {
    format!("{n}{}", ordinal_suffix(n))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn ordinal_suffix_follows_last_digit() {
        let cases = [
            (0, "th"),
            (1, "st"),
            (2, "nd"),
            (3, "rd"),
            (4, "th"),
            (9, "th"),
            (10, "th"),
            (21, "st"),
            (22, "nd"),
            (23, "rd"),
            (52, "nd"),
            (101, "st"),
            (366, "th"),
        ];
        for (n, suffix) in cases {
            assert_eq!(ordinal_suffix(n), suffix, "n = {n}");
        }
    }

    #[test]
    fn teens_take_th() {
        for n in [11, 12, 13, 111, 112, 113, 211, 312, 1013] {
            assert_eq!(ordinal_suffix(n), "th", "n = {n}");
        }
    }

    #[test]
    fn ordinal_suffix_matches_modular_rule() {
        for n in -500..=500_i64 {
            let expected = match (n.rem_euclid(10), n.rem_euclid(100)) {
                (1, m) if m != 11 => "st",
                (2, m) if m != 12 => "nd",
                (3, m) if m != 13 => "rd",
                _ => "th",
            };
            assert_eq!(ordinal_suffix(n), expected, "n = {n}");
        }
    }

    #[test]
    fn ordinal_formats_number_and_suffix() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(12), "12th");
        assert_eq!(ordinal(43), "43rd");
    }

    #[test]
    fn iso_week_of_early_january() {
        assert_eq!(iso_week_number(date(2024, 1, 4)), 1);
        assert_eq!(iso_week_year(date(2024, 1, 4)), 2024);
        assert_eq!(iso_week_number(date(2024, 1, 1)), 1);
    }

    #[test]
    fn iso_week_crosses_year_boundary() {
        // Friday 2021-01-01 belongs to the last week of 2020.
        assert_eq!(iso_week_number(date(2021, 1, 1)), 53);
        assert_eq!(iso_week_year(date(2021, 1, 1)), 2020);
        // Monday 2024-12-30 starts week 1 of 2025.
        assert_eq!(iso_week_number(date(2024, 12, 30)), 1);
        assert_eq!(iso_week_year(date(2024, 12, 30)), 2025);
    }

    #[test]
    fn iso_week_mid_year() {
        assert_eq!(iso_week_number(date(2024, 6, 15)), 24);
    }

    #[test]
    fn day_of_year_is_one_based() {
        assert_eq!(day_of_year(date(2024, 1, 1)), 1);
        assert_eq!(day_of_year(date(2024, 2, 1)), 32);
        assert_eq!(day_of_year(date(2024, 3, 1)), 61);
        assert_eq!(day_of_year(date(2023, 3, 1)), 60);
    }

    #[test]
    fn day_of_year_handles_leap_years() {
        assert_eq!(day_of_year(date(2024, 12, 31)), 366);
        assert_eq!(day_of_year(date(2023, 12, 31)), 365);
    }
}
