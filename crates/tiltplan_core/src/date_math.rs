//! Calendar helpers for period keys, history spans and synthetic calendars.
//!
//! Day arithmetic goes through Rata Die day numbers and never fails.

use jiff::civil::{Date, Weekday};

/// Average Gregorian year length in days
pub const DAYS_PER_YEAR: f64 = 365.2425;

#[inline]
pub fn is_leap_year(year: i16) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[inline]
pub fn days_in_month(year: i16, month: i8) -> i8 {
    const DAYS: [i8; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
    if month == 2 && is_leap_year(year) {
        29
    } else {
        DAYS[(month - 1) as usize]
    }
}

/// Last calendar day of a month
#[inline]
pub fn month_end(year: i16, month: i8) -> Date {
    jiff::civil::date(year, month, days_in_month(year, month))
}

/// Proleptic Gregorian day number (days since 0001-01-01).
#[inline]
fn rata_die(d: Date) -> i32 {
    let y = d.year() as i32;
    let m = d.month() as i32;
    let day = d.day() as i32;

    // March-based year: February becomes the last month
    let a = (14 - m) / 12;
    let y2 = y - a;
    let m2 = m + 12 * a - 3;

    day + (153 * m2 + 2) / 5 + 365 * y2 + y2 / 4 - y2 / 100 + y2 / 400 - 306
}

/// Inverse of `rata_die`
#[inline]
fn rd_to_date(rd: i32) -> Date {
    let z = rd + 306;
    let h = 100 * z - 25;
    let a = h / 3_652_425;
    let b = a - a / 4;
    let y = (100 * b + h) / 36_525;
    let c = b + z - 365 * y - y / 4;
    let m = (5 * c + 456) / 153;
    let day = c - (153 * m - 457) / 5;

    let (year, month) = if m > 12 { (y + 1, m - 12) } else { (y, m) };

    jiff::civil::date(year as i16, month as i8, day as i8)
}

/// Signed number of days from `d1` to `d2`
#[inline]
pub fn days_between(d1: Date, d2: Date) -> i32 {
    rata_die(d2) - rata_die(d1)
}

#[inline]
pub fn add_days(d: Date, n: i32) -> Date {
    rd_to_date(rata_die(d) + n)
}

/// Calendar span between two dates in fractional years
#[inline]
pub fn years_between(d1: Date, d2: Date) -> f64 {
    f64::from(days_between(d1, d2)) / DAYS_PER_YEAR
}

#[inline]
pub fn is_weekend(d: Date) -> bool {
    matches!(d.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// First Monday-to-Friday date strictly after `d`
#[inline]
pub fn next_weekday(d: Date) -> Date {
    let mut next = add_days(d, 1);
    while is_weekend(next) {
        next = add_days(next, 1);
    }
    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    #[test]
    fn test_days_between_matches_jiff() {
        let pairs = [
            (date(2020, 1, 1), date(2030, 6, 15)),
            (date(2024, 2, 29), date(2025, 2, 28)),
            (date(2000, 3, 1), date(2100, 3, 1)),
            (date(2025, 12, 31), date(2026, 1, 1)),
        ];
        for (d1, d2) in pairs {
            let jiff_days = (d2 - d1).get_days();
            assert_eq!(days_between(d1, d2), jiff_days, "mismatch for {d1} → {d2}");
            assert_eq!(days_between(d2, d1), -jiff_days);
        }
    }

    #[test]
    fn test_add_days_crosses_month_year_and_leap_day() {
        assert_eq!(add_days(date(2025, 1, 31), 1), date(2025, 2, 1));
        assert_eq!(add_days(date(2025, 12, 31), 1), date(2026, 1, 1));
        assert_eq!(add_days(date(2024, 2, 28), 1), date(2024, 2, 29));
        assert_eq!(add_days(date(2025, 1, 1), -1), date(2024, 12, 31));
    }

    #[test]
    fn test_month_end() {
        assert_eq!(month_end(2024, 2), date(2024, 2, 29));
        assert_eq!(month_end(1900, 2), date(1900, 2, 28));
        assert_eq!(month_end(2000, 2), date(2000, 2, 29));
        assert_eq!(month_end(2025, 4), date(2025, 4, 30));
    }

    #[test]
    fn test_years_between() {
        let years = years_between(date(2000, 1, 1), date(2030, 1, 1));
        assert!((years - 30.0).abs() < 0.01, "got {years}");
    }

    #[test]
    fn test_next_weekday_skips_weekend() {
        // 2024-01-05 is a Friday
        assert_eq!(next_weekday(date(2024, 1, 5)), date(2024, 1, 8));
        assert_eq!(next_weekday(date(2024, 1, 8)), date(2024, 1, 9));
        assert!(is_weekend(date(2024, 1, 6)));
        assert!(!is_weekend(date(2024, 1, 5)));
    }
}
