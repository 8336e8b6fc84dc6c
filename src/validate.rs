use std::sync::LazyLock;

use regex::Regex;

use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, ESFAND, ESFAND_DAYS_LEAP, FEBRUARY, FEBRUARY_DAYS_LEAP,
    GREGORIAN_CYCLE, JALALI_DAYS_IN_MONTH, LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY, MONTH_PATTERN,
};
use crate::convert::jalali_leap_index;
use crate::{CalendarDate, CalendarSystem, ParseError};

#[allow(clippy::expect_used)]
static MONTH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MONTH_PATTERN).expect("month pattern is a valid regex"));

pub const fn is_gregorian_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

/// Jalali leap years follow the 33-year sub-cycles of the break table.
/// Years outside the table are reported as common years.
pub fn is_jalali_leap_year(year: u16) -> bool {
    jalali_leap_index(i64::from(year)) == Some(0)
}

pub fn is_leap_year(system: CalendarSystem, year: u16) -> bool {
    match system {
        CalendarSystem::Jalali => is_jalali_leap_year(year),
        CalendarSystem::Gregorian => is_gregorian_leap_year(year),
    }
}

/// Number of days in `month` of `year`.
///
/// Returns 0 for a month outside `1..=12`.
pub fn days_in_month(system: CalendarSystem, year: u16, month: u8) -> u8 {
    if month == 0 || month > MAX_MONTH {
        return 0;
    }

    match system {
        CalendarSystem::Gregorian if month == FEBRUARY && is_gregorian_leap_year(year) => {
            FEBRUARY_DAYS_LEAP
        }
        CalendarSystem::Gregorian => DAYS_IN_MONTH[month as usize],
        CalendarSystem::Jalali if month == ESFAND && is_jalali_leap_year(year) => ESFAND_DAYS_LEAP,
        CalendarSystem::Jalali => JALALI_DAYS_IN_MONTH[month as usize],
    }
}

/// Checks each component of `date` against its calendar, year first.
///
/// # Errors
/// Returns the `ParseError` naming the first component that is out of range.
pub fn check_date(date: CalendarDate) -> Result<CalendarDate, ParseError> {
    let CalendarDate {
        system,
        year,
        month,
        day,
    } = date;

    if !system.supported_years().contains(&year) {
        return Err(ParseError::InvalidYear { system, year });
    }
    if month == 0 || month > MAX_MONTH {
        return Err(ParseError::InvalidMonth(month));
    }
    if day < MIN_DAY || day > days_in_month(system, year, month) {
        return Err(ParseError::InvalidDay { month, day, year });
    }
    Ok(date)
}

pub fn is_valid_date(date: CalendarDate) -> bool {
    check_date(date).is_ok()
}

/// Whether `text` is an acceptable month entry (`1`..`12`, optionally `0`-prefixed)
pub fn matches_month_pattern(text: &str) -> bool {
    MONTH_RE.is_match(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{greg, jal};

    #[test]
    fn test_gregorian_leap_year_cases() {
        struct TestCase {
            year:        u16,
            is_leap:     bool,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2024,
                is_leap:     true,
                description: "divisible by 4",
            },
            TestCase {
                year:        2023,
                is_leap:     false,
                description: "not divisible by 4",
            },
            TestCase {
                year:        1900,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2100,
                is_leap:     false,
                description: "century not divisible by 400",
            },
            TestCase {
                year:        2000,
                is_leap:     true,
                description: "divisible by 400",
            },
        ];

        for case in &cases {
            assert_eq!(
                is_leap_year(CalendarSystem::Gregorian, case.year),
                case.is_leap,
                "Year {} ({})",
                case.year,
                case.description
            );
        }
    }

    #[test]
    fn test_jalali_leap_years() {
        for year in [1370, 1375, 1379, 1383, 1387, 1391, 1395, 1399, 1403, 1408] {
            assert!(is_leap_year(CalendarSystem::Jalali, year), "{year} should be leap");
        }
        for year in [1400, 1401, 1402, 1404, 1405, 1406, 1407] {
            assert!(!is_leap_year(CalendarSystem::Jalali, year), "{year} should be common");
        }
    }

    #[test]
    fn test_jalali_leap_rule_differs_from_gregorian() {
        // 1400 is divisible by 4 but common; 1403 is not but leap.
        assert!(!is_leap_year(CalendarSystem::Jalali, 1400));
        assert!(is_leap_year(CalendarSystem::Jalali, 1403));
    }

    #[test]
    fn test_jalali_leap_years_per_33_year_cycle() {
        for start in (1210..1600).step_by(33) {
            let leaps = (start..start + 33)
                .filter(|&y| is_leap_year(CalendarSystem::Jalali, y))
                .count();
            assert_eq!(leaps, 8, "cycle starting {start}");
        }
    }

    #[test]
    fn test_jalali_month_lengths() {
        for month in 1..=6 {
            assert_eq!(days_in_month(CalendarSystem::Jalali, 1402, month), 31);
        }
        for month in 7..=11 {
            assert_eq!(days_in_month(CalendarSystem::Jalali, 1402, month), 30);
        }
        assert_eq!(days_in_month(CalendarSystem::Jalali, 1401, 12), 29);
        assert_eq!(days_in_month(CalendarSystem::Jalali, 1403, 12), 30);
    }

    #[test]
    fn test_esfand_follows_leap_rule() {
        for year in 1200..=1500 {
            let expected = if is_leap_year(CalendarSystem::Jalali, year) { 30 } else { 29 };
            assert_eq!(days_in_month(CalendarSystem::Jalali, year, 12), expected, "{year}");
        }
    }

    #[test]
    fn test_february_follows_leap_rule() {
        for year in 1800..=2100 {
            let expected = if is_leap_year(CalendarSystem::Gregorian, year) { 29 } else { 28 };
            assert_eq!(days_in_month(CalendarSystem::Gregorian, year, 2), expected, "{year}");
        }
    }

    #[test]
    fn test_days_in_month_gregorian_table() {
        let expected = [0, 31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
        for month in 1..=12 {
            assert_eq!(
                days_in_month(CalendarSystem::Gregorian, 2023, month),
                expected[month as usize],
                "Month {month} has incorrect day count"
            );
        }
    }

    #[test]
    fn test_days_in_month_out_of_range_month() {
        assert_eq!(days_in_month(CalendarSystem::Jalali, 1400, 0), 0);
        assert_eq!(days_in_month(CalendarSystem::Gregorian, 2024, 13), 0);
    }

    #[test]
    fn test_is_valid_date() {
        assert!(is_valid_date(jal(1403, 12, 30)));
        assert!(!is_valid_date(jal(1401, 12, 30)));
        assert!(is_valid_date(jal(1401, 2, 31)));
        assert!(!is_valid_date(jal(1401, 7, 31)));
        assert!(!is_valid_date(jal(0, 1, 1)));
        assert!(!is_valid_date(jal(3178, 1, 1)));
        assert!(!is_valid_date(jal(1400, 1, 0)));

        assert!(is_valid_date(greg(2024, 2, 29)));
        assert!(!is_valid_date(greg(2023, 2, 29)));
        assert!(!is_valid_date(greg(2023, 4, 31)));
        assert!(is_valid_date(greg(9999, 12, 31)));
    }

    #[test]
    fn test_month_pattern_compiles() {
        assert!(Regex::new(MONTH_PATTERN).is_ok());
        assert!(MONTH_RE.is_match("12"));
    }

    #[test]
    fn test_month_pattern() {
        for text in ["1", "01", "9", "09", "10", "11", "12"] {
            assert!(matches_month_pattern(text), "{text} should match");
        }
        for text in ["", "0", "00", "13", "001", "1a", "20"] {
            assert!(!matches_month_pattern(text), "{text} should not match");
        }
    }
}
