//! Day-granular conversion between the Jalali and Gregorian calendars.
//!
//! Both directions go through a Julian Day Number. Jalali years are located
//! within the Borkowski break-year table, which fixes the Gregorian day of
//! Nowruz (1 Farvardin) for each year in `-61..3178`.

use crate::consts::{JALALI_BREAKS, JALALI_YEAR_OFFSET};
use crate::{CalendarDate, CalendarSystem, is_valid_date};

/// Error type for calendar conversion.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConversionError {
    /// The input was not a valid date in its own calendar.
    #[error("Cannot convert invalid {} date {}", .0.system, .0)]
    InvalidDate(CalendarDate),

    /// The input was handed to the converter for the other calendar.
    #[error("Expected a {expected} date, found {found}")]
    WrongSystem {
        expected: CalendarSystem,
        found:    CalendarSystem,
    },

    /// The converted date falls outside the years the target calendar supports.
    #[error("{0} has no {1} equivalent in the supported range")]
    OutOfRange(CalendarDate, CalendarSystem),
}

/// Position of a Jalali year in its break-table sub-cycle.
struct JalaliYear {
    /// 0 for a leap year, otherwise years since the last leap year (1..=4)
    leap:  i64,
    /// Gregorian year in which the Jalali year begins
    gy:    i64,
    /// March day of that Gregorian year on which 1 Farvardin falls
    march: i64,
}

/// Locates `jy` in the break table. `None` outside `-61..3178`.
fn jal_cal(jy: i64) -> Option<JalaliYear> {
    let first = JALALI_BREAKS[0];
    let last = JALALI_BREAKS[JALALI_BREAKS.len() - 1];
    if jy < first || jy >= last {
        return None;
    }

    let gy = jy + JALALI_YEAR_OFFSET;
    let mut leap_j = -14;
    let mut jp = first;
    let mut jump = 0;
    for &jm in &JALALI_BREAKS[1..] {
        jump = jm - jp;
        if jy < jm {
            break;
        }
        leap_j += jump / 33 * 8 + (jump % 33) / 4;
        jp = jm;
    }

    let mut n = jy - jp;
    leap_j += n / 33 * 8 + (n % 33 + 3) / 4;
    if jump % 33 == 4 && jump - n == 4 {
        leap_j += 1;
    }

    let leap_g = gy / 4 - (gy / 100 + 1) * 3 / 4 - 150;
    let march = 20 + leap_j - leap_g;

    if jump - n < 6 {
        n = n - jump + (jump + 4) / 33 * 33;
    }
    let mut leap = ((n + 1) % 33 - 1) % 4;
    if leap == -1 {
        leap = 4;
    }

    Some(JalaliYear { leap, gy, march })
}

/// Leap index of a Jalali year (0 means leap). `None` outside the break table.
pub(crate) fn jalali_leap_index(jy: i64) -> Option<i64> {
    jal_cal(jy).map(|y| y.leap)
}

/// Julian Day Number of a Gregorian date
fn g2d(gy: i64, gm: i64, gd: i64) -> i64 {
    let d = (gy + (gm - 8) / 6 + 100_100) * 1461 / 4 + (153 * ((gm + 9) % 12) + 2) / 5 + gd
        - 34_840_408;
    d - (gy + 100_100 + (gm - 8) / 6) / 100 * 3 / 4 + 752
}

/// Gregorian (year, month, day) of a Julian Day Number
fn d2g(jdn: i64) -> (i64, i64, i64) {
    let mut j = 4 * jdn + 139_361_631;
    j += (4 * jdn + 183_187_720) / 146_097 * 3 / 4 * 4 - 3908;
    let i = (j % 1461) / 4 * 5 + 308;
    let gd = (i % 153) / 5 + 1;
    let gm = (i / 153) % 12 + 1;
    let gy = j / 1461 - 100_100 + (8 - gm) / 6;
    (gy, gm, gd)
}

/// Julian Day Number of a Jalali date
fn j2d(jy: i64, jm: i64, jd: i64) -> Option<i64> {
    let year = jal_cal(jy)?;
    Some(g2d(year.gy, 3, year.march) + (jm - 1) * 31 - jm / 7 * (jm - 7) + jd - 1)
}

/// Jalali (year, month, day) of a Julian Day Number
fn d2j(jdn: i64) -> Option<(i64, i64, i64)> {
    let (gy, _, _) = d2g(jdn);
    let mut jy = gy - JALALI_YEAR_OFFSET;
    let year = jal_cal(jy)?;
    let mut k = jdn - g2d(gy, 3, year.march);

    if k >= 0 {
        if k <= 185 {
            return Some((jy, 1 + k / 31, k % 31 + 1));
        }
        k -= 186;
    } else {
        jy -= 1;
        k += 179;
        if year.leap == 1 {
            k += 1;
        }
    }
    Some((jy, 7 + k / 30, k % 30 + 1))
}

fn ensure_valid(date: CalendarDate, expected: CalendarSystem) -> Result<(), ConversionError> {
    if date.system != expected {
        return Err(ConversionError::WrongSystem {
            expected,
            found: date.system,
        });
    }
    if !is_valid_date(date) {
        tracing::error!(%date, system = %date.system, "invalid date reached the converter");
        return Err(ConversionError::InvalidDate(date));
    }
    Ok(())
}

/// Builds a validated date in `system` from JDN components.
fn build(
    source: CalendarDate,
    system: CalendarSystem,
    (y, m, d): (i64, i64, i64),
) -> Result<CalendarDate, ConversionError> {
    let out_of_range = || ConversionError::OutOfRange(source, system);
    let date = CalendarDate::new(
        system,
        u16::try_from(y).map_err(|_| out_of_range())?,
        u8::try_from(m).map_err(|_| out_of_range())?,
        u8::try_from(d).map_err(|_| out_of_range())?,
    );
    if is_valid_date(date) {
        Ok(date)
    } else {
        Err(out_of_range())
    }
}

/// Converts a valid Jalali date to its Gregorian equivalent.
///
/// # Errors
/// Returns `ConversionError` if `date` is not a valid Jalali date.
pub fn to_gregorian(date: CalendarDate) -> Result<CalendarDate, ConversionError> {
    ensure_valid(date, CalendarSystem::Jalali)?;
    let jdn = j2d(
        i64::from(date.year),
        i64::from(date.month),
        i64::from(date.day),
    )
    .ok_or(ConversionError::OutOfRange(date, CalendarSystem::Gregorian))?;
    build(date, CalendarSystem::Gregorian, d2g(jdn))
}

/// Converts a valid Gregorian date to its Jalali equivalent.
///
/// # Errors
/// Returns `ConversionError` if `date` is not a valid Gregorian date or
/// falls outside the Jalali years `1..=MAX_JALALI_YEAR`.
pub fn to_jalali(date: CalendarDate) -> Result<CalendarDate, ConversionError> {
    ensure_valid(date, CalendarSystem::Gregorian)?;
    let jdn = g2d(
        i64::from(date.year),
        i64::from(date.month),
        i64::from(date.day),
    );
    let parts = d2j(jdn).ok_or(ConversionError::OutOfRange(date, CalendarSystem::Jalali))?;
    build(date, CalendarSystem::Jalali, parts)
}

/// Expresses `date` in `system`, converting only when the systems differ.
///
/// # Errors
/// Returns `ConversionError` under the same conditions as the conversion used.
pub fn convert_to(date: CalendarDate, system: CalendarSystem) -> Result<CalendarDate, ConversionError> {
    match (date.system, system) {
        (CalendarSystem::Jalali, CalendarSystem::Gregorian) => to_gregorian(date),
        (CalendarSystem::Gregorian, CalendarSystem::Jalali) => to_jalali(date),
        _ if is_valid_date(date) => Ok(date),
        _ => Err(ConversionError::InvalidDate(date)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{greg, jal};
    use crate::{MAX_JALALI_YEAR, days_in_month};

    #[test]
    fn test_known_conversions() {
        struct TestCase {
            jalali:      CalendarDate,
            gregorian:   CalendarDate,
            description: &'static str,
        }

        let cases = [
            TestCase {
                jalali:      jal(1348, 10, 11),
                gregorian:   greg(1970, 1, 1),
                description: "unix epoch",
            },
            TestCase {
                jalali:      jal(1400, 1, 1),
                gregorian:   greg(2021, 3, 21),
                description: "Nowruz 1400",
            },
            TestCase {
                jalali:      jal(1399, 12, 30),
                gregorian:   greg(2021, 3, 20),
                description: "leap Esfand 30",
            },
            TestCase {
                jalali:      jal(1403, 1, 1),
                gregorian:   greg(2024, 3, 20),
                description: "Nowruz 1403",
            },
            TestCase {
                jalali:      jal(1403, 12, 30),
                gregorian:   greg(2025, 3, 20),
                description: "leap Esfand 30 of 1403",
            },
            TestCase {
                jalali:      jal(1401, 12, 29),
                gregorian:   greg(2023, 3, 20),
                description: "common Esfand 29",
            },
            TestCase {
                jalali:      jal(1379, 10, 11),
                gregorian:   greg(2000, 12, 31),
                description: "end of 2000",
            },
            TestCase {
                jalali:      jal(1402, 7, 1),
                gregorian:   greg(2023, 9, 23),
                description: "first 30-day month",
            },
        ];

        for case in &cases {
            assert_eq!(
                to_gregorian(case.jalali).unwrap(),
                case.gregorian,
                "to_gregorian: {}",
                case.description
            );
            assert_eq!(
                to_jalali(case.gregorian).unwrap(),
                case.jalali,
                "to_jalali: {}",
                case.description
            );
        }
    }

    #[test]
    fn test_jalali_round_trip_full_range() {
        for year in 1..=MAX_JALALI_YEAR {
            for month in 1..=12 {
                for day in 1..=days_in_month(CalendarSystem::Jalali, year, month) {
                    let date = jal(year, month, day);
                    let there = to_gregorian(date).unwrap();
                    assert_eq!(to_jalali(there).unwrap(), date, "via {there}");
                }
            }
        }
    }

    #[test]
    fn test_gregorian_round_trip_supported_range() {
        let first = to_gregorian(jal(1, 1, 1)).unwrap();
        assert_eq!(first, greg(622, 3, 22));
        let last = to_gregorian(jal(MAX_JALALI_YEAR, 12, 29)).unwrap();

        for year in first.year..=last.year {
            for month in 1..=12 {
                for day in 1..=days_in_month(CalendarSystem::Gregorian, year, month) {
                    let date = greg(year, month, day);
                    if date < first || date > last {
                        continue;
                    }
                    let there = to_jalali(date).unwrap();
                    assert_eq!(to_gregorian(there).unwrap(), date, "via {there}");
                }
            }
        }
    }

    #[test]
    fn test_consecutive_jalali_days_are_consecutive_jdns() {
        let mut prev = j2d(1, 1, 1).unwrap();
        for year in 1..=MAX_JALALI_YEAR {
            for month in 1..=12 {
                for day in 1..=days_in_month(CalendarSystem::Jalali, year, month) {
                    if (year, month, day) == (1, 1, 1) {
                        continue;
                    }
                    let jdn = j2d(i64::from(year), i64::from(month), i64::from(day)).unwrap();
                    assert_eq!(jdn, prev + 1, "{year}/{month}/{day}");
                    prev = jdn;
                }
            }
        }
    }

    #[test]
    fn test_rejects_invalid_input() {
        assert_eq!(
            to_gregorian(jal(1401, 12, 30)),
            Err(ConversionError::InvalidDate(jal(1401, 12, 30)))
        );
        assert_eq!(
            to_jalali(greg(2023, 2, 29)),
            Err(ConversionError::InvalidDate(greg(2023, 2, 29)))
        );
    }

    #[test]
    fn test_rejects_wrong_system() {
        assert!(matches!(
            to_gregorian(greg(2024, 1, 1)),
            Err(ConversionError::WrongSystem {
                expected: CalendarSystem::Jalali,
                found: CalendarSystem::Gregorian
            })
        ));
        assert!(matches!(
            to_jalali(jal(1400, 1, 1)),
            Err(ConversionError::WrongSystem { .. })
        ));
    }

    #[test]
    fn test_gregorian_before_jalali_epoch_is_out_of_range() {
        assert!(matches!(
            to_jalali(greg(622, 3, 21)),
            Err(ConversionError::OutOfRange(_, CalendarSystem::Jalali))
        ));
        assert!(matches!(
            to_jalali(greg(100, 1, 1)),
            Err(ConversionError::OutOfRange(..))
        ));
        assert!(matches!(
            to_jalali(greg(9999, 1, 1)),
            Err(ConversionError::OutOfRange(..))
        ));
    }

    #[test]
    fn test_convert_to_same_system_is_identity() {
        let date = jal(1400, 6, 15);
        assert_eq!(convert_to(date, CalendarSystem::Jalali), Ok(date));
        assert_eq!(
            convert_to(date, CalendarSystem::Gregorian),
            Ok(greg(2021, 9, 6))
        );
        assert!(convert_to(jal(1400, 13, 1), CalendarSystem::Jalali).is_err());
    }
}
