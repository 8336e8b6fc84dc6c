/// Maximum year representable in the four-digit year field (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// Last Jalali year whose whole Gregorian span the break-year table covers (inclusive)
pub const MAX_JALALI_YEAR: u16 = 3176;

/// Maximum valid month (December / Esfand)
pub const MAX_MONTH: u8 = 12;

/// First day of month
pub const MIN_DAY: u8 = 1;

/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for Esfand, the Jalali month that gains a day in leap years
pub const ESFAND: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;
/// Days in Esfand for leap years
pub const ESFAND_DAYS_LEAP: u8 = 30;

/// Maximum days in each Gregorian month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Maximum days in each Jalali month (index 0 is unused)
/// Esfand shows 29 days (non-leap year default)
pub const JALALI_DAYS_IN_MONTH: [u8; 13] = [0, 31, 31, 31, 31, 31, 31, 30, 30, 30, 30, 30, 29];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Jalali years that start a new 33-year leap sub-cycle (Borkowski).
/// Valid conversions cover `JALALI_BREAKS[0]..JALALI_BREAKS[last]`.
pub(crate) const JALALI_BREAKS: [i64; 20] = [
    -61, 9, 38, 199, 426, 686, 756, 818, 1111, 1181, 1210, 1635, 2060, 2097, 2192, 2262, 2324,
    2394, 2456, 3178,
];

/// Offset between the Jalali and Gregorian year numbers around Nowruz
pub(crate) const JALALI_YEAR_OFFSET: i64 = 621;

/// Separator between the fields of the canonical `YYYY/MM/DD` form
pub const DATE_SEPARATOR: char = '/';

/// Canonical width of the year field
pub const YEAR_WIDTH: usize = 4;
/// Canonical width of the month and day fields
pub const MONTH_DAY_WIDTH: usize = 2;

/// Month text accepted before the day bound is known
pub const MONTH_PATTERN: &str = r"^(0?[1-9]|1[0-2])$";
