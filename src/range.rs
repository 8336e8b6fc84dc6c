use std::cmp::Ordering;

use crate::{
    CalendarDate, CalendarSystem, ConversionError, ErrorKey, ErrorTag, ParseError,
    ValidationErrorSet, check_date, convert_to,
};

/// Inclusive bounds a typed date must fall within. Either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    min: Option<CalendarDate>,
    max: Option<CalendarDate>,
}

/// Error type for date range construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RangeError {
    /// Minimum date is after maximum date.
    #[error("Invalid date range: min ({min}) is after max ({max})")]
    InvalidRange { min: CalendarDate, max: CalendarDate },

    /// A bound could not be parsed or is not a valid date.
    #[error("Invalid {bound} bound: {source}")]
    InvalidBound {
        bound:  &'static str,
        source: ParseError,
    },

    /// Bounds in different calendars could not be brought to a common one.
    #[error(transparent)]
    Conversion(#[from] ConversionError),
}

/// Orders two dates, converting both to Gregorian when their systems differ.
fn compare(a: CalendarDate, b: CalendarDate) -> Result<Ordering, ConversionError> {
    if a.system == b.system {
        return Ok(a.to_columns().cmp(&b.to_columns()));
    }
    let a = convert_to(a, CalendarSystem::Gregorian)?;
    let b = convert_to(b, CalendarSystem::Gregorian)?;
    Ok(a.to_columns().cmp(&b.to_columns()))
}

fn check_bound(bound: &'static str, date: Option<CalendarDate>) -> Result<Option<CalendarDate>, RangeError> {
    date.map(|d| check_date(d).map_err(|source| RangeError::InvalidBound { bound, source }))
        .transpose()
}

impl DateRange {
    pub const fn unbounded() -> Self {
        Self {
            min: None,
            max: None,
        }
    }

    /// Creates a range with validation.
    ///
    /// # Errors
    /// Returns `RangeError::InvalidBound` if a bound is not a valid date and
    /// `RangeError::InvalidRange` if min > max.
    pub fn new(min: Option<CalendarDate>, max: Option<CalendarDate>) -> Result<Self, RangeError> {
        let min = check_bound("min", min)?;
        let max = check_bound("max", max)?;
        if let (Some(min), Some(max)) = (min, max) {
            if compare(min, max)? == Ordering::Greater {
                return Err(RangeError::InvalidRange { min, max });
            }
        }
        Ok(Self { min, max })
    }

    /// Parses canonical `YYYY/MM/DD` bounds given in `system`.
    /// An empty (or blank) string leaves that side open.
    ///
    /// # Errors
    /// Returns `RangeError` if a non-empty bound is malformed or min > max.
    pub fn parse(system: CalendarSystem, min: &str, max: &str) -> Result<Self, RangeError> {
        let parse_bound = |bound: &'static str, text: &str| {
            if text.trim().is_empty() {
                return Ok(None);
            }
            CalendarDate::parse(system, text)
                .map(Some)
                .map_err(|source| RangeError::InvalidBound { bound, source })
        };
        Self::new(parse_bound("min", min)?, parse_bound("max", max)?)
    }

    pub const fn min(&self) -> Option<CalendarDate> {
        self.min
    }

    pub const fn max(&self) -> Option<CalendarDate> {
        self.max
    }

    pub const fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }

    /// Checks if the range contains a given date (inclusive)
    pub fn contains(&self, date: CalendarDate) -> bool {
        is_within_range(date, self).is_empty()
    }
}

/// Compares a structurally valid `date` against `range`.
///
/// The result holds `MinDate` or `MaxDate` on the form key, or nothing. A
/// bound that cannot be compared (the date has no counterpart in the bound's
/// calendar) is skipped.
pub fn is_within_range(date: CalendarDate, range: &DateRange) -> ValidationErrorSet {
    let mut errors = ValidationErrorSet::new();

    let bounds = [
        (range.min, Ordering::Less, ErrorTag::MinDate),
        (range.max, Ordering::Greater, ErrorTag::MaxDate),
    ];
    for (bound, violation, tag) in bounds {
        let Some(bound) = bound else {
            continue;
        };
        match compare(date, bound) {
            Ok(ord) if ord == violation => errors.insert(ErrorKey::Form, tag),
            Ok(_) => {}
            Err(err) => tracing::warn!(%date, %bound, %err, "range bound skipped"),
        }
    }

    errors
}
