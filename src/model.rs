//! The segmented year/month/day fields and the composite date derived from them.

use std::borrow::Cow;

use crate::consts::{DATE_SEPARATOR, ESFAND, ESFAND_DAYS_LEAP, FEBRUARY, FEBRUARY_DAYS_LEAP, MIN_DAY};
use crate::types::FieldFlags;
use crate::{
    CalendarDate, CalendarSystem, ConversionError, DateRange, ErrorKey, ErrorTag, Field,
    ValidationErrorSet, convert_to, days_in_month, is_within_range, matches_month_pattern,
};

/// Drops every character that is not an ASCII digit.
pub(crate) fn sanitize_digits(text: &str) -> Cow<'_, str> {
    if is_digits(text) {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(text.chars().filter(char::is_ascii_digit).collect())
    }
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

/// Longest a month can be when the year is not yet known.
fn max_days_any_year(system: CalendarSystem, month: u8) -> u8 {
    match (system, month) {
        (CalendarSystem::Jalali, ESFAND) => ESFAND_DAYS_LEAP,
        (CalendarSystem::Gregorian, FEBRUARY) => FEBRUARY_DAYS_LEAP,
        _ => days_in_month(system, 1, month),
    }
}

/// Single source of truth for the three typed fields.
///
/// Texts are stored exactly as given; nothing here rejects input. Validity is
/// recomputed from the current texts on every [`validate`](Self::validate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentedDateModel {
    system:  CalendarSystem,
    texts:   [String; 3],
    touched: FieldFlags,
}

impl SegmentedDateModel {
    pub fn new(system: CalendarSystem) -> Self {
        Self {
            system,
            ..Self::default()
        }
    }

    pub const fn system(&self) -> CalendarSystem {
        self.system
    }

    pub fn text(&self, field: Field) -> &str {
        &self.texts[field.index()]
    }

    /// Records `text` for `field` without validating it.
    /// Callers are expected to have stripped non-digits already.
    pub fn set_field_text(&mut self, field: Field, text: impl Into<String>) {
        self.texts[field.index()] = text.into();
    }

    /// Left-pads a short, non-empty field to its canonical width and marks it
    /// touched. Returns whether the text changed.
    pub fn commit_field(&mut self, field: Field) -> bool {
        self.touched.set(field);

        let width = field.width();
        let text = &mut self.texts[field.index()];
        if text.is_empty() || text.len() >= width {
            return false;
        }
        *text = format!("{text:0>width$}");
        true
    }

    /// Whether `field` holds its full canonical width of characters
    pub fn is_full(&self, field: Field) -> bool {
        self.text(field).len() >= field.width()
    }

    /// Whether every field is empty
    pub fn is_blank(&self) -> bool {
        self.texts.iter().all(String::is_empty)
    }

    pub const fn is_touched(&self, field: Field) -> bool {
        self.touched.get(field)
    }

    fn number<T: std::str::FromStr>(&self, field: Field) -> Option<T> {
        let text = self.text(field);
        if text.is_empty() || !is_digits(text) {
            return None;
        }
        text.parse().ok()
    }

    /// Parses the three fields into a candidate date.
    /// `None` while any field is empty or not numeric; the result may still be invalid.
    pub fn derive_composite(&self) -> Option<CalendarDate> {
        Some(CalendarDate::new(
            self.system,
            self.number(Field::Year)?,
            self.number(Field::Month)?,
            self.number(Field::Day)?,
        ))
    }

    /// Validates the current texts: required, month pattern, day bounds, then range.
    ///
    /// The day bound uses whatever year and month are typed right now, so a
    /// month or year edit re-evaluates an already entered day.
    pub fn validate(&self, range: &DateRange) -> ValidationErrorSet {
        let mut errors = ValidationErrorSet::new();

        for field in Field::ALL {
            if self.text(field).is_empty() {
                errors.insert(field, ErrorTag::Required);
            }
        }

        let year = self
            .number::<u16>(Field::Year)
            .filter(|y| self.system.supported_years().contains(y));
        if year.is_none() && !self.text(Field::Year).is_empty() {
            errors.insert(Field::Year, ErrorTag::Pattern);
        }

        let month_text = self.text(Field::Month);
        let month = if matches_month_pattern(month_text) {
            self.number::<u8>(Field::Month)
        } else {
            if !month_text.is_empty() {
                errors.insert(Field::Month, ErrorTag::Pattern);
            }
            None
        };

        let day_text = self.text(Field::Day);
        if !day_text.is_empty() {
            if is_digits(day_text) {
                let max_day = match (year, month) {
                    (Some(y), Some(m)) => days_in_month(self.system, y, m),
                    (None, Some(m)) => max_days_any_year(self.system, m),
                    (_, None) => max_days_any_year(self.system, 1),
                };
                let day = self.number::<u8>(Field::Day);
                if !day.is_some_and(|d| (MIN_DAY..=max_day).contains(&d)) {
                    errors.insert(Field::Day, ErrorTag::InvalidDay);
                }
            } else {
                errors.insert(Field::Day, ErrorTag::Pattern);
            }
        }

        if errors.is_empty() {
            if let Some(date) = self.derive_composite() {
                for (key, tag) in is_within_range(date, range).iter() {
                    errors.insert(key, tag);
                }
            }
        }

        errors
    }

    /// Writes a picker date into the fields, zero-padded, in this model's
    /// calendar. Returns the date as written.
    ///
    /// # Errors
    /// Returns `ConversionError` if `date` has no counterpart in this calendar;
    /// the fields are left untouched.
    pub fn from_composite(&mut self, date: CalendarDate) -> Result<CalendarDate, ConversionError> {
        let local = convert_to(date, self.system)?;
        self.texts = [
            format!("{:04}", local.year),
            format!("{:02}", local.month),
            format!("{:02}", local.day),
        ];
        Ok(local)
    }

    /// Fills the fields from a `YYYY/MM/DD` default. Missing parts become
    /// empty fields and non-digits are dropped; nothing is validated.
    pub fn apply_default(&mut self, text: &str) {
        let mut parts = text.trim().split(DATE_SEPARATOR);
        for field in Field::ALL {
            let part = parts.next().unwrap_or_default().trim();
            self.texts[field.index()] = sanitize_digits(part).into_owned();
        }
    }

    pub fn clear(&mut self) {
        self.texts = Default::default();
    }

    /// The fields as `YYYY/MM/DD`, each left-padded to canonical width
    pub fn canonical(&self) -> String {
        format!(
            "{:0>4}{sep}{:0>2}{sep}{:0>2}",
            self.text(Field::Year),
            self.text(Field::Month),
            self.text(Field::Day),
            sep = DATE_SEPARATOR
        )
    }

    /// Whether error messages should be visible: a touched field has errors,
    /// or the form as a whole does.
    pub fn should_display_errors(&self, errors: &ValidationErrorSet) -> bool {
        errors.has_errors(ErrorKey::Form)
            || Field::ALL
                .into_iter()
                .any(|field| self.is_touched(field) && errors.has_errors(field))
    }
}
