use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::consts::{MONTH_DAY_WIDTH, YEAR_WIDTH};
use crate::prelude::*;

/// One of the three segmented text inputs, in focus order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    #[display(fmt = "year")]
    Year,
    #[display(fmt = "month")]
    Month,
    #[display(fmt = "day")]
    Day,
}

impl Field {
    pub const ALL: [Self; 3] = [Self::Year, Self::Month, Self::Day];

    /// Canonical zero-padded width
    pub const fn width(self) -> usize {
        match self {
            Self::Year => YEAR_WIDTH,
            Self::Month | Self::Day => MONTH_DAY_WIDTH,
        }
    }

    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Year => Some(Self::Month),
            Self::Month => Some(Self::Day),
            Self::Day => None,
        }
    }

    pub const fn prev(self) -> Option<Self> {
        match self {
            Self::Year => None,
            Self::Month => Some(Self::Year),
            Self::Day => Some(Self::Month),
        }
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Year => 0,
            Self::Month => 1,
            Self::Day => 2,
        }
    }
}

/// Where a validation error is reported: on one field or on the whole form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub enum ErrorKey {
    #[display(fmt = "{_0}")]
    Field(Field),
    #[display(fmt = "form")]
    Form,
}

impl From<Field> for ErrorKey {
    fn from(field: Field) -> Self {
        Self::Field(field)
    }
}

impl Serialize for ErrorKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

/// Named, user-facing validation failures. Several may be active at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorTag {
    /// The field is empty
    #[display(fmt = "required")]
    Required,
    /// The day exceeds the length of the typed month
    #[display(fmt = "invalidDay")]
    InvalidDay,
    /// The text is not an acceptable value for its field
    #[display(fmt = "pattern")]
    Pattern,
    /// The date precedes the configured minimum
    #[display(fmt = "minDate")]
    MinDate,
    /// The date follows the configured maximum
    #[display(fmt = "maxDate")]
    MaxDate,
}

impl ErrorTag {
    pub const fn is_range(self) -> bool {
        matches!(self, Self::MinDate | Self::MaxDate)
    }
}

/// Errors produced by one validation pass, grouped by where they are shown.
///
/// An empty set is the only state in which the composite date is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrorSet {
    errors: BTreeMap<ErrorKey, BTreeSet<ErrorTag>>,
}

impl ValidationErrorSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<ErrorKey>, tag: ErrorTag) {
        self.errors.entry(key.into()).or_default().insert(tag);
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn contains(&self, key: impl Into<ErrorKey>, tag: ErrorTag) -> bool {
        self.errors
            .get(&key.into())
            .is_some_and(|tags| tags.contains(&tag))
    }

    /// Tags recorded under `key`, in declaration order
    pub fn tags(&self, key: impl Into<ErrorKey>) -> impl Iterator<Item = ErrorTag> + '_ {
        self.errors.get(&key.into()).into_iter().flatten().copied()
    }

    pub fn has_errors(&self, key: impl Into<ErrorKey>) -> bool {
        self.errors.contains_key(&key.into())
    }

    /// Whether `tag` appears under any key
    pub fn has_tag(&self, tag: ErrorTag) -> bool {
        self.errors.values().any(|tags| tags.contains(&tag))
    }

    /// `MinDate`/`MaxDate` tags, wherever they were recorded
    pub fn range_errors(&self) -> BTreeSet<ErrorTag> {
        self.errors
            .values()
            .flatten()
            .copied()
            .filter(|tag| tag.is_range())
            .collect()
    }

    /// Fields still missing input
    pub fn incomplete_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|&field| self.contains(field, ErrorTag::Required))
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ErrorKey, ErrorTag)> + '_ {
        self.errors
            .iter()
            .flat_map(|(&key, tags)| tags.iter().map(move |&tag| (key, tag)))
    }
}

/// A per-field flag set, indexed by [`Field`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct FieldFlags([bool; 3]);

impl FieldFlags {
    pub(crate) const fn get(self, field: Field) -> bool {
        self.0[field.index()]
    }

    pub(crate) const fn set(&mut self, field: Field) {
        self.0[field.index()] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_order() {
        assert_eq!(Field::Year.next(), Some(Field::Month));
        assert_eq!(Field::Month.next(), Some(Field::Day));
        assert_eq!(Field::Day.next(), None);
        assert_eq!(Field::Day.prev(), Some(Field::Month));
        assert_eq!(Field::Year.prev(), None);
    }

    #[test]
    fn test_field_width() {
        assert_eq!(Field::Year.width(), 4);
        assert_eq!(Field::Month.width(), 2);
        assert_eq!(Field::Day.width(), 2);
    }

    #[test]
    fn test_error_set_multiple_tags() {
        let mut errors = ValidationErrorSet::new();
        assert!(errors.is_empty());

        errors.insert(Field::Day, ErrorTag::Required);
        errors.insert(Field::Month, ErrorTag::Pattern);
        errors.insert(ErrorKey::Form, ErrorTag::MinDate);
        errors.insert(Field::Day, ErrorTag::Required);

        assert!(!errors.is_empty());
        assert!(errors.contains(Field::Day, ErrorTag::Required));
        assert!(!errors.contains(Field::Year, ErrorTag::Required));
        assert!(errors.has_tag(ErrorTag::Pattern));
        assert_eq!(errors.iter().count(), 3);
        assert_eq!(errors.incomplete_fields(), vec![Field::Day]);
        assert_eq!(
            errors.range_errors().into_iter().collect::<Vec<_>>(),
            vec![ErrorTag::MinDate]
        );
    }

    #[test]
    fn test_error_set_serializes_like_form_errors() {
        let mut errors = ValidationErrorSet::new();
        errors.insert(Field::Day, ErrorTag::InvalidDay);
        errors.insert(ErrorKey::Form, ErrorTag::MaxDate);

        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"{"day":["invalidDay"],"form":["maxDate"]}"#);
    }

    #[test]
    fn test_field_flags() {
        let mut flags = FieldFlags::default();
        assert!(!flags.get(Field::Month));
        flags.set(Field::Month);
        assert!(flags.get(Field::Month));
        assert!(!flags.get(Field::Year));
    }
}
