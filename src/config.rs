use serde::{Deserialize, Serialize};

use crate::{CalendarSystem, DateRange, RangeError};

/// Settings the hosting form supplies when it creates a date input.
///
/// Bounds and the default value use the canonical `YYYY/MM/DD` form in the
/// active calendar; an empty bound leaves that side open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WidgetConfig {
    /// Stored language preference (`"fa"` selects Jalali)
    pub language:      Option<String>,
    /// Explicit calendar; takes precedence over `language`
    pub system:        Option<CalendarSystem>,
    pub min_date:      String,
    pub max_date:      String,
    pub default_value: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid widget configuration: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Range(#[from] RangeError),
}

impl WidgetConfig {
    /// Parses a TOML configuration table.
    ///
    /// # Errors
    /// Returns `ConfigError::Toml` for malformed TOML or unknown calendar names.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// The calendar to use: `system` if set, else the one `language` implies,
    /// else Jalali.
    pub fn system(&self) -> CalendarSystem {
        self.system.unwrap_or_else(|| {
            self.language
                .as_deref()
                .map_or_else(CalendarSystem::default, CalendarSystem::from_language)
        })
    }

    /// Parses the configured bounds in the active calendar.
    ///
    /// # Errors
    /// Returns `RangeError` for a malformed bound or min > max.
    pub fn range(&self) -> Result<DateRange, RangeError> {
        DateRange::parse(self.system(), &self.min_date, &self.max_date)
    }
}
