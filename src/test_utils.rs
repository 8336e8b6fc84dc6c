//! Builders shared by the unit tests.

use crate::{CalendarDate, CalendarSystem, DateRange, InputSession, WidgetConfig};

pub const fn jal(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::jalali(year, month, day)
}

pub const fn greg(year: u16, month: u8, day: u8) -> CalendarDate {
    CalendarDate::gregorian(year, month, day)
}

/// A session over `system` with the given canonical bounds ("" for open).
pub fn session(system: CalendarSystem, min: &str, max: &str) -> InputSession {
    let range = DateRange::parse(system, min, max).expect("failed to construct test range");
    InputSession::new(system, range)
}

pub fn config(system: CalendarSystem) -> WidgetConfig {
    WidgetConfig {
        system: Some(system),
        ..WidgetConfig::default()
    }
}
