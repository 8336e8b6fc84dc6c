//! Event-driven controller that reconciles the segmented fields with the
//! calendar picker and decides when a date is handed back to the form.
//!
//! The host forwards every observed UI event to [`InputSession::dispatch`]
//! and carries out the returned [`Effect`]s. Work that must not run while the
//! host is still mid-event (applying a default, applying new bounds, emitting
//! after a picker selection) is queued and drained before `dispatch` returns.

use std::collections::VecDeque;

use tracing::{debug, trace, warn};

use crate::model::sanitize_digits;
use crate::{
    CalendarDate, CalendarSystem, ConfigError, DateRange, ErrorTag, Field, SegmentedDateModel,
    ValidationErrorSet, WidgetConfig, convert_to,
};

/// Keys that move focus between the fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavKey {
    ArrowLeft,
    ArrowRight,
    Backspace,
}

impl NavKey {
    /// Maps a DOM-style key name. Other keys are not navigation keys.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(Self::ArrowLeft),
            "ArrowRight" => Some(Self::ArrowRight),
            "Backspace" => Some(Self::Backspace),
            _ => None,
        }
    }
}

/// Where the host should place the caret in a newly focused field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Caret {
    Start,
    /// After the last character; carries the field's text length
    End(usize),
}

/// Everything the host can observe and forward.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    FieldFocused(Field),
    /// Raw text of `field` after an edit, pasted text included. Non-digits
    /// are dropped and anything past the field's width is cut off.
    FieldEdited { field: Field, text: String },
    FieldBlurred(Field),
    /// A date chosen in the picker, always Gregorian
    CompositeSelected(CalendarDate),
    CompositeCleared,
    /// `caret` is the collapsed caret position in the focused field
    NavigationKey { key: NavKey, caret: usize },
    DefaultValueSupplied(String),
    RangeChanged(DateRange),
}

/// Work the host must perform after a dispatch, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Hand the canonical `YYYY/MM/DD` value to the form
    Emit(String),
    Focus { field: Field, caret: Caret },
    /// Show this Gregorian date in the picker (or clear it)
    SetPicker(Option<CalendarDate>),
}

/// Coarse status of the typed input, derived from the current error set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Empty,
    PartiallyTyped,
    StructurallyInvalid,
    OutOfRange,
    Valid,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Deferred {
    ApplyDefault(String),
    ApplyRange(DateRange),
    Emit,
}

/// One live date input. Owns its model and bounds; never shared.
#[derive(Debug, Clone)]
pub struct InputSession {
    model:    SegmentedDateModel,
    range:    DateRange,
    errors:   ValidationErrorSet,
    focused:  Option<Field>,
    /// Last Gregorian date the picker is known to show
    picker:   Option<CalendarDate>,
    deferred: VecDeque<Deferred>,
}

impl InputSession {
    pub fn new(system: CalendarSystem, range: DateRange) -> Self {
        let model = SegmentedDateModel::new(system);
        let errors = model.validate(&range);
        Self {
            model,
            range,
            errors,
            focused: None,
            picker: None,
            deferred: VecDeque::new(),
        }
    }

    /// Builds a session from host configuration. A configured default value is
    /// queued and applied by the next [`flush`](Self::flush) or dispatch.
    ///
    /// # Errors
    /// Returns `ConfigError` if the configured bounds are invalid.
    pub fn from_config(config: &WidgetConfig) -> Result<Self, ConfigError> {
        let mut session = Self::new(config.system(), config.range()?);
        if let Some(default) = config.default_value.as_deref().filter(|d| !d.trim().is_empty()) {
            session.defer(Deferred::ApplyDefault(default.to_owned()));
        }
        Ok(session)
    }

    pub const fn system(&self) -> CalendarSystem {
        self.model.system()
    }

    pub const fn model(&self) -> &SegmentedDateModel {
        &self.model
    }

    pub const fn range(&self) -> &DateRange {
        &self.range
    }

    pub const fn errors(&self) -> &ValidationErrorSet {
        &self.errors
    }

    pub const fn focused(&self) -> Option<Field> {
        self.focused
    }

    /// The canonical value, if the input is currently valid
    pub fn value(&self) -> Option<String> {
        self.errors.is_empty().then(|| self.model.canonical())
    }

    pub fn should_display_errors(&self) -> bool {
        self.model.should_display_errors(&self.errors)
    }

    pub fn state(&self) -> SessionState {
        if self.model.is_blank() {
            SessionState::Empty
        } else if self.errors.is_empty() {
            SessionState::Valid
        } else if self.errors.has_tag(ErrorTag::Pattern) || self.errors.has_tag(ErrorTag::InvalidDay) {
            SessionState::StructurallyInvalid
        } else if self.errors.has_tag(ErrorTag::Required) {
            SessionState::PartiallyTyped
        } else {
            SessionState::OutOfRange
        }
    }

    /// Processes one external event to completion, then runs any work it deferred.
    pub fn dispatch(&mut self, event: InputEvent) -> Vec<Effect> {
        let mut effects = self.flush();
        trace!(?event, "EVENT: dispatching");

        match event {
            InputEvent::FieldFocused(field) => self.focused = Some(field),
            InputEvent::FieldEdited { field, text } => self.field_edited(field, &text, &mut effects),
            InputEvent::FieldBlurred(field) => self.field_blurred(field, &mut effects),
            InputEvent::CompositeSelected(date) => self.composite_selected(date, &mut effects),
            InputEvent::CompositeCleared => self.composite_cleared(),
            InputEvent::NavigationKey { key, caret } => self.navigate(key, caret, &mut effects),
            InputEvent::DefaultValueSupplied(text) => self.defer(Deferred::ApplyDefault(text)),
            InputEvent::RangeChanged(range) => self.defer(Deferred::ApplyRange(range)),
        }

        self.drain_deferred(&mut effects);
        effects
    }

    /// Runs deferred work left over from construction or a previous dispatch.
    pub fn flush(&mut self) -> Vec<Effect> {
        let mut effects = Vec::new();
        self.drain_deferred(&mut effects);
        effects
    }

    fn defer(&mut self, task: Deferred) {
        trace!(?task, "DEFER: queued");
        self.deferred.push_back(task);
    }

    fn drain_deferred(&mut self, effects: &mut Vec<Effect>) {
        while let Some(task) = self.deferred.pop_front() {
            debug!(?task, "DEFER: running");
            match task {
                Deferred::ApplyDefault(text) => {
                    self.model.apply_default(&text);
                    self.revalidate();
                    self.push_picker(effects);
                    self.emit_if_valid(effects);
                }
                Deferred::ApplyRange(range) => {
                    self.range = range;
                    self.revalidate();
                    self.emit_if_valid(effects);
                }
                Deferred::Emit => {
                    self.revalidate();
                    self.emit_if_valid(effects);
                }
            }
        }
    }

    fn revalidate(&mut self) {
        self.errors = self.model.validate(&self.range);
    }

    fn emit_if_valid(&self, effects: &mut Vec<Effect>) {
        if let Some(value) = self.value() {
            debug!(%value, "EMIT: date is valid");
            effects.push(Effect::Emit(value));
        }
    }

    fn focus(&mut self, field: Field, caret: Caret, effects: &mut Vec<Effect>) {
        debug!(%field, ?caret, "FOCUS: moving");
        self.focused = Some(field);
        effects.push(Effect::Focus { field, caret });
    }

    /// Every field up to and including `field` holds its full width.
    fn filled_through(&self, field: Field) -> bool {
        Field::ALL
            .into_iter()
            .take_while(|&f| f <= field)
            .all(|f| self.model.is_full(f))
    }

    fn field_edited(&mut self, field: Field, text: &str, effects: &mut Vec<Effect>) {
        let mut value = sanitize_digits(text).into_owned();
        value.truncate(field.width());

        let was_full = self.model.is_full(field);
        self.model.set_field_text(field, value);
        self.focused = Some(field);
        self.revalidate();

        if !was_full && self.filled_through(field) {
            if let Some(next) = field.next() {
                self.focus(next, Caret::Start, effects);
            }
        }

        self.emit_if_valid(effects);
    }

    fn field_blurred(&mut self, field: Field, effects: &mut Vec<Effect>) {
        self.model.commit_field(field);
        if self.focused == Some(field) {
            self.focused = None;
        }
        self.revalidate();

        if self.push_picker(effects) {
            self.defer(Deferred::Emit);
        }
    }

    /// Shows the current date in the picker when it is valid and differs from
    /// what the picker already shows. Returns whether the picker was updated.
    fn push_picker(&mut self, effects: &mut Vec<Effect>) -> bool {
        if !self.errors.is_empty() {
            return false;
        }
        let Some(composite) = self.model.derive_composite() else {
            return false;
        };

        match convert_to(composite, CalendarSystem::Gregorian) {
            Ok(gregorian) if self.picker != Some(gregorian) => {
                debug!(%gregorian, "PICKER: updating");
                self.picker = Some(gregorian);
                effects.push(Effect::SetPicker(Some(gregorian)));
                true
            }
            Ok(_) => false,
            Err(err) => {
                warn!(%composite, %err, "PICKER: composite has no Gregorian equivalent");
                false
            }
        }
    }

    /// The picker reporting back the value this session just gave it.
    fn is_echo(&self, date: CalendarDate) -> bool {
        self.picker == Some(date)
            && self
                .model
                .derive_composite()
                .and_then(|c| convert_to(c, CalendarSystem::Gregorian).ok())
                == Some(date)
    }

    /// A selection with no counterpart in this calendar changes nothing and
    /// puts the picker back on the date it showed before.
    fn composite_selected(&mut self, date: CalendarDate, effects: &mut Vec<Effect>) {
        if self.is_echo(date) {
            trace!(%date, "PICKER: ignoring echo");
            return;
        }

        match self.model.from_composite(date) {
            Ok(local) => {
                debug!(%date, %local, "PICKER: selection written to fields");
                self.picker = Some(date);
            }
            Err(err) => {
                warn!(%date, %err, "PICKER: selection has no counterpart");
                effects.push(Effect::SetPicker(self.picker));
                return;
            }
        }
        self.revalidate();
        self.defer(Deferred::Emit);
    }

    fn composite_cleared(&mut self) {
        self.model.clear();
        self.picker = None;
        self.revalidate();
        self.defer(Deferred::Emit);
    }

    fn navigate(&mut self, key: NavKey, caret: usize, effects: &mut Vec<Effect>) {
        let Some(field) = self.focused else {
            return;
        };
        let len = self.model.text(field).len();

        let target = match key {
            NavKey::ArrowRight if caret >= len => field.next().map(|next| (next, Caret::Start)),
            NavKey::ArrowLeft | NavKey::Backspace if caret == 0 => self.back_from(field),
            NavKey::Backspace if len == 0 => self.back_from(field),
            NavKey::ArrowRight | NavKey::ArrowLeft | NavKey::Backspace => None,
        };

        if let Some((target, caret)) = target {
            self.focus(target, caret, effects);
        }
    }

    /// The previous field, with the caret after its last character
    fn back_from(&self, field: Field) -> Option<(Field, Caret)> {
        field
            .prev()
            .map(|prev| (prev, Caret::End(self.model.text(prev).len())))
    }
}
