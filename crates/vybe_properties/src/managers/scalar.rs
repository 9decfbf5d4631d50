use super::{attributes, Bounded, ManagerKind, PropertyManager, RangeUpdate};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::values::{CursorShape, KeySequence};
use crate::variant::{Variant, DATE_FORMAT, TIME_FORMAT};
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::collections::HashMap;

/// A plain value stored by [`ScalarManager`].
pub trait ScalarValue: Clone + PartialEq {
    const KIND: ManagerKind;

    fn initial() -> Self;

    fn from_variant(value: &Variant) -> Option<Self>;

    fn to_variant(&self) -> Variant;

    fn text(&self) -> String;
}

impl ScalarValue for bool {
    const KIND: ManagerKind = ManagerKind::Bool;

    fn initial() -> Self {
        false
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Bool(b) => Some(*b),
            _ => None,
        }
    }

    fn to_variant(&self) -> Variant {
        Variant::Bool(*self)
    }

    fn text(&self) -> String {
        if *self { "True" } else { "False" }.to_string()
    }
}

impl ScalarValue for NaiveTime {
    const KIND: ManagerKind = ManagerKind::Time;

    fn initial() -> Self {
        let now = Local::now().time();
        now.with_nanosecond(0).unwrap_or(now)
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Time(t) => Some(*t),
            _ => None,
        }
    }

    fn to_variant(&self) -> Variant {
        Variant::Time(*self)
    }

    fn text(&self) -> String {
        self.format(TIME_FORMAT).to_string()
    }
}

impl ScalarValue for NaiveDateTime {
    const KIND: ManagerKind = ManagerKind::DateTime;

    fn initial() -> Self {
        let now = Local::now().naive_local();
        now.with_nanosecond(0).unwrap_or(now)
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    fn to_variant(&self) -> Variant {
        Variant::DateTime(*self)
    }

    fn text(&self) -> String {
        self.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

impl ScalarValue for KeySequence {
    const KIND: ManagerKind = ManagerKind::KeySequence;

    fn initial() -> Self {
        KeySequence::default()
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::KeySequence(k) => Some(k.clone()),
            _ => None,
        }
    }

    fn to_variant(&self) -> Variant {
        Variant::KeySequence(self.clone())
    }

    fn text(&self) -> String {
        self.as_str().to_string()
    }
}

/// `'\0'` is the empty character.
impl ScalarValue for char {
    const KIND: ManagerKind = ManagerKind::Char;

    fn initial() -> Self {
        '\0'
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        match value {
            Variant::Char(c) => Some(*c),
            _ => None,
        }
    }

    fn to_variant(&self) -> Variant {
        Variant::Char(*self)
    }

    fn text(&self) -> String {
        if *self == '\0' { String::new() } else { self.to_string() }
    }
}

impl ScalarValue for CursorShape {
    const KIND: ManagerKind = ManagerKind::Cursor;

    fn initial() -> Self {
        CursorShape::Arrow
    }

    fn from_variant(value: &Variant) -> Option<Self> {
        value.as_cursor()
    }

    fn to_variant(&self) -> Variant {
        Variant::Cursor(*self)
    }

    fn text(&self) -> String {
        self.as_str().to_string()
    }
}

/// Manager for value kinds without attributes.
#[derive(Debug)]
pub struct ScalarManager<T> {
    id: ManagerId,
    properties: HashMap<PropertyId, T>,
}

pub type BoolManager = ScalarManager<bool>;
pub type TimeManager = ScalarManager<NaiveTime>;
pub type DateTimeManager = ScalarManager<NaiveDateTime>;
pub type KeySequenceManager = ScalarManager<KeySequence>;
pub type CharManager = ScalarManager<char>;
pub type CursorManager = ScalarManager<CursorShape>;

impl<T: ScalarValue> Default for ScalarManager<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ScalarValue> ScalarManager<T> {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<&T> {
        self.properties.get(&property)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: T) {
        let Some(current) = self.properties.get_mut(&property) else {
            return;
        };
        if *current == value {
            return;
        }
        ctx.value_changed(property, value.to_variant());
        *current = value;
    }
}

impl<T: ScalarValue> PropertyManager for ScalarManager<T> {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        T::KIND
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, T::initial());
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        if self.properties.remove(&property).is_some() {
            ctx.destroy(property);
        }
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(T::to_variant).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Some(v) = T::from_variant(value) {
            self.set(ctx, property, v);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property).map(T::text).unwrap_or_default()
    }
}

pub fn earliest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1752, 9, 14).unwrap_or(NaiveDate::MIN)
}

pub fn latest_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(7999, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Date properties with a `[minimum, maximum]` range.
#[derive(Debug)]
pub struct DateManager {
    id: ManagerId,
    properties: HashMap<PropertyId, Bounded<NaiveDate>>,
}

impl Default for DateManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DateManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<NaiveDate> {
        self.properties.get(&property).map(|b| b.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: NaiveDate) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.set_value(value) {
            ctx.value_changed(property, data.value);
        }
    }

    pub fn set_minimum(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: NaiveDate) {
        self.update_range(ctx, property, |b| b.set_minimum(minimum));
    }

    pub fn set_maximum(&mut self, ctx: &mut ManagerContext, property: PropertyId, maximum: NaiveDate) {
        self.update_range(ctx, property, |b| b.set_maximum(maximum));
    }

    pub fn set_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: NaiveDate, maximum: NaiveDate) {
        self.update_range(ctx, property, |b| b.set_range(minimum, maximum));
    }

    fn update_range(
        &mut self,
        ctx: &mut ManagerContext,
        property: PropertyId,
        f: impl FnOnce(&mut Bounded<NaiveDate>) -> RangeUpdate,
    ) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let update = f(data);
        if update.range {
            ctx.emit(Signal::RangeChanged {
                property,
                minimum: Variant::Date(data.minimum),
                maximum: Variant::Date(data.maximum),
            });
        }
        if update.value {
            ctx.value_changed(property, data.value);
        }
    }
}

impl PropertyManager for DateManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Date
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let today = Local::now().date_naive();
        self.properties
            .insert(property, Bounded::new(today, earliest_date(), latest_date()));
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        if self.properties.remove(&property).is_some() {
            ctx.destroy(property);
        }
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Date).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Date(d) = value {
            self.set(ctx, property, *d);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::MINIMUM => Variant::Date(data.minimum),
            attributes::MAXIMUM => Variant::Date(data.maximum),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        let Variant::Date(d) = value else {
            return;
        };
        match attribute {
            attributes::MINIMUM => self.set_minimum(ctx, property, *d),
            attributes::MAXIMUM => self.set_maximum(ctx, property, *d),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bool_text_and_change_signal() {
        let mut ctx = ManagerContext::new();
        let mut manager = BoolManager::new();
        let p = manager.add_property(&mut ctx, "Visible");
        assert_eq!(manager.value_text(p), "False");
        manager.set_value(&mut ctx, p, &Variant::Bool(true));
        assert_eq!(manager.value_text(p), "True");
        assert_eq!(ctx.take_signals().len(), 1);
        manager.set_value(&mut ctx, p, &Variant::Bool(true));
        assert!(ctx.signals.is_empty());
    }

    #[test]
    fn test_date_is_clamped() {
        let mut ctx = ManagerContext::new();
        let mut manager = DateManager::new();
        let p = manager.add_property(&mut ctx, "Due");
        let early = NaiveDate::from_ymd_opt(1700, 1, 1).expect("date");
        manager.set(&mut ctx, p, early);
        assert_eq!(manager.get(p), Some(earliest_date()));
    }

    #[test]
    fn test_time_has_no_fraction() {
        let mut ctx = ManagerContext::new();
        let mut manager = TimeManager::new();
        let p = manager.add_property(&mut ctx, "Alarm");
        assert_eq!(manager.get(p).map(|t| t.nanosecond()), Some(0));
    }
}
