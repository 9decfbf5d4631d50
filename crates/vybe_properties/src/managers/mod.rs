//! Internal property managers. Each one owns the typed storage of the
//! properties it creates and reports changes as [`Signal`]s.

pub mod color;
pub mod double;
pub mod enums;
pub mod flag;
pub mod font;
pub mod geometry;
pub mod int;
pub mod locale;
pub mod scalar;
pub mod size_policy;
pub mod string;

pub use color::ColorManager;
pub use double::DoubleManager;
pub use enums::EnumManager;
pub use flag::FlagManager;
pub use font::FontManager;
pub use geometry::{PointFManager, PointManager, RectFManager, RectManager, SizeFManager, SizeManager};
pub use int::IntManager;
pub use locale::LocaleManager;
pub use scalar::{BoolManager, CharManager, CursorManager, DateManager, DateTimeManager, KeySequenceManager, TimeManager};
pub use size_policy::SizePolicyManager;
pub use string::StringManager;

use crate::signal::ManagerContext;
use crate::tree::{ManagerId, PropertyId};
use crate::values::Icon;
use crate::variant::Variant;

/// Attribute names understood by the managers.
pub mod attributes {
    pub const CONSTRAINT: &str = "constraint";
    pub const SINGLE_STEP: &str = "singleStep";
    pub const DECIMALS: &str = "decimals";
    pub const ENUM_ICONS: &str = "enumIcons";
    pub const ENUM_NAMES: &str = "enumNames";
    pub const FLAG_NAMES: &str = "flagNames";
    pub const MAXIMUM: &str = "maximum";
    pub const MINIMUM: &str = "minimum";
    pub const REG_EXP: &str = "regExp";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerKind {
    Int,
    Double,
    Bool,
    String,
    Date,
    Time,
    DateTime,
    KeySequence,
    Char,
    Locale,
    Point,
    PointF,
    Size,
    SizeF,
    Rect,
    RectF,
    Color,
    Enum,
    SizePolicy,
    Font,
    Cursor,
    Flag,
}

impl ManagerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ManagerKind::Int => "Int",
            ManagerKind::Double => "Double",
            ManagerKind::Bool => "Bool",
            ManagerKind::String => "String",
            ManagerKind::Date => "Date",
            ManagerKind::Time => "Time",
            ManagerKind::DateTime => "DateTime",
            ManagerKind::KeySequence => "KeySequence",
            ManagerKind::Char => "Char",
            ManagerKind::Locale => "Locale",
            ManagerKind::Point => "Point",
            ManagerKind::PointF => "PointF",
            ManagerKind::Size => "Size",
            ManagerKind::SizeF => "SizeF",
            ManagerKind::Rect => "Rect",
            ManagerKind::RectF => "RectF",
            ManagerKind::Color => "Color",
            ManagerKind::Enum => "Enum",
            ManagerKind::SizePolicy => "SizePolicy",
            ManagerKind::Font => "Font",
            ManagerKind::Cursor => "Cursor",
            ManagerKind::Flag => "Flag",
        }
    }
}

/// Boxed-value capability every internal manager implements.
///
/// Values handed to `set_value`/`set_attribute` are already converted to the
/// registered value/attribute type; managers still ignore values of the wrong
/// kind. Composite managers own sub-managers: writes to a sub-property are
/// routed through the composite (see [`dispatch_write`]) so it can bring its
/// own value back in sync.
pub trait PropertyManager {
    fn id(&self) -> ManagerId;

    fn kind(&self) -> ManagerKind;

    /// Whether `property` was created by this manager itself.
    fn has_property(&self, property: PropertyId) -> bool;

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId;

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId);

    fn value(&self, property: PropertyId) -> Variant;

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant);

    fn attribute(&self, _property: PropertyId, _attribute: &str) -> Variant {
        Variant::Invalid
    }

    fn set_attribute(&mut self, _ctx: &mut ManagerContext, _property: PropertyId, _attribute: &str, _value: &Variant) {}

    fn value_text(&self, property: PropertyId) -> String;

    fn value_icon(&self, _property: PropertyId) -> Option<Icon> {
        None
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        Vec::new()
    }

    /// The direct sub-manager that is, or contains, `manager`.
    fn sub_manager_mut(&mut self, _manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        None
    }

    /// Called after a property owned by a sub-manager was written.
    fn sub_property_changed(&mut self, _ctx: &mut ManagerContext, _property: PropertyId) {}
}

/// Finds `id` among `manager` and its sub-managers.
pub fn find_manager(manager: &dyn PropertyManager, id: ManagerId) -> Option<&dyn PropertyManager> {
    if manager.id() == id {
        return Some(manager);
    }
    manager.sub_managers().into_iter().find_map(|sub| find_manager(sub, id))
}

/// Runs `op` on the manager with id `owner`, walking down from `manager`.
/// Every composite on the way is told about the change once `op` returns.
pub fn dispatch_write(
    manager: &mut dyn PropertyManager,
    owner: ManagerId,
    ctx: &mut ManagerContext,
    property: PropertyId,
    op: &mut dyn FnMut(&mut dyn PropertyManager, &mut ManagerContext),
) -> bool {
    if manager.id() == owner {
        op(manager, ctx);
        return true;
    }
    let handled = match manager.sub_manager_mut(owner) {
        Some(sub) => dispatch_write(sub, owner, ctx, property, op),
        None => false,
    };
    if handled {
        manager.sub_property_changed(ctx, property);
    }
    handled
}

/// Creates a sub-property on `manager` and appends it under `parent`.
pub(crate) fn add_sub_property(
    ctx: &mut ManagerContext,
    manager: &mut dyn PropertyManager,
    parent: PropertyId,
    name: &str,
) -> PropertyId {
    let sub = manager.add_property(ctx, name);
    ctx.append_sub_property(parent, sub);
    sub
}

/// A value kept inside `[minimum, maximum]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounded<T> {
    pub value: T,
    pub minimum: T,
    pub maximum: T,
}

/// What a range update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeUpdate {
    pub range: bool,
    pub value: bool,
}

impl<T: PartialOrd + Copy> Bounded<T> {
    pub fn new(value: T, minimum: T, maximum: T) -> Self {
        let mut b = Self { value, minimum, maximum };
        b.value = b.clamp(value);
        b
    }

    pub fn clamp(&self, v: T) -> T {
        if v < self.minimum {
            self.minimum
        } else if v > self.maximum {
            self.maximum
        } else {
            v
        }
    }

    /// Returns whether the stored value changed.
    pub fn set_value(&mut self, v: T) -> bool {
        let v = self.clamp(v);
        if v == self.value {
            return false;
        }
        self.value = v;
        true
    }

    pub fn set_minimum(&mut self, minimum: T) -> RangeUpdate {
        let maximum = if self.maximum < minimum { minimum } else { self.maximum };
        self.apply_range(minimum, maximum)
    }

    pub fn set_maximum(&mut self, maximum: T) -> RangeUpdate {
        let minimum = if self.minimum > maximum { maximum } else { self.minimum };
        self.apply_range(minimum, maximum)
    }

    /// Swaps the bounds when given in the wrong order.
    pub fn set_range(&mut self, minimum: T, maximum: T) -> RangeUpdate {
        if minimum > maximum {
            self.apply_range(maximum, minimum)
        } else {
            self.apply_range(minimum, maximum)
        }
    }

    fn apply_range(&mut self, minimum: T, maximum: T) -> RangeUpdate {
        if minimum == self.minimum && maximum == self.maximum {
            return RangeUpdate::default();
        }
        self.minimum = minimum;
        self.maximum = maximum;
        let old = self.value;
        self.value = self.clamp(old);
        RangeUpdate {
            range: true,
            value: old != self.value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounded_minimum_pushes_maximum() {
        let mut b = Bounded::new(5, 0, 10);
        let update = b.set_minimum(20);
        assert_eq!(update, RangeUpdate { range: true, value: true });
        assert_eq!((b.minimum, b.maximum, b.value), (20, 20, 20));
    }

    #[test]
    fn test_bounded_range_swaps() {
        let mut b = Bounded::new(5, 0, 10);
        b.set_range(8, 2);
        assert_eq!((b.minimum, b.maximum, b.value), (2, 8, 5));
        assert_eq!(b.set_range(2, 8), RangeUpdate::default());
    }
}
