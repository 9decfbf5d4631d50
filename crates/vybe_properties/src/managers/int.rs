use super::{attributes, Bounded, ManagerKind, PropertyManager, RangeUpdate};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
struct IntData {
    bounded: Bounded<i32>,
    single_step: i32,
}

impl Default for IntData {
    fn default() -> Self {
        Self {
            bounded: Bounded::new(0, -i32::MAX, i32::MAX),
            single_step: 1,
        }
    }
}

/// Integer properties with a `[minimum, maximum]` range and a single step.
#[derive(Debug)]
pub struct IntManager {
    id: ManagerId,
    properties: HashMap<PropertyId, IntData>,
}

impl Default for IntManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IntManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.bounded.value)
    }

    pub fn minimum(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.bounded.minimum)
    }

    pub fn maximum(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.bounded.maximum)
    }

    pub fn single_step(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.single_step)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.bounded.set_value(value) {
            ctx.value_changed(property, data.bounded.value);
        }
    }

    pub fn set_minimum(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: i32) {
        self.update_range(ctx, property, |b| b.set_minimum(minimum));
    }

    pub fn set_maximum(&mut self, ctx: &mut ManagerContext, property: PropertyId, maximum: i32) {
        self.update_range(ctx, property, |b| b.set_maximum(maximum));
    }

    pub fn set_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: i32, maximum: i32) {
        self.update_range(ctx, property, |b| b.set_range(minimum, maximum));
    }

    /// Negative steps are stored as zero.
    pub fn set_single_step(&mut self, ctx: &mut ManagerContext, property: PropertyId, step: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let step = step.max(0);
        if data.single_step == step {
            return;
        }
        data.single_step = step;
        ctx.emit(Signal::SingleStepChanged {
            property,
            step: Variant::Int(step),
        });
    }

    fn update_range(
        &mut self,
        ctx: &mut ManagerContext,
        property: PropertyId,
        f: impl FnOnce(&mut Bounded<i32>) -> RangeUpdate,
    ) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let update = f(&mut data.bounded);
        if update.range {
            ctx.emit(Signal::RangeChanged {
                property,
                minimum: Variant::Int(data.bounded.minimum),
                maximum: Variant::Int(data.bounded.maximum),
            });
        }
        if update.value {
            ctx.value_changed(property, data.bounded.value);
        }
    }
}

impl PropertyManager for IntManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Int
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, IntData::default());
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        if self.properties.remove(&property).is_some() {
            ctx.destroy(property);
        }
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Int).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Int(v) = value {
            self.set(ctx, property, *v);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::MINIMUM => Variant::Int(data.bounded.minimum),
            attributes::MAXIMUM => Variant::Int(data.bounded.maximum),
            attributes::SINGLE_STEP => Variant::Int(data.single_step),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        let Variant::Int(v) = value else {
            return;
        };
        match attribute {
            attributes::MINIMUM => self.set_minimum(ctx, property, *v),
            attributes::MAXIMUM => self.set_maximum(ctx, property, *v),
            attributes::SINGLE_STEP => self.set_single_step(ctx, property, *v),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property).map(|v| v.to_string()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_clamped_to_range() {
        let mut ctx = ManagerContext::new();
        let mut manager = IntManager::new();
        let p = manager.add_property(&mut ctx, "Width");
        manager.set_range(&mut ctx, p, 0, 100);
        ctx.take_signals();

        manager.set(&mut ctx, p, 250);
        assert_eq!(manager.get(p), Some(100));
        assert_eq!(ctx.take_signals(), vec![Signal::ValueChanged { property: p, value: Variant::Int(100) }]);

        manager.set(&mut ctx, p, 100);
        assert!(ctx.signals.is_empty());
    }

    #[test]
    fn test_negative_single_step_is_zero() {
        let mut ctx = ManagerContext::new();
        let mut manager = IntManager::new();
        let p = manager.add_property(&mut ctx, "Step");
        manager.set_single_step(&mut ctx, p, -5);
        assert_eq!(manager.single_step(p), Some(0));
    }
}
