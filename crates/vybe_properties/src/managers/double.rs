use super::{attributes, Bounded, ManagerKind, PropertyManager, RangeUpdate};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::variant::Variant;
use std::collections::HashMap;

pub const MAX_DECIMALS: i32 = 13;

#[derive(Debug, Clone, Copy, PartialEq)]
struct DoubleData {
    bounded: Bounded<f64>,
    single_step: f64,
    decimals: i32,
}

impl Default for DoubleData {
    fn default() -> Self {
        Self {
            bounded: Bounded::new(0.0, -f64::MAX, f64::MAX),
            single_step: 1.0,
            decimals: 2,
        }
    }
}

/// Floating point properties with range, single step and display decimals.
#[derive(Debug)]
pub struct DoubleManager {
    id: ManagerId,
    properties: HashMap<PropertyId, DoubleData>,
}

impl Default for DoubleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl DoubleManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<f64> {
        self.properties.get(&property).map(|d| d.bounded.value)
    }

    pub fn decimals(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.decimals)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: f64) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if value.is_nan() {
            return;
        }
        if data.bounded.set_value(value) {
            ctx.value_changed(property, data.bounded.value);
        }
    }

    pub fn set_minimum(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: f64) {
        self.update_range(ctx, property, |b| b.set_minimum(minimum));
    }

    pub fn set_maximum(&mut self, ctx: &mut ManagerContext, property: PropertyId, maximum: f64) {
        self.update_range(ctx, property, |b| b.set_maximum(maximum));
    }

    pub fn set_range(&mut self, ctx: &mut ManagerContext, property: PropertyId, minimum: f64, maximum: f64) {
        self.update_range(ctx, property, |b| b.set_range(minimum, maximum));
    }

    pub fn set_single_step(&mut self, ctx: &mut ManagerContext, property: PropertyId, step: f64) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let step = step.max(0.0);
        if data.single_step == step {
            return;
        }
        data.single_step = step;
        ctx.emit(Signal::SingleStepChanged {
            property,
            step: Variant::Double(step),
        });
    }

    /// Clamped to `0..=13`.
    pub fn set_decimals(&mut self, ctx: &mut ManagerContext, property: PropertyId, decimals: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let decimals = decimals.clamp(0, MAX_DECIMALS);
        if data.decimals == decimals {
            return;
        }
        data.decimals = decimals;
        ctx.emit(Signal::DecimalsChanged { property, decimals });
    }

    fn update_range(
        &mut self,
        ctx: &mut ManagerContext,
        property: PropertyId,
        f: impl FnOnce(&mut Bounded<f64>) -> RangeUpdate,
    ) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let update = f(&mut data.bounded);
        if update.range {
            ctx.emit(Signal::RangeChanged {
                property,
                minimum: Variant::Double(data.bounded.minimum),
                maximum: Variant::Double(data.bounded.maximum),
            });
        }
        if update.value {
            ctx.value_changed(property, data.bounded.value);
        }
    }
}

impl PropertyManager for DoubleManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Double
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, DoubleData::default());
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        if self.properties.remove(&property).is_some() {
            ctx.destroy(property);
        }
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Double).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Double(v) = value {
            self.set(ctx, property, *v);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        let Some(data) = self.properties.get(&property) else {
            return Variant::Invalid;
        };
        match attribute {
            attributes::MINIMUM => Variant::Double(data.bounded.minimum),
            attributes::MAXIMUM => Variant::Double(data.bounded.maximum),
            attributes::SINGLE_STEP => Variant::Double(data.single_step),
            attributes::DECIMALS => Variant::Int(data.decimals),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        match (attribute, value) {
            (attributes::MINIMUM, Variant::Double(v)) => self.set_minimum(ctx, property, *v),
            (attributes::MAXIMUM, Variant::Double(v)) => self.set_maximum(ctx, property, *v),
            (attributes::SINGLE_STEP, Variant::Double(v)) => self.set_single_step(ctx, property, *v),
            (attributes::DECIMALS, Variant::Int(v)) => self.set_decimals(ctx, property, *v),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.properties
            .get(&property)
            .map(|d| format!("{:.*}", d.decimals as usize, d.bounded.value))
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimals_clamped_and_used_for_text() {
        let mut ctx = ManagerContext::new();
        let mut manager = DoubleManager::new();
        let p = manager.add_property(&mut ctx, "Opacity");
        manager.set(&mut ctx, p, 0.5);
        manager.set_decimals(&mut ctx, p, 40);
        assert_eq!(manager.decimals(p), Some(MAX_DECIMALS));
        manager.set_decimals(&mut ctx, p, 3);
        assert_eq!(manager.value_text(p), "0.500");
    }
}
