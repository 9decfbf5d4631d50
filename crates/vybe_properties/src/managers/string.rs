use super::{attributes, ManagerKind, PropertyManager};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::values::RegExp;
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
struct StringData {
    value: String,
    reg_exp: RegExp,
}

/// Text properties, optionally validated against a regular expression.
#[derive(Debug)]
pub struct StringManager {
    id: ManagerId,
    properties: HashMap<PropertyId, StringData>,
}

impl Default for StringManager {
    fn default() -> Self {
        Self::new()
    }
}

impl StringManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<&str> {
        self.properties.get(&property).map(|d| d.value.as_str())
    }

    pub fn reg_exp(&self, property: PropertyId) -> Option<&RegExp> {
        self.properties.get(&property).map(|d| &d.reg_exp)
    }

    /// Values the current pattern rejects are ignored.
    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &str) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value || !data.reg_exp.accepts(value) {
            return;
        }
        data.value = value.to_string();
        ctx.value_changed(property, value);
    }

    pub fn set_reg_exp(&mut self, ctx: &mut ManagerContext, property: PropertyId, reg_exp: RegExp) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.reg_exp == reg_exp {
            return;
        }
        data.reg_exp = reg_exp.clone();
        ctx.emit(Signal::RegExpChanged { property, reg_exp });
    }
}

impl PropertyManager for StringManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::String
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, StringData::default());
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        if self.properties.remove(&property).is_some() {
            ctx.destroy(property);
        }
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::from).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::String(v) = value {
            self.set(ctx, property, v);
        }
    }

    fn attribute(&self, property: PropertyId, attribute: &str) -> Variant {
        match (attribute, self.reg_exp(property)) {
            (attributes::REG_EXP, Some(reg_exp)) => Variant::RegExp(reg_exp.clone()),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        if let (attributes::REG_EXP, Variant::RegExp(reg_exp)) = (attribute, value) {
            self.set_reg_exp(ctx, property, reg_exp.clone());
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property).unwrap_or_default().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reg_exp_rejects_value() {
        let mut ctx = ManagerContext::new();
        let mut manager = StringManager::new();
        let p = manager.add_property(&mut ctx, "Name");
        manager.set_reg_exp(&mut ctx, p, RegExp::new("[a-z]+").expect("pattern"));
        manager.set(&mut ctx, p, "Button1");
        assert_eq!(manager.get(p), Some(""));
        manager.set(&mut ctx, p, "button");
        assert_eq!(manager.get(p), Some("button"));
    }
}
