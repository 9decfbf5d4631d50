use super::{attributes, BoolManager, ManagerKind, PropertyManager};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::variant::Variant;
use std::collections::HashMap;

/// Mask of flag `index`; flags past bit 30 have no bit in the non-negative
/// value and get an empty mask.
fn flag_bit(index: usize) -> i32 {
    if index >= 31 {
        return 0;
    }
    1 << index
}

#[derive(Debug, Clone, Default)]
struct FlagData {
    value: i32,
    names: Vec<String>,
    subs: Vec<PropertyId>,
}

/// Bit-set properties. Every flag name gets a bool sub-property; bit `i` of
/// the value mirrors the `i`-th sub-property.
#[derive(Debug)]
pub struct FlagManager {
    id: ManagerId,
    properties: HashMap<PropertyId, FlagData>,
    bools: BoolManager,
    sub_to_flag: HashMap<PropertyId, (PropertyId, usize)>,
}

impl Default for FlagManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            bools: BoolManager::new(),
            sub_to_flag: HashMap::new(),
        }
    }

    pub fn bool_manager(&self) -> &BoolManager {
        &self.bools
    }

    pub fn get(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn flag_names(&self, property: PropertyId) -> Option<&[String]> {
        self.properties.get(&property).map(|d| d.names.as_slice())
    }

    /// Values with bits beyond the named flags are ignored.
    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value || value < 0 {
            return;
        }
        let limit = 1i64.checked_shl(data.names.len() as u32).unwrap_or(i64::MAX) - 1;
        if i64::from(value) > limit {
            return;
        }
        data.value = value;
        for (i, sub) in data.subs.iter().enumerate() {
            self.bools.set(ctx, *sub, value & flag_bit(i) != 0);
        }
        ctx.value_changed(property, value);
    }

    /// Rebuilds the bool sub-properties and resets the value to zero.
    pub fn set_flag_names(&mut self, ctx: &mut ManagerContext, property: PropertyId, names: Vec<String>) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.names == names {
            return;
        }
        for sub in data.subs.drain(..) {
            self.sub_to_flag.remove(&sub);
            self.bools.remove_property(ctx, sub);
        }
        data.value = 0;
        data.names = names.clone();
        for (i, name) in names.iter().enumerate() {
            let sub = self.bools.add_property(ctx, name);
            ctx.append_sub_property(property, sub);
            data.subs.push(sub);
            self.sub_to_flag.insert(sub, (property, i));
        }
        ctx.emit(Signal::FlagNamesChanged { property, names });
        ctx.value_changed(property, 0);
    }
}

impl PropertyManager for FlagManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Flag
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, FlagData::default());
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        for sub in data.subs {
            self.sub_to_flag.remove(&sub);
            self.bools.remove_property(ctx, sub);
        }
        ctx.destroy(property);
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
        match (attribute, self.flag_names(property)) {
            (attributes::FLAG_NAMES, Some(names)) => Variant::StringList(names.to_vec()),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        if let (attributes::FLAG_NAMES, Variant::StringList(names)) = (attribute, value) {
            self.set_flag_names(ctx, property, names.clone());
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        let Some(data) = self.properties.get(&property) else {
            return String::new();
        };
        data.names
            .iter()
            .enumerate()
            .filter(|(i, _)| data.value & flag_bit(*i) != 0)
            .map(|(_, name)| name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.bools]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.bools.id() == manager).then_some(&mut self.bools as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some((flag, bit)) = self.sub_to_flag.get(&property).copied() else {
            return;
        };
        let Some(checked) = self.bools.get(property).copied() else {
            return;
        };
        let mask = flag_bit(bit);
        if mask == 0 {
            if checked {
                self.bools.set(ctx, property, false);
            }
            return;
        }
        let Some(data) = self.properties.get_mut(&flag) else {
            return;
        };
        let value = if checked { data.value | mask } else { data.value & !mask };
        if value != data.value {
            data.value = value;
            ctx.value_changed(flag, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::dispatch_write;

    fn names() -> Vec<String> {
        vec!["Bold".into(), "Italic".into(), "Underline".into()]
    }

    #[test]
    fn test_names_create_bool_children() {
        let mut ctx = ManagerContext::new();
        let mut manager = FlagManager::new();
        let p = manager.add_property(&mut ctx, "Style");
        manager.set_flag_names(&mut ctx, p, names());
        assert_eq!(ctx.tree.children(p).len(), 3);

        manager.set(&mut ctx, p, 5);
        assert_eq!(manager.value_text(p), "Bold|Underline");
        let italic = ctx.tree.children(p)[1];
        assert_eq!(manager.bool_manager().get(italic), Some(&false));

        manager.set(&mut ctx, p, 8);
        assert_eq!(manager.get(p), Some(5));
    }

    #[test]
    fn test_child_write_updates_parent() {
        let mut ctx = ManagerContext::new();
        let mut manager = FlagManager::new();
        let p = manager.add_property(&mut ctx, "Style");
        manager.set_flag_names(&mut ctx, p, names());
        let italic = ctx.tree.children(p)[1];
        let owner = ctx.tree.manager_of(italic).expect("owner");

        let handled = dispatch_write(&mut manager, owner, &mut ctx, italic, &mut |m, ctx| {
            m.set_value(ctx, italic, &Variant::Bool(true))
        });
        assert!(handled);
        assert_eq!(manager.get(p), Some(2));
    }

    #[test]
    fn test_renaming_replaces_children() {
        let mut ctx = ManagerContext::new();
        let mut manager = FlagManager::new();
        let p = manager.add_property(&mut ctx, "Style");
        manager.set_flag_names(&mut ctx, p, names());
        let old = ctx.tree.children(p).to_vec();
        ctx.take_signals();
        manager.set_flag_names(&mut ctx, p, vec!["A".into()]);
        let signals = ctx.take_signals();
        let removed = signals.iter().filter(|s| matches!(s, Signal::PropertyRemoved { .. })).count();
        assert_eq!(removed, old.len());
        assert_eq!(ctx.tree.children(p).len(), 1);
    }
}
