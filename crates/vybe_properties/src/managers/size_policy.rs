use super::{add_sub_property, EnumManager, IntManager, ManagerKind, PropertyManager};
use crate::signal::ManagerContext;
use crate::tree::{ManagerId, PropertyId};
use crate::values::{Policy, SizePolicy};
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct SizePolicyData {
    value: SizePolicy,
    horizontal: PropertyId,
    vertical: PropertyId,
    horizontal_stretch: PropertyId,
    vertical_stretch: PropertyId,
}

fn sync_subs(ctx: &mut ManagerContext, enums: &mut EnumManager, ints: &mut IntManager, data: &SizePolicyData) {
    enums.set(ctx, data.horizontal, data.value.horizontal.index());
    enums.set(ctx, data.vertical, data.value.vertical.index());
    ints.set(ctx, data.horizontal_stretch, data.value.horizontal_stretch.into());
    ints.set(ctx, data.vertical_stretch, data.value.vertical_stretch.into());
}

#[derive(Debug)]
pub struct SizePolicyManager {
    id: ManagerId,
    properties: HashMap<PropertyId, SizePolicyData>,
    enums: EnumManager,
    ints: IntManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for SizePolicyManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SizePolicyManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            enums: EnumManager::new(),
            ints: IntManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<SizePolicy> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: SizePolicy) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value {
            return;
        }
        data.value = value;
        sync_subs(ctx, &mut self.enums, &mut self.ints, data);
        ctx.value_changed(property, value);
    }
}

impl PropertyManager for SizePolicyManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::SizePolicy
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let horizontal = add_sub_property(ctx, &mut self.enums, property, "Horizontal Policy");
        self.enums.set_enum_names(ctx, horizontal, Policy::names());
        let vertical = add_sub_property(ctx, &mut self.enums, property, "Vertical Policy");
        self.enums.set_enum_names(ctx, vertical, Policy::names());
        let horizontal_stretch = add_sub_property(ctx, &mut self.ints, property, "Horizontal Stretch");
        self.ints.set_range(ctx, horizontal_stretch, 0, 255);
        let vertical_stretch = add_sub_property(ctx, &mut self.ints, property, "Vertical Stretch");
        self.ints.set_range(ctx, vertical_stretch, 0, 255);
        let data = SizePolicyData {
            value: SizePolicy::default(),
            horizontal,
            vertical,
            horizontal_stretch,
            vertical_stretch,
        };
        sync_subs(ctx, &mut self.enums, &mut self.ints, &data);
        for sub in [horizontal, vertical, horizontal_stretch, vertical_stretch] {
            self.sub_to_parent.insert(sub, property);
        }
        self.properties.insert(property, data);
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        for sub in [data.horizontal, data.vertical] {
            self.sub_to_parent.remove(&sub);
            self.enums.remove_property(ctx, sub);
        }
        for sub in [data.horizontal_stretch, data.vertical_stretch] {
            self.sub_to_parent.remove(&sub);
            self.ints.remove_property(ctx, sub);
        }
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::SizePolicy).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Some(policy) = value.as_size_policy() {
            self.set(ctx, property, policy);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|p| Variant::SizePolicy(p).to_string())
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.enums, &self.ints]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        if self.enums.id() == manager {
            Some(&mut self.enums)
        } else if self.ints.id() == manager {
            Some(&mut self.ints)
        } else {
            None
        }
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let Some(data) = self.properties.get(&parent).copied() else {
            return;
        };
        let mut value = data.value;
        if property == data.horizontal || property == data.vertical {
            let Some(policy) = self.enums.get(property).and_then(Policy::from_index) else {
                return;
            };
            if property == data.horizontal {
                value.horizontal = policy;
            } else {
                value.vertical = policy;
            }
        } else {
            let Some(stretch) = self.ints.get(property).and_then(|v| u8::try_from(v).ok()) else {
                return;
            };
            if property == data.horizontal_stretch {
                value.horizontal_stretch = stretch;
            } else {
                value.vertical_stretch = stretch;
            }
        }
        self.set(ctx, parent, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_policy_children() {
        let mut ctx = ManagerContext::new();
        let mut manager = SizePolicyManager::new();
        let p = manager.add_property(&mut ctx, "SizePolicy");
        assert_eq!(ctx.tree.children(p).len(), 4);
        manager.set(
            &mut ctx,
            p,
            SizePolicy {
                horizontal: Policy::Expanding,
                vertical: Policy::Fixed,
                horizontal_stretch: 1,
                vertical_stretch: 0,
            },
        );
        assert_eq!(manager.value_text(p), "[Expanding, Fixed, 1, 0]");
    }
}
