use super::{add_sub_property, IntManager, ManagerKind, PropertyManager};
use crate::signal::ManagerContext;
use crate::tree::{ManagerId, PropertyId};
use crate::values::Color;
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
struct ColorData {
    value: Color,
    channels: [PropertyId; 4],
}

fn channel_values(c: Color) -> [i32; 4] {
    [c.red.into(), c.green.into(), c.blue.into(), c.alpha.into()]
}

/// Colors with one `0..=255` int sub-property per channel.
#[derive(Debug)]
pub struct ColorManager {
    id: ManagerId,
    properties: HashMap<PropertyId, ColorData>,
    ints: IntManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for ColorManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ColorManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            ints: IntManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn int_manager(&self) -> &IntManager {
        &self.ints
    }

    pub fn get(&self, property: PropertyId) -> Option<Color> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Color) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value {
            return;
        }
        data.value = value;
        for (sub, v) in data.channels.iter().zip(channel_values(value)) {
            self.ints.set(ctx, *sub, v);
        }
        ctx.value_changed(property, value);
    }
}

impl PropertyManager for ColorManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Color
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let value = Color::default();
        let mut channels = [property; 4];
        for ((slot, label), v) in channels
            .iter_mut()
            .zip(["Red", "Green", "Blue", "Alpha"])
            .zip(channel_values(value))
        {
            let sub = add_sub_property(ctx, &mut self.ints, property, label);
            self.ints.set_range(ctx, sub, 0, 255);
            self.ints.set(ctx, sub, v);
            self.sub_to_parent.insert(sub, property);
            *slot = sub;
        }
        self.properties.insert(property, ColorData { value, channels });
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        for sub in data.channels {
            self.sub_to_parent.remove(&sub);
            self.ints.remove_property(ctx, sub);
        }
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).map(Variant::Color).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Variant::Color(c) = value {
            self.set(ctx, property, *c);
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|c| format!("[{}, {}, {}] ({})", c.red, c.green, c.blue, c.alpha))
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.ints]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.ints.id() == manager).then_some(&mut self.ints as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let (Some(data), Some(v)) = (self.properties.get(&parent).copied(), self.ints.get(property)) else {
            return;
        };
        let Ok(v) = u8::try_from(v) else {
            return;
        };
        let mut value = data.value;
        match data.channels.iter().position(|c| *c == property) {
            Some(0) => value.red = v,
            Some(1) => value.green = v,
            Some(2) => value.blue = v,
            Some(3) => value.alpha = v,
            _ => return,
        }
        self.set(ctx, parent, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_channels_follow_value() {
        let mut ctx = ManagerContext::new();
        let mut manager = ColorManager::new();
        let p = manager.add_property(&mut ctx, "BackColor");
        manager.set(&mut ctx, p, Color::rgba(10, 20, 30, 40));
        let channels: Vec<i32> = ctx
            .tree
            .children(p)
            .iter()
            .filter_map(|c| manager.int_manager().get(*c))
            .collect();
        assert_eq!(channels, vec![10, 20, 30, 40]);
        assert_eq!(manager.value_text(p), "[10, 20, 30] (40)");
    }
}
