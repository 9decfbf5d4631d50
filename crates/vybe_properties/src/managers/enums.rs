use super::{attributes, ManagerKind, PropertyManager};
use crate::signal::{ManagerContext, Signal};
use crate::tree::{ManagerId, PropertyId};
use crate::values::{Icon, IconMap};
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
struct EnumData {
    value: i32,
    names: Vec<String>,
    icons: IconMap,
}

impl Default for EnumData {
    fn default() -> Self {
        Self {
            value: -1,
            names: Vec::new(),
            icons: IconMap::new(),
        }
    }
}

/// Properties choosing one entry of a name list; the value is the index, or
/// `-1` while the list is empty.
#[derive(Debug)]
pub struct EnumManager {
    id: ManagerId,
    properties: HashMap<PropertyId, EnumData>,
}

impl Default for EnumManager {
    fn default() -> Self {
        Self::new()
    }
}

impl EnumManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<i32> {
        self.properties.get(&property).map(|d| d.value)
    }

    pub fn enum_names(&self, property: PropertyId) -> Option<&[String]> {
        self.properties.get(&property).map(|d| d.names.as_slice())
    }

    pub fn enum_icons(&self, property: PropertyId) -> Option<&IconMap> {
        self.properties.get(&property).map(|d| &d.icons)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: i32) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        let count = data.names.len() as i32;
        if value >= count || (value < 0 && count > 0) {
            return;
        }
        let value = value.max(-1);
        if data.value == value {
            return;
        }
        data.value = value;
        ctx.value_changed(property, value);
    }

    /// Replacing the names selects the first entry (or `-1`).
    pub fn set_enum_names(&mut self, ctx: &mut ManagerContext, property: PropertyId, names: Vec<String>) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.names == names {
            return;
        }
        data.value = if names.is_empty() { -1 } else { 0 };
        data.names = names.clone();
        ctx.emit(Signal::EnumNamesChanged { property, names });
        ctx.value_changed(property, data.value);
    }

    pub fn set_enum_icons(&mut self, ctx: &mut ManagerContext, property: PropertyId, icons: IconMap) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.icons == icons {
            return;
        }
        data.icons = icons.clone();
        ctx.emit(Signal::EnumIconsChanged { property, icons });
    }
}

impl PropertyManager for EnumManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Enum
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        self.properties.insert(property, EnumData::default());
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
            attributes::ENUM_NAMES => Variant::StringList(data.names.clone()),
            attributes::ENUM_ICONS => Variant::IconMap(data.icons.clone()),
            _ => Variant::Invalid,
        }
    }

    fn set_attribute(&mut self, ctx: &mut ManagerContext, property: PropertyId, attribute: &str, value: &Variant) {
        match (attribute, value) {
            (attributes::ENUM_NAMES, Variant::StringList(names)) => self.set_enum_names(ctx, property, names.clone()),
            (attributes::ENUM_ICONS, Variant::IconMap(icons)) => self.set_enum_icons(ctx, property, icons.clone()),
            _ => {}
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.properties
            .get(&property)
            .and_then(|d| usize::try_from(d.value).ok().and_then(|i| d.names.get(i)))
            .cloned()
            .unwrap_or_default()
    }

    fn value_icon(&self, property: PropertyId) -> Option<Icon> {
        let data = self.properties.get(&property)?;
        data.icons.get(&data.value).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_reset_value() {
        let mut ctx = ManagerContext::new();
        let mut manager = EnumManager::new();
        let p = manager.add_property(&mut ctx, "Align");
        assert_eq!(manager.get(p), Some(-1));
        manager.set_enum_names(&mut ctx, p, vec!["Left".into(), "Center".into(), "Right".into()]);
        assert_eq!(manager.get(p), Some(0));
        manager.set(&mut ctx, p, 2);
        assert_eq!(manager.value_text(p), "Right");
        manager.set(&mut ctx, p, 3);
        manager.set(&mut ctx, p, -1);
        assert_eq!(manager.get(p), Some(2));
    }
}
