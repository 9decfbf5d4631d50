use super::{add_sub_property, BoolManager, EnumManager, IntManager, ManagerKind, PropertyManager};
use crate::signal::ManagerContext;
use crate::tree::{ManagerId, PropertyId};
use crate::values::{Font, FONT_FAMILIES};
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct FontData {
    value: Font,
    family: PropertyId,
    point_size: PropertyId,
    bold: PropertyId,
    italic: PropertyId,
    underline: PropertyId,
    strike_out: PropertyId,
    kerning: PropertyId,
}

impl FontData {
    fn flags(&self) -> [(PropertyId, bool); 5] {
        [
            (self.bold, self.value.bold),
            (self.italic, self.value.italic),
            (self.underline, self.value.underline),
            (self.strike_out, self.value.strike_out),
            (self.kerning, self.value.kerning),
        ]
    }
}

fn family_index(family: &str) -> Option<i32> {
    FONT_FAMILIES.iter().position(|f| *f == family).map(|i| i as i32)
}

#[derive(Debug)]
pub struct FontManager {
    id: ManagerId,
    properties: HashMap<PropertyId, FontData>,
    enums: EnumManager,
    ints: IntManager,
    bools: BoolManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for FontManager {
    fn default() -> Self {
        Self::new()
    }
}

impl FontManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            enums: EnumManager::new(),
            ints: IntManager::new(),
            bools: BoolManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn get(&self, property: PropertyId) -> Option<&Font> {
        self.properties.get(&property).map(|d| &d.value)
    }

    /// Families outside the known list are kept but leave the family
    /// sub-property on its previous entry.
    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Font) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value || value.point_size < 1 {
            return;
        }
        data.value = value.clone();
        if let Some(index) = family_index(&value.family) {
            self.enums.set(ctx, data.family, index);
        }
        self.ints.set(ctx, data.point_size, value.point_size);
        for (sub, flag) in data.flags() {
            self.bools.set(ctx, sub, flag);
        }
        ctx.value_changed(property, value);
    }
}

impl PropertyManager for FontManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Font
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let value = Font::default();

        let family = add_sub_property(ctx, &mut self.enums, property, "Family");
        let families = FONT_FAMILIES.iter().map(|f| f.to_string()).collect();
        self.enums.set_enum_names(ctx, family, families);
        self.enums.set(ctx, family, family_index(&value.family).unwrap_or(0));

        let point_size = add_sub_property(ctx, &mut self.ints, property, "Point Size");
        self.ints.set_range(ctx, point_size, 1, i32::MAX);
        self.ints.set(ctx, point_size, value.point_size);

        let bold = add_sub_property(ctx, &mut self.bools, property, "Bold");
        let italic = add_sub_property(ctx, &mut self.bools, property, "Italic");
        let underline = add_sub_property(ctx, &mut self.bools, property, "Underline");
        let strike_out = add_sub_property(ctx, &mut self.bools, property, "Strikeout");
        let kerning = add_sub_property(ctx, &mut self.bools, property, "Kerning");

        let data = FontData {
            value,
            family,
            point_size,
            bold,
            italic,
            underline,
            strike_out,
            kerning,
        };
        for (sub, flag) in data.flags() {
            self.bools.set(ctx, sub, flag);
        }
        for sub in [family, point_size, bold, italic, underline, strike_out, kerning] {
            self.sub_to_parent.insert(sub, property);
        }
        self.properties.insert(property, data);
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        self.sub_to_parent.retain(|_, parent| *parent != property);
        self.enums.remove_property(ctx, data.family);
        self.ints.remove_property(ctx, data.point_size);
        for (sub, _) in data.flags() {
            self.bools.remove_property(ctx, sub);
        }
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).cloned().map(Variant::Font).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Some(font) = value.as_font() {
            self.set(ctx, property, font.clone());
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property)
            .map(|f| format!("[{}, {}]", f.family, f.point_size))
            .unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.enums, &self.ints, &self.bools]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        if self.enums.id() == manager {
            Some(&mut self.enums)
        } else if self.ints.id() == manager {
            Some(&mut self.ints)
        } else if self.bools.id() == manager {
            Some(&mut self.bools)
        } else {
            None
        }
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let Some(data) = self.properties.get(&parent).cloned() else {
            return;
        };
        let mut value = data.value.clone();
        if property == data.family {
            let family = self.enums.value_text(property);
            if family.is_empty() {
                return;
            }
            value.family = family;
        } else if property == data.point_size {
            let Some(size) = self.ints.get(property) else {
                return;
            };
            value.point_size = size;
        } else {
            let Some(checked) = self.bools.get(property).copied() else {
                return;
            };
            match property {
                p if p == data.bold => value.bold = checked,
                p if p == data.italic => value.italic = checked,
                p if p == data.underline => value.underline = checked,
                p if p == data.strike_out => value.strike_out = checked,
                _ => value.kerning = checked,
            }
        }
        self.set(ctx, parent, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_children_and_text() {
        let mut ctx = ManagerContext::new();
        let mut manager = FontManager::new();
        let p = manager.add_property(&mut ctx, "Font");
        let names: Vec<&str> = ctx.tree.children(p).iter().map(|c| ctx.tree.name(*c)).collect();
        assert_eq!(
            names,
            vec!["Family", "Point Size", "Bold", "Italic", "Underline", "Strikeout", "Kerning"]
        );
        let font = Font {
            family: "Tahoma".into(),
            point_size: 12,
            bold: true,
            ..Font::default()
        };
        manager.set(&mut ctx, p, font);
        assert_eq!(manager.value_text(p), "[Tahoma, 12]");
        let bold = ctx.tree.children(p)[2];
        assert_eq!(manager.bools.get(bold), Some(&true));
    }
}
