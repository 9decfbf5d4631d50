use super::{add_sub_property, EnumManager, ManagerKind, PropertyManager};
use crate::signal::ManagerContext;
use crate::tree::{ManagerId, PropertyId};
use crate::values::Locale;
use crate::variant::Variant;
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct LocaleData {
    value: Locale,
    language: PropertyId,
    territory: PropertyId,
}

/// Locales as a language enum plus a territory enum whose names follow the
/// selected language.
#[derive(Debug)]
pub struct LocaleManager {
    id: ManagerId,
    properties: HashMap<PropertyId, LocaleData>,
    enums: EnumManager,
    sub_to_parent: HashMap<PropertyId, PropertyId>,
}

impl Default for LocaleManager {
    fn default() -> Self {
        Self::new()
    }
}

impl LocaleManager {
    pub fn new() -> Self {
        Self {
            id: ManagerId::new(),
            properties: HashMap::new(),
            enums: EnumManager::new(),
            sub_to_parent: HashMap::new(),
        }
    }

    pub fn enum_manager(&self) -> &EnumManager {
        &self.enums
    }

    pub fn get(&self, property: PropertyId) -> Option<&Locale> {
        self.properties.get(&property).map(|d| &d.value)
    }

    pub fn set(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: Locale) {
        let Some(data) = self.properties.get_mut(&property) else {
            return;
        };
        if data.value == value || value.language_index() < 0 {
            return;
        }
        data.value = value.clone();
        sync_subs(ctx, &mut self.enums, data);
        ctx.value_changed(property, value);
    }
}

fn sync_subs(ctx: &mut ManagerContext, enums: &mut EnumManager, data: &LocaleData) {
    enums.set(ctx, data.language, data.value.language_index());
    enums.set_enum_names(ctx, data.territory, Locale::territory_names(&data.value.language));
    enums.set(ctx, data.territory, data.value.territory_index());
}

impl PropertyManager for LocaleManager {
    fn id(&self) -> ManagerId {
        self.id
    }

    fn kind(&self) -> ManagerKind {
        ManagerKind::Locale
    }

    fn has_property(&self, property: PropertyId) -> bool {
        self.properties.contains_key(&property)
    }

    fn add_property(&mut self, ctx: &mut ManagerContext, name: &str) -> PropertyId {
        let property = ctx.tree.create(self.id, name);
        let language = add_sub_property(ctx, &mut self.enums, property, "Language");
        self.enums.set_enum_names(ctx, language, Locale::language_names());
        let territory = add_sub_property(ctx, &mut self.enums, property, "Territory");
        let data = LocaleData {
            value: Locale::c(),
            language,
            territory,
        };
        sync_subs(ctx, &mut self.enums, &data);
        self.sub_to_parent.insert(language, property);
        self.sub_to_parent.insert(territory, property);
        self.properties.insert(property, data);
        property
    }

    fn remove_property(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(data) = self.properties.remove(&property) else {
            return;
        };
        for sub in [data.language, data.territory] {
            self.sub_to_parent.remove(&sub);
            self.enums.remove_property(ctx, sub);
        }
        ctx.destroy(property);
    }

    fn value(&self, property: PropertyId) -> Variant {
        self.get(property).cloned().map(Variant::Locale).unwrap_or_default()
    }

    fn set_value(&mut self, ctx: &mut ManagerContext, property: PropertyId, value: &Variant) {
        if let Some(locale) = value.as_locale() {
            self.set(ctx, property, locale.clone());
        }
    }

    fn value_text(&self, property: PropertyId) -> String {
        self.get(property).map(|l| l.to_string()).unwrap_or_default()
    }

    fn sub_managers(&self) -> Vec<&dyn PropertyManager> {
        vec![&self.enums]
    }

    fn sub_manager_mut(&mut self, manager: ManagerId) -> Option<&mut dyn PropertyManager> {
        (self.enums.id() == manager).then_some(&mut self.enums as &mut dyn PropertyManager)
    }

    fn sub_property_changed(&mut self, ctx: &mut ManagerContext, property: PropertyId) {
        let Some(parent) = self.sub_to_parent.get(&property).copied() else {
            return;
        };
        let Some(data) = self.properties.get(&parent).cloned() else {
            return;
        };
        let picked = self.enums.value_text(property);
        let value = if property == data.language {
            Locale::new(&picked, &data.value.territory)
        } else {
            Locale::new(&data.value.language, &picked)
        };
        if let Some(value) = value {
            self.set(ctx, parent, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::managers::dispatch_write;

    #[test]
    fn test_language_change_refreshes_territories() {
        let mut ctx = ManagerContext::new();
        let mut manager = LocaleManager::new();
        let p = manager.add_property(&mut ctx, "Locale");
        let language = ctx.tree.children(p)[0];
        let territory = ctx.tree.children(p)[1];
        let german = Locale::language_names()
            .iter()
            .position(|l| l == "German")
            .expect("german") as i32;
        let owner = ctx.tree.manager_of(language).expect("owner");
        dispatch_write(&mut manager, owner, &mut ctx, language, &mut |m, ctx| {
            m.set_value(ctx, language, &Variant::Int(german))
        });
        assert_eq!(manager.get(p), Locale::new("German", "Germany").as_ref());
        let territories = manager.enum_manager().enum_names(territory).expect("names");
        assert_eq!(territories, Locale::territory_names("German").as_slice());
    }
}
