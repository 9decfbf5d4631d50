use crate::control::{ForeignControl, SchemaControl};
use crate::error::{ControlError, ControlResult, RegistryError, RegistryResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use uuid::Uuid;
use vybe_properties::{Size, Variant};

/// COM class id. Parsed with or without surrounding braces, displayed as
/// `{XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(Uuid);

impl ClassId {
    pub fn parse(text: &str) -> Option<ClassId> {
        let text = text.trim();
        let inner = text
            .strip_prefix('{')
            .and_then(|t| t.strip_suffix('}'))
            .unwrap_or(text);
        Uuid::parse_str(inner).ok().map(ClassId)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{{}}}", self.0.to_string().to_uppercase())
    }
}

/// One property of a data-described control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySchema {
    pub name: String,
    pub default: Variant,
    #[serde(default)]
    pub minimum: Option<f64>,
    #[serde(default)]
    pub maximum: Option<f64>,
    #[serde(default)]
    pub read_only: bool,
}

/// A control class as listed in a registry file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControlDescription {
    pub class_id: String,
    #[serde(default)]
    pub prog_id: Option<String>,
    pub class_name: String,
    #[serde(default)]
    pub size_hint: Option<Size>,
    #[serde(default)]
    pub minimum_size_hint: Option<Size>,
    #[serde(default)]
    pub properties: Vec<PropertySchema>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    controls: Vec<ControlDescription>,
}

pub type ControlFactory = Box<dyn Fn(ClassId) -> ControlResult<Box<dyn ForeignControl>>>;

struct RegisteredClass {
    class_name: String,
    prog_id: Option<String>,
    factory: ControlFactory,
}

/// Foreign control classes available to the designer, by class id and
/// prog-id.
#[derive(Default)]
pub struct ControlRegistry {
    classes: IndexMap<ClassId, RegisteredClass>,
    prog_ids: HashMap<String, ClassId>,
}

impl fmt::Debug for ControlRegistry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map()
            .entries(self.classes.iter().map(|(id, c)| (id.to_string(), &c.class_name)))
            .finish()
    }
}

const COMMON_CONTROLS: &str = include_str!("../controls/common_controls.json");

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the bundled common controls.
    pub fn with_common_controls() -> RegistryResult<Self> {
        Self::from_json(COMMON_CONTROLS)
    }

    pub fn from_json(json: &str) -> RegistryResult<Self> {
        let file: RegistryFile = serde_json::from_str(json)?;
        let mut registry = Self::new();
        for description in file.controls {
            registry.register_description(description)?;
        }
        Ok(registry)
    }

    pub fn load_from_file(path: impl AsRef<Path>) -> RegistryResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Registers a data-described control, instantiated as a [`SchemaControl`].
    pub fn register_description(&mut self, description: ControlDescription) -> RegistryResult<ClassId> {
        let class_id = ClassId::parse(&description.class_id)
            .ok_or_else(|| RegistryError::InvalidClassId(description.class_id.clone()))?;
        let class_name = description.class_name.clone();
        let prog_id = description.prog_id.clone();
        self.register(
            class_id,
            &class_name,
            prog_id.as_deref(),
            Box::new(move |id| Ok(Box::new(SchemaControl::new(id, description.clone())) as Box<dyn ForeignControl>)),
        )?;
        Ok(class_id)
    }

    pub fn register(
        &mut self,
        class_id: ClassId,
        class_name: &str,
        prog_id: Option<&str>,
        factory: ControlFactory,
    ) -> RegistryResult<()> {
        if self.classes.contains_key(&class_id) {
            return Err(RegistryError::DuplicateClass(class_id.to_string()));
        }
        if let Some(prog_id) = prog_id {
            let key = prog_id.to_lowercase();
            if self.prog_ids.contains_key(&key) {
                return Err(RegistryError::DuplicateClass(prog_id.to_string()));
            }
            self.prog_ids.insert(key, class_id);
        }
        self.classes.insert(
            class_id,
            RegisteredClass {
                class_name: class_name.to_string(),
                prog_id: prog_id.map(str::to_string),
                factory,
            },
        );
        tracing::trace!(%class_id, class_name, "control class registered");
        Ok(())
    }

    /// Resolves a class id (braces optional) or a prog-id (case-insensitive).
    pub fn resolve(&self, identifier: &str) -> Option<ClassId> {
        if let Some(class_id) = ClassId::parse(identifier) {
            return self.classes.contains_key(&class_id).then_some(class_id);
        }
        self.prog_ids.get(&identifier.trim().to_lowercase()).copied()
    }

    pub fn instantiate(&self, identifier: &str) -> ControlResult<Box<dyn ForeignControl>> {
        let class_id = self
            .resolve(identifier)
            .ok_or_else(|| ControlError::UnknownClass(identifier.to_string()))?;
        let class = self
            .classes
            .get(&class_id)
            .ok_or_else(|| ControlError::UnknownClass(identifier.to_string()))?;
        (class.factory)(class_id)
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.resolve(identifier).is_some()
    }

    pub fn class_ids(&self) -> Vec<ClassId> {
        self.classes.keys().copied().collect()
    }

    pub fn class_name(&self, class_id: ClassId) -> Option<&str> {
        self.classes.get(&class_id).map(|c| c.class_name.as_str())
    }

    pub fn prog_id(&self, class_id: ClassId) -> Option<&str> {
        self.classes.get(&class_id).and_then(|c| c.prog_id.as_deref())
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_id_braces_optional() {
        let braced = ClassId::parse("{8856f961-340a-11d0-a96b-00c04fd705a2}").expect("braced");
        let bare = ClassId::parse("8856F961-340A-11D0-A96B-00C04FD705A2").expect("bare");
        assert_eq!(braced, bare);
        assert_eq!(braced.to_string(), "{8856F961-340A-11D0-A96B-00C04FD705A2}");
        assert!(ClassId::parse("bogus-clsid").is_none());
    }

    #[test]
    fn test_common_controls_load() {
        let registry = ControlRegistry::with_common_controls().expect("registry");
        assert!(!registry.is_empty());
        assert!(registry.contains("Shell.Explorer.2"));
        assert!(registry.contains("shell.explorer.2"));
    }

    #[test]
    fn test_duplicate_class_rejected() {
        let json = r#"{ "controls": [
            { "class_id": "{8856F961-340A-11D0-A96B-00C04FD705A2}", "class_name": "A" },
            { "class_id": "8856F961-340A-11D0-A96B-00C04FD705A2", "class_name": "B" }
        ] }"#;
        let err = ControlRegistry::from_json(json).expect_err("duplicate");
        assert!(matches!(err, RegistryError::DuplicateClass(_)));
    }
}
