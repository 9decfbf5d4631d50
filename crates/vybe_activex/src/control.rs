use crate::error::{ControlError, ControlResult};
use crate::registry::{ClassId, ControlDescription, PropertySchema};
use indexmap::IndexMap;
use vybe_properties::{Size, Variant};

/// Rendered face of a control, captured for painting while the control is
/// kept out of any event loop.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub size: Size,
    pub class_name: String,
    /// `(name, display text)` of every property, in schema order.
    pub lines: Vec<(String, String)>,
}

/// A foreign reflective control hosted by the designer.
///
/// Implementations validate writes the way the live control would and report
/// violations as [`ControlError`]s.
pub trait ForeignControl {
    fn class_id(&self) -> ClassId;

    fn class_name(&self) -> &str;

    fn property_names(&self) -> Vec<String>;

    fn property(&self, name: &str) -> Option<Variant>;

    fn set_property(&mut self, name: &str, value: &Variant) -> ControlResult<()>;

    /// Restores the control's default for `name`.
    fn reset_property(&mut self, name: &str) -> ControlResult<()>;

    fn size_hint(&self) -> Option<Size>;

    fn minimum_size_hint(&self) -> Option<Size> {
        None
    }

    fn snapshot(&self, size: Size) -> Snapshot;
}

/// Control driven entirely by its registry description.
#[derive(Debug, Clone)]
pub struct SchemaControl {
    class_id: ClassId,
    description: ControlDescription,
    values: IndexMap<String, Variant>,
}

impl SchemaControl {
    pub fn new(class_id: ClassId, description: ControlDescription) -> Self {
        let values = description
            .properties
            .iter()
            .map(|p| (p.name.clone(), p.default.clone()))
            .collect();
        Self {
            class_id,
            description,
            values,
        }
    }

    fn schema(&self, name: &str) -> ControlResult<&PropertySchema> {
        self.description
            .properties
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| ControlError::PropertyNotFound(name.to_string()))
    }
}

fn check_range(schema: &PropertySchema, value: &Variant) -> ControlResult<()> {
    let Some(number) = value.to_double() else {
        return Ok(());
    };
    let below = schema.minimum.is_some_and(|min| number < min);
    let above = schema.maximum.is_some_and(|max| number > max);
    if below || above {
        return Err(ControlError::OutOfRange {
            property: schema.name.clone(),
            value: value.to_string(),
        });
    }
    Ok(())
}

impl ForeignControl for SchemaControl {
    fn class_id(&self) -> ClassId {
        self.class_id
    }

    fn class_name(&self) -> &str {
        &self.description.class_name
    }

    fn property_names(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }

    fn property(&self, name: &str) -> Option<Variant> {
        let schema = self.schema(name).ok()?;
        self.values.get(&schema.name).cloned()
    }

    fn set_property(&mut self, name: &str, value: &Variant) -> ControlResult<()> {
        let schema = self.schema(name)?;
        if schema.read_only {
            return Err(ControlError::ReadOnly(schema.name.clone()));
        }
        let converted = value
            .convert(schema.default.type_id())
            .ok_or_else(|| ControlError::TypeMismatch {
                property: schema.name.clone(),
                found: value.type_id().to_string(),
            })?;
        check_range(schema, &converted)?;
        let key = schema.name.clone();
        self.values.insert(key, converted);
        Ok(())
    }

    fn reset_property(&mut self, name: &str) -> ControlResult<()> {
        let schema = self.schema(name)?;
        let (key, default) = (schema.name.clone(), schema.default.clone());
        self.values.insert(key, default);
        Ok(())
    }

    fn size_hint(&self) -> Option<Size> {
        self.description.size_hint
    }

    fn minimum_size_hint(&self) -> Option<Size> {
        self.description.minimum_size_hint
    }

    fn snapshot(&self, size: Size) -> Snapshot {
        Snapshot {
            size,
            class_name: self.description.class_name.clone(),
            lines: self
                .values
                .iter()
                .map(|(name, value)| (name.clone(), value.to_string()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_bar() -> SchemaControl {
        let description = ControlDescription {
            class_id: "{35053A22-8589-11D1-B16A-00C0F0283628}".into(),
            prog_id: None,
            class_name: "ProgressBar".into(),
            size_hint: None,
            minimum_size_hint: None,
            properties: vec![PropertySchema {
                name: "Value".into(),
                default: Variant::Int(0),
                minimum: Some(0.0),
                maximum: Some(100.0),
                read_only: false,
            }],
        };
        let class_id = ClassId::parse(&description.class_id).expect("class id");
        SchemaControl::new(class_id, description)
    }

    #[test]
    fn test_control_validates_range() {
        let mut control = progress_bar();
        control.set_property("value", &Variant::Int(40)).expect("in range");
        assert_eq!(control.property("Value"), Some(Variant::Int(40)));
        let err = control.set_property("Value", &Variant::Int(400)).expect_err("out of range");
        assert!(matches!(err, ControlError::OutOfRange { .. }));
        assert_eq!(control.property("Value"), Some(Variant::Int(40)));
        control.reset_property("Value").expect("reset");
        assert_eq!(control.property("Value"), Some(Variant::Int(0)));
    }
}
