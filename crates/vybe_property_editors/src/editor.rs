use crate::error::{EditorError, EditorResult};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use vybe_properties::{attributes, ManagerId, ManagerKind, PropertyId, Variant, VariantPropertyManager};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditorId(Uuid);

impl EditorId {
    pub fn new() -> Self {
        EditorId(Uuid::new_v4())
    }
}

impl Default for EditorId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EditorId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Widget an editor is placed in, as handed out by an [`EditorHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ParentWidget(u64);

impl ParentWidget {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Hands out parent widget ids to the front end placing editors.
#[derive(Debug, Default)]
pub struct EditorHost {
    next: u64,
}

impl EditorHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_parent(&mut self) -> ParentWidget {
        self.next += 1;
        ParentWidget(self.next)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditorKind {
    SpinBox,
    DoubleSpinBox,
    CheckBox,
    LineEdit,
    DateEdit,
    TimeEdit,
    DateTimeEdit,
    KeySequenceEdit,
    CharEdit,
    ComboBox,
    CursorEdit,
    ColorEdit,
    FontEdit,
}

impl EditorKind {
    pub const ALL: [EditorKind; 13] = [
        EditorKind::SpinBox,
        EditorKind::DoubleSpinBox,
        EditorKind::CheckBox,
        EditorKind::LineEdit,
        EditorKind::DateEdit,
        EditorKind::TimeEdit,
        EditorKind::DateTimeEdit,
        EditorKind::KeySequenceEdit,
        EditorKind::CharEdit,
        EditorKind::ComboBox,
        EditorKind::CursorEdit,
        EditorKind::ColorEdit,
        EditorKind::FontEdit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EditorKind::SpinBox => "SpinBox",
            EditorKind::DoubleSpinBox => "DoubleSpinBox",
            EditorKind::CheckBox => "CheckBox",
            EditorKind::LineEdit => "LineEdit",
            EditorKind::DateEdit => "DateEdit",
            EditorKind::TimeEdit => "TimeEdit",
            EditorKind::DateTimeEdit => "DateTimeEdit",
            EditorKind::KeySequenceEdit => "KeySequenceEdit",
            EditorKind::CharEdit => "CharEdit",
            EditorKind::ComboBox => "ComboBox",
            EditorKind::CursorEdit => "CursorEdit",
            EditorKind::ColorEdit => "ColorEdit",
            EditorKind::FontEdit => "FontEdit",
        }
    }

    /// Kind of internal manager whose properties this editor binds to.
    pub fn manager_kind(&self) -> ManagerKind {
        match self {
            EditorKind::SpinBox => ManagerKind::Int,
            EditorKind::DoubleSpinBox => ManagerKind::Double,
            EditorKind::CheckBox => ManagerKind::Bool,
            EditorKind::LineEdit => ManagerKind::String,
            EditorKind::DateEdit => ManagerKind::Date,
            EditorKind::TimeEdit => ManagerKind::Time,
            EditorKind::DateTimeEdit => ManagerKind::DateTime,
            EditorKind::KeySequenceEdit => ManagerKind::KeySequence,
            EditorKind::CharEdit => ManagerKind::Char,
            EditorKind::ComboBox => ManagerKind::Enum,
            EditorKind::CursorEdit => ManagerKind::Cursor,
            EditorKind::ColorEdit => ManagerKind::Color,
            EditorKind::FontEdit => ManagerKind::Font,
        }
    }

    /// Attributes copied into an editor's constraints.
    pub fn constraint_names(&self) -> &'static [&'static str] {
        match self {
            EditorKind::SpinBox => &[attributes::MINIMUM, attributes::MAXIMUM, attributes::SINGLE_STEP],
            EditorKind::DoubleSpinBox => &[
                attributes::MINIMUM,
                attributes::MAXIMUM,
                attributes::SINGLE_STEP,
                attributes::DECIMALS,
            ],
            EditorKind::LineEdit => &[attributes::REG_EXP],
            EditorKind::DateEdit => &[attributes::MINIMUM, attributes::MAXIMUM],
            EditorKind::ComboBox => &[attributes::ENUM_NAMES, attributes::ENUM_ICONS],
            _ => &[],
        }
    }
}

/// Toolkit-neutral description of an editor widget bound to one internal
/// property. Front ends render it and write edits back through [`Editor::commit`].
#[derive(Debug, Clone, PartialEq)]
pub struct Editor {
    pub id: EditorId,
    pub kind: EditorKind,
    pub property: PropertyId,
    pub manager: ManagerId,
    pub parent: Option<ParentWidget>,
    pub value: Variant,
    pub text: String,
    pub constraints: IndexMap<&'static str, Variant>,
}

impl Editor {
    pub(crate) fn bind(
        bridge: &VariantPropertyManager,
        kind: EditorKind,
        property: PropertyId,
        manager: ManagerId,
        parent: Option<ParentWidget>,
    ) -> Self {
        let mut editor = Self {
            id: EditorId::new(),
            kind,
            property,
            manager,
            parent,
            value: Variant::Invalid,
            text: String::new(),
            constraints: IndexMap::new(),
        };
        editor.refresh(bridge);
        editor
    }

    /// Re-reads value, display text and constraints from the bound property.
    pub fn refresh(&mut self, bridge: &VariantPropertyManager) {
        self.value = bridge.internal_value(self.property);
        self.text = bridge
            .manager_for(self.property)
            .map(|m| m.value_text(self.property))
            .unwrap_or_default();
        self.constraints = self
            .kind
            .constraint_names()
            .iter()
            .map(|name| (*name, bridge.internal_attribute(self.property, name)))
            .collect();
    }

    pub fn constraint(&self, name: &str) -> Option<&Variant> {
        self.constraints.get(name)
    }

    /// Choices offered by list editors: enum names, or cursor shapes.
    pub fn choices(&self) -> Vec<String> {
        match self.kind {
            EditorKind::ComboBox => self
                .constraint(attributes::ENUM_NAMES)
                .and_then(Variant::to_string_list)
                .unwrap_or_default(),
            EditorKind::CursorEdit => vybe_properties::CursorShape::ALL
                .iter()
                .map(|c| c.as_str().to_string())
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Writes `value` to the bound internal property, the way an edit in the
    /// rendered widget does, then refreshes the snapshot.
    pub fn commit(&mut self, bridge: &mut VariantPropertyManager, value: impl Into<Variant>) -> EditorResult<()> {
        let value = value.into();
        if !bridge.property_tree().contains(self.property) {
            return Err(EditorError::PropertyRemoved(self.property));
        }
        let expected = bridge.internal_value(self.property).type_id();
        if !value.can_convert(expected) {
            return Err(EditorError::TypeMismatch {
                expected,
                found: value.type_id(),
            });
        }
        bridge.set_internal_value(self.property, &value);
        self.refresh(bridge);
        Ok(())
    }
}
