//! Leaf editor factories. Each one builds a single kind of editor for the
//! properties of the internal managers registered with it.

use crate::editor::{Editor, EditorId, EditorKind, ParentWidget};
use indexmap::{IndexMap, IndexSet};
use vybe_properties::{ManagerId, PropertyId, VariantPropertyManager};

pub trait EditorFactory {
    fn kind(&self) -> EditorKind;

    fn add_property_manager(&mut self, manager: ManagerId);

    /// Forgets `manager` and releases every editor bound to its properties.
    fn remove_property_manager(&mut self, manager: ManagerId);

    fn managers(&self) -> Vec<ManagerId>;

    /// Builds an editor bound to `property`. `None` when the property's
    /// manager is not registered with this factory.
    fn create_editor(
        &mut self,
        bridge: &VariantPropertyManager,
        property: PropertyId,
        parent: Option<ParentWidget>,
    ) -> Option<Editor>;

    fn editor(&self, id: EditorId) -> Option<&Editor>;

    fn editor_mut(&mut self, id: EditorId) -> Option<&mut Editor>;

    fn editors_for(&self, property: PropertyId) -> Vec<&Editor>;

    fn release_editor(&mut self, id: EditorId) -> bool;

    /// Refreshes the snapshots of editors bound to `property`.
    fn update_editors(&mut self, bridge: &VariantPropertyManager, property: PropertyId);
}

/// Factory for one stock editor kind.
#[derive(Debug)]
pub struct StockEditorFactory {
    kind: EditorKind,
    managers: IndexSet<ManagerId>,
    editors: IndexMap<EditorId, Editor>,
}

impl StockEditorFactory {
    pub fn new(kind: EditorKind) -> Self {
        Self {
            kind,
            managers: IndexSet::new(),
            editors: IndexMap::new(),
        }
    }

    pub fn spin_box() -> Self {
        Self::new(EditorKind::SpinBox)
    }

    pub fn double_spin_box() -> Self {
        Self::new(EditorKind::DoubleSpinBox)
    }

    pub fn check_box() -> Self {
        Self::new(EditorKind::CheckBox)
    }

    pub fn line_edit() -> Self {
        Self::new(EditorKind::LineEdit)
    }

    pub fn date_edit() -> Self {
        Self::new(EditorKind::DateEdit)
    }

    pub fn time_edit() -> Self {
        Self::new(EditorKind::TimeEdit)
    }

    pub fn date_time_edit() -> Self {
        Self::new(EditorKind::DateTimeEdit)
    }

    pub fn key_sequence_edit() -> Self {
        Self::new(EditorKind::KeySequenceEdit)
    }

    pub fn char_edit() -> Self {
        Self::new(EditorKind::CharEdit)
    }

    pub fn combo_box() -> Self {
        Self::new(EditorKind::ComboBox)
    }

    pub fn cursor_edit() -> Self {
        Self::new(EditorKind::CursorEdit)
    }

    pub fn color_edit() -> Self {
        Self::new(EditorKind::ColorEdit)
    }

    pub fn font_edit() -> Self {
        Self::new(EditorKind::FontEdit)
    }

    pub fn editor_count(&self) -> usize {
        self.editors.len()
    }
}

impl EditorFactory for StockEditorFactory {
    fn kind(&self) -> EditorKind {
        self.kind
    }

    fn add_property_manager(&mut self, manager: ManagerId) {
        self.managers.insert(manager);
    }

    fn remove_property_manager(&mut self, manager: ManagerId) {
        if self.managers.shift_remove(&manager) {
            self.editors.retain(|_, e| e.manager != manager);
        }
    }

    fn managers(&self) -> Vec<ManagerId> {
        self.managers.iter().copied().collect()
    }

    fn create_editor(
        &mut self,
        bridge: &VariantPropertyManager,
        property: PropertyId,
        parent: Option<ParentWidget>,
    ) -> Option<Editor> {
        let manager = bridge.property_tree().manager_of(property)?;
        if !self.managers.contains(&manager) {
            tracing::debug!(kind = self.kind.as_str(), %property, "manager not registered with factory");
            return None;
        }
        let editor = Editor::bind(bridge, self.kind, property, manager, parent);
        self.editors.insert(editor.id, editor.clone());
        Some(editor)
    }

    fn editor(&self, id: EditorId) -> Option<&Editor> {
        self.editors.get(&id)
    }

    fn editor_mut(&mut self, id: EditorId) -> Option<&mut Editor> {
        self.editors.get_mut(&id)
    }

    fn editors_for(&self, property: PropertyId) -> Vec<&Editor> {
        self.editors.values().filter(|e| e.property == property).collect()
    }

    fn release_editor(&mut self, id: EditorId) -> bool {
        self.editors.shift_remove(&id).is_some()
    }

    fn update_editors(&mut self, bridge: &VariantPropertyManager, property: PropertyId) {
        for editor in self.editors.values_mut().filter(|e| e.property == property) {
            editor.refresh(bridge);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vybe_properties::TypeId;

    #[test]
    fn test_unregistered_manager_gets_no_editor() {
        let mut bridge = VariantPropertyManager::new();
        let width = bridge.add_property(TypeId::INT, "Width").expect("width");
        let internal = bridge.wrapped_property(width).expect("internal");
        let mut factory = StockEditorFactory::spin_box();
        assert!(factory.create_editor(&bridge, internal, None).is_none());

        let manager = bridge.property_tree().manager_of(internal).expect("manager");
        factory.add_property_manager(manager);
        let editor = factory.create_editor(&bridge, internal, None).expect("editor");
        assert_eq!(factory.editors_for(internal).len(), 1);

        factory.remove_property_manager(manager);
        assert!(factory.editor(editor.id).is_none());
    }
}
