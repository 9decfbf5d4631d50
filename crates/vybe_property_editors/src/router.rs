use crate::editor::{Editor, EditorId, EditorKind, ParentWidget};
use crate::error::{EditorError, EditorResult};
use crate::factories::{EditorFactory, StockEditorFactory};
use indexmap::IndexMap;
use vybe_properties::{
    PropertyId, PropertyManager, TypeId, Variant, VariantEvent, VariantPropertyId, VariantPropertyManager,
};

/// Routes editor requests for facade properties to the leaf factory
/// registered for the facade's property type.
///
/// Only leaf types have a factory. Composite facades are edited through
/// their sub-properties, whose internal managers are registered with the
/// leaf factories by [`connect_property_manager`](Self::connect_property_manager).
pub struct VariantEditorFactory {
    factories: IndexMap<TypeId, Box<dyn EditorFactory>>,
}

impl Default for VariantEditorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for VariantEditorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("VariantEditorFactory")
            .field("types", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl VariantEditorFactory {
    pub fn new() -> Self {
        let table: [(TypeId, StockEditorFactory); 13] = [
            (TypeId::INT, StockEditorFactory::spin_box()),
            (TypeId::DOUBLE, StockEditorFactory::double_spin_box()),
            (TypeId::BOOL, StockEditorFactory::check_box()),
            (TypeId::STRING, StockEditorFactory::line_edit()),
            (TypeId::DATE, StockEditorFactory::date_edit()),
            (TypeId::TIME, StockEditorFactory::time_edit()),
            (TypeId::DATE_TIME, StockEditorFactory::date_time_edit()),
            (TypeId::KEY_SEQUENCE, StockEditorFactory::key_sequence_edit()),
            (TypeId::CHAR, StockEditorFactory::char_edit()),
            (VariantPropertyManager::enum_type_id(), StockEditorFactory::combo_box()),
            (TypeId::CURSOR, StockEditorFactory::cursor_edit()),
            (TypeId::COLOR, StockEditorFactory::color_edit()),
            (TypeId::FONT, StockEditorFactory::font_edit()),
        ];
        let factories = table
            .into_iter()
            .map(|(property_type, factory)| (property_type, Box::new(factory) as Box<dyn EditorFactory>))
            .collect();
        Self { factories }
    }

    pub fn supported_types(&self) -> Vec<TypeId> {
        self.factories.keys().copied().collect()
    }

    pub fn factory(&self, property_type: TypeId) -> Option<&dyn EditorFactory> {
        self.factories.get(&property_type).map(|f| f.as_ref())
    }

    pub fn editor_kind(&self, property_type: TypeId) -> Option<EditorKind> {
        self.factory(property_type).map(|f| f.kind())
    }

    /// Registers every internal manager of `bridge`, sub-managers included,
    /// with the factory editing its kind.
    pub fn connect_property_manager(&mut self, bridge: &VariantPropertyManager) {
        for manager in bridge.managers() {
            self.walk(manager, &mut |factory: &mut dyn EditorFactory, m: &dyn PropertyManager| {
                factory.add_property_manager(m.id())
            });
        }
    }

    /// Exact inverse of [`connect_property_manager`](Self::connect_property_manager).
    pub fn disconnect_property_manager(&mut self, bridge: &VariantPropertyManager) {
        for manager in bridge.managers() {
            self.walk(manager, &mut |factory: &mut dyn EditorFactory, m: &dyn PropertyManager| {
                factory.remove_property_manager(m.id())
            });
        }
    }

    fn walk(
        &mut self,
        manager: &dyn PropertyManager,
        op: &mut dyn FnMut(&mut dyn EditorFactory, &dyn PropertyManager),
    ) {
        let kind = manager.kind();
        for factory in self.factories.values_mut() {
            if factory.kind().manager_kind() == kind {
                op(factory.as_mut(), manager);
            }
        }
        for sub in manager.sub_managers() {
            self.walk(sub, op);
        }
    }

    /// Builds an editor for `facade`, bound to its internal property. `None`
    /// when no factory handles the facade's type or its manager was never
    /// connected.
    pub fn create_editor(
        &mut self,
        bridge: &VariantPropertyManager,
        facade: VariantPropertyId,
        parent: Option<ParentWidget>,
    ) -> Option<Editor> {
        let property_type = bridge.property_type(facade);
        let Some(factory) = self.factories.get_mut(&property_type) else {
            tracing::debug!(%facade, %property_type, "no editor factory for type");
            return None;
        };
        let internal = bridge.wrapped_property(facade)?;
        factory.create_editor(bridge, internal, parent)
    }

    pub fn editor(&self, id: EditorId) -> Option<&Editor> {
        self.factories.values().find_map(|f| f.editor(id))
    }

    pub fn editors_for(&self, property: PropertyId) -> Vec<&Editor> {
        self.factories
            .values()
            .flat_map(|f| f.editors_for(property))
            .collect()
    }

    pub fn release_editor(&mut self, id: EditorId) -> bool {
        self.factories.values_mut().any(|f| f.release_editor(id))
    }

    /// Commits `value` through a tracked editor.
    pub fn commit(
        &mut self,
        bridge: &mut VariantPropertyManager,
        id: EditorId,
        value: impl Into<Variant>,
    ) -> EditorResult<()> {
        let editor = self
            .factories
            .values_mut()
            .find_map(|f| f.editor_mut(id))
            .ok_or(EditorError::Released)?;
        let property = editor.property;
        editor.commit(bridge, value)?;
        self.update_editors(bridge, property);
        Ok(())
    }

    /// Refreshes every editor bound to `property`.
    pub fn update_editors(&mut self, bridge: &VariantPropertyManager, property: PropertyId) {
        for factory in self.factories.values_mut() {
            factory.update_editors(bridge, property);
        }
    }

    /// Keeps editor snapshots current; feed it the events of the bridge the
    /// editors were created from.
    pub fn handle_event(&mut self, bridge: &VariantPropertyManager, event: &VariantEvent) {
        match event {
            VariantEvent::ValueChanged { property, .. } | VariantEvent::AttributeChanged { property, .. } => {
                if let Some(internal) = bridge.wrapped_property(*property) {
                    self.update_editors(bridge, internal);
                }
            }
            _ => {}
        }
    }
}
