use crate::widget::DesignerAxWidget;
use std::any::Any;
use vybe_properties::Variant;

/// Class name reported by a [`DesignerAxWidget`] with no control loaded.
pub const PLACEHOLDER_CLASS_NAME: &str = "DesignerAxWidget";
/// Class name reported once a control is loaded.
pub const HOST_CLASS_NAME: &str = "AxWidget";

/// Introspection surface the designer's property editor works against.
pub trait DesignerObject: Any {
    fn class_name(&self) -> &str;

    fn property_names(&self) -> Vec<String>;

    fn property(&self, name: &str) -> Option<Variant>;

    /// `false` when the object has no property `name`.
    fn set_property(&mut self, name: &str, value: &Variant) -> bool;

    fn reset_property(&mut self, name: &str) -> bool;

    fn is_property_changed(&self, name: &str) -> bool;

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}

fn answers_as_ax_widget(object: &dyn DesignerObject) -> bool {
    matches!(object.class_name(), PLACEHOLDER_CLASS_NAME | HOST_CLASS_NAME)
}

/// Recognises a [`DesignerAxWidget`] whether it currently answers with the
/// placeholder schema or as a loaded control.
pub fn ax_widget_cast(object: &dyn DesignerObject) -> Option<&DesignerAxWidget> {
    if !answers_as_ax_widget(object) {
        return None;
    }
    object.as_any().downcast_ref()
}

pub fn ax_widget_cast_mut(object: &mut dyn DesignerObject) -> Option<&mut DesignerAxWidget> {
    if !answers_as_ax_widget(object) {
        return None;
    }
    object.as_any_mut().downcast_mut()
}
