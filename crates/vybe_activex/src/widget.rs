use crate::config::{AxWidgetConfig, DrawFlags};
use crate::control::{ForeignControl, Snapshot};
use crate::object::{DesignerObject, HOST_CLASS_NAME, PLACEHOLDER_CLASS_NAME};
use crate::painter::Painter;
use crate::registry::{ClassId, ControlRegistry};
use indexmap::{IndexMap, IndexSet};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use vybe_properties::{Color, Rect, Size, Variant};

/// Name of the property holding the loaded control's class id.
pub const CONTROL_PROPERTY: &str = "control";

const INDICATOR_SIZE: i32 = 16;

/// Designer-side host of one foreign control.
///
/// The control is never run: design-time writes are staged here and only
/// forwarded to it, so values the control would reject survive editing.
pub struct DesignerAxWidget {
    registry: Rc<ControlRegistry>,
    config: AxWidgetConfig,
    draw_flags: DrawFlags,
    size: Size,
    control: Option<Box<dyn ForeignControl>>,
    snapshot: Option<Snapshot>,
    staged: IndexMap<String, Variant>,
    changed: IndexSet<String>,
}

impl std::fmt::Debug for DesignerAxWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("DesignerAxWidget")
            .field("control", &self.control())
            .field("draw_flags", &self.draw_flags)
            .field("size", &self.size)
            .field("staged", &self.staged)
            .finish()
    }
}

impl DesignerAxWidget {
    pub fn new(registry: Rc<ControlRegistry>) -> Self {
        Self::with_config(registry, AxWidgetConfig::default())
    }

    pub fn with_config(registry: Rc<ControlRegistry>, config: AxWidgetConfig) -> Self {
        Self {
            registry,
            draw_flags: config.draw_flags,
            size: config.default_size,
            config,
            control: None,
            snapshot: None,
            staged: IndexMap::new(),
            changed: IndexSet::new(),
        }
    }

    /// Instantiates the control named by `identifier` (class id or prog-id).
    /// On failure the current state is kept and `false` returned; faults
    /// and panics of the control never escape.
    pub fn load_control(&mut self, identifier: &str) -> bool {
        let registry = Rc::clone(&self.registry);
        let result = panic::catch_unwind(AssertUnwindSafe(|| registry.instantiate(identifier)));
        match result {
            Ok(Ok(control)) => {
                self.reset_control();
                tracing::debug!(identifier, class = control.class_name(), "control loaded");
                self.control = Some(control);
                true
            }
            Ok(Err(err)) => {
                tracing::debug!(identifier, error = %err, "control load failed");
                false
            }
            Err(_) => {
                tracing::warn!(identifier, "control panicked while loading");
                false
            }
        }
    }

    /// Releases the loaded control and every staged value.
    pub fn reset_control(&mut self) {
        self.control = None;
        self.snapshot = None;
        self.staged.clear();
        self.changed.clear();
    }

    /// Empty `class_id` resets; the class already loaded is left alone.
    pub fn set_control(&mut self, class_id: &str) {
        if class_id.trim().is_empty() {
            self.reset_control();
            return;
        }
        if self.class_id().is_some() && self.registry.resolve(class_id) == self.class_id() {
            return;
        }
        self.load_control(class_id);
    }

    /// Class id of the loaded control, or an empty string.
    pub fn control(&self) -> String {
        self.class_id().map(|id| id.to_string()).unwrap_or_default()
    }

    pub fn class_id(&self) -> Option<ClassId> {
        self.control.as_ref().map(|c| c.class_id())
    }

    pub fn control_class_name(&self) -> Option<&str> {
        self.control.as_ref().map(|c| c.class_name())
    }

    pub fn loaded(&self) -> bool {
        self.control.is_some()
    }

    pub fn draw_flags(&self) -> DrawFlags {
        self.draw_flags
    }

    pub fn set_draw_flags(&mut self, flags: DrawFlags) {
        self.draw_flags = flags;
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        if size != self.size {
            self.size = size;
            self.snapshot = None;
        }
    }

    pub fn size_hint(&self) -> Size {
        self.control
            .as_ref()
            .and_then(|c| c.size_hint())
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_size)
    }

    pub fn minimum_size_hint(&self) -> Size {
        self.control
            .as_ref()
            .and_then(|c| c.minimum_size_hint())
            .filter(|s| !s.is_empty())
            .unwrap_or(self.config.default_size)
    }

    /// Draws the cached control snapshot when loaded, otherwise the frame
    /// and the centred indicator, as selected by the draw flags.
    pub fn paint(&mut self, painter: &mut dyn Painter) {
        let area = Rect::new(0, 0, self.size.width, self.size.height);
        if let Some(control) = &self.control {
            if self.draw_flags.contains(DrawFlags::CONTROL) {
                let stale = self.snapshot.as_ref().is_none_or(|s| s.size != self.size);
                if stale {
                    self.snapshot = Some(control.snapshot(self.size));
                }
                if let Some(snapshot) = &self.snapshot {
                    painter.draw_snapshot(area, snapshot);
                }
            }
            return;
        }
        if self.draw_flags.contains(DrawFlags::FRAME) {
            let frame = Rect::new(0, 0, area.width - 1, area.height - 1);
            painter.draw_frame(frame, Color::rgb(0, 0, 0));
        }
        if self.draw_flags.contains(DrawFlags::INDICATOR) && area.width > INDICATOR_SIZE && area.height > INDICATOR_SIZE {
            let at = Rect::new(
                (area.width - INDICATOR_SIZE) / 2,
                (area.height - INDICATOR_SIZE) / 2,
                INDICATOR_SIZE,
                INDICATOR_SIZE,
            );
            painter.draw_indicator(at);
        }
    }

    /// Schema spelling of a property of the loaded control.
    fn control_property_name(&self, name: &str) -> Option<String> {
        self.control
            .as_ref()?
            .property_names()
            .into_iter()
            .find(|p| p.eq_ignore_ascii_case(name))
    }
}

impl DesignerObject for DesignerAxWidget {
    fn class_name(&self) -> &str {
        if self.loaded() {
            HOST_CLASS_NAME
        } else {
            PLACEHOLDER_CLASS_NAME
        }
    }

    fn property_names(&self) -> Vec<String> {
        let mut names = vec![CONTROL_PROPERTY.to_string()];
        if let Some(control) = &self.control {
            names.extend(control.property_names());
        }
        names
    }

    fn property(&self, name: &str) -> Option<Variant> {
        if name == CONTROL_PROPERTY {
            return Some(Variant::String(self.control()));
        }
        let name = self.control_property_name(name)?;
        self.staged
            .get(&name)
            .cloned()
            .or_else(|| self.control.as_ref().and_then(|c| c.property(&name)))
    }

    fn set_property(&mut self, name: &str, value: &Variant) -> bool {
        if name == CONTROL_PROPERTY {
            let Some(class_id) = value.to_string_value() else {
                return false;
            };
            self.set_control(&class_id);
            return true;
        }
        let Some(name) = self.control_property_name(name) else {
            return false;
        };
        if let Some(control) = self.control.as_mut() {
            if let Err(err) = control.set_property(&name, value) {
                tracing::debug!(property = %name, error = %err, "control rejected design-time value");
            }
        }
        self.staged.insert(name.clone(), value.clone());
        self.changed.insert(name);
        self.snapshot = None;
        true
    }

    fn reset_property(&mut self, name: &str) -> bool {
        if name == CONTROL_PROPERTY {
            self.reset_control();
            return true;
        }
        let Some(name) = self.control_property_name(name) else {
            return false;
        };
        if let Some(control) = self.control.as_mut() {
            if let Err(err) = control.reset_property(&name) {
                tracing::debug!(property = %name, error = %err, "control failed to reset property");
            }
        }
        self.staged.shift_remove(&name);
        self.changed.shift_remove(&name);
        self.snapshot = None;
        true
    }

    fn is_property_changed(&self, name: &str) -> bool {
        if name == CONTROL_PROPERTY {
            return self.loaded();
        }
        self.control_property_name(name)
            .is_some_and(|name| self.changed.contains(&name))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
