use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use vybe_properties::Size;

bitflags! {
    /// What [`crate::DesignerAxWidget::paint`] draws.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct DrawFlags: u32 {
        /// Centred icon telling whether a control is loaded.
        const INDICATOR = 0x1;
        const FRAME = 0x2;
        /// Snapshot of the loaded control.
        const CONTROL = 0x4;
    }
}

impl Default for DrawFlags {
    fn default() -> Self {
        DrawFlags::all()
    }
}

/// Initial state of a [`crate::DesignerAxWidget`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AxWidgetConfig {
    pub draw_flags: DrawFlags,
    /// Size hint used while no control is loaded, or when the control has none.
    pub default_size: Size,
}

impl Default for AxWidgetConfig {
    fn default() -> Self {
        Self {
            draw_flags: DrawFlags::default(),
            default_size: Size::new(80, 70),
        }
    }
}

impl AxWidgetConfig {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = AxWidgetConfig::from_json(r#"{ "draw_flags": "FRAME | CONTROL" }"#).expect("config");
        assert_eq!(config.draw_flags, DrawFlags::FRAME | DrawFlags::CONTROL);
        assert_eq!(config.default_size, Size::new(80, 70));
    }
}
