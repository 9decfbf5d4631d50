//! Design-time hosting of foreign (ActiveX) controls.

pub mod config;
pub mod control;
pub mod error;
pub mod object;
pub mod painter;
pub mod registry;
pub mod widget;

pub use config::*;
pub use control::*;
pub use error::*;
pub use object::*;
pub use painter::*;
pub use registry::*;
pub use widget::*;
