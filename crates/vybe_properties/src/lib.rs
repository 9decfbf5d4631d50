//! Property model of the form designer: concretely typed internal property
//! managers and the variant bridge that exposes them as boxed-value facades.

pub mod managers;
pub mod signal;
pub mod tree;
pub mod types;
pub mod values;
pub mod variant;
pub mod variant_manager;
pub mod wrapped;

pub use managers::{attributes, PropertyManager, ManagerKind};
pub use signal::*;
pub use tree::*;
pub use types::*;
pub use values::*;
pub use variant::*;
pub use variant_manager::*;
pub use wrapped::*;
