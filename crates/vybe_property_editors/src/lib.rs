pub mod editor;
pub mod error;
pub mod factories;
pub mod router;

pub use editor::*;
pub use error::*;
pub use factories::*;
pub use router::*;
