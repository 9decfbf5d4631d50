use std::io;

/// Faults raised by foreign controls and their registry lookups.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("Unknown control class: {0}")]
    UnknownClass(String),
    #[error("Control {0} failed to initialize: {1}")]
    Faulted(String, String),
    #[error("Control has no property {0}")]
    PropertyNotFound(String),
    #[error("Property {0} is read-only")]
    ReadOnly(String),
    #[error("Value {value} is out of range for property {property}")]
    OutOfRange { property: String, value: String },
    #[error("Value of type {found} does not fit property {property}")]
    TypeMismatch { property: String, found: String },
}

pub type ControlResult<T> = Result<T, ControlError>;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid class id: {0}")]
    InvalidClassId(String),
    #[error("Class {0} is already registered")]
    DuplicateClass(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;
