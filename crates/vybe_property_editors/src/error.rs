use vybe_properties::{PropertyId, TypeId};

#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("Property {0} no longer exists")]
    PropertyRemoved(PropertyId),
    #[error("Cannot write a {found} value to a {expected} property")]
    TypeMismatch { expected: TypeId, found: TypeId },
    #[error("Editor was released")]
    Released,
}

pub type EditorResult<T> = Result<T, EditorError>;
