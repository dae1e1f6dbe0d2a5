use thiserror::Error;

/// Errors raised by the scene kernel.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    #[error("'{0}' is not a valid anchoring value")]
    InvalidAnchoring(String),

    #[error("expected a vector with {expected} components, found {found}")]
    Arity { expected: usize, found: usize },
}
