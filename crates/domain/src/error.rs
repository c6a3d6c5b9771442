use thiserror::Error;

/// Structural problems in a write payload, caught before any backend call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must not be negative")]
    Negative(&'static str),

    #[error("{0} must contain at least one line")]
    NoLines(&'static str),
}
