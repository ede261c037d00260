//! Error types for ID parsing and validation.

use thiserror::Error;

/// Errors that can occur when parsing or validating IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The numeric portion of the ID is not a valid number.
    #[error("invalid numeric ID for {kind}: '{actual}'")]
    InvalidNumber { kind: &'static str, actual: String },
}

impl IdError {
    /// Returns true if this error indicates the input was empty.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdError::Empty)
    }

    /// Returns true if this error indicates a malformed number.
    pub fn is_number_error(&self) -> bool {
        matches!(self, IdError::InvalidNumber { .. })
    }
}
