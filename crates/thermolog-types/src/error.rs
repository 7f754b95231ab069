//! Error types for client input validation in thermolog-types.

use thiserror::Error;

/// Errors produced when client-supplied date parameters are missing or malformed.
///
/// Validation always happens before any query is built, so a
/// `ValidationError` guarantees that the store was never touched.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// A required parameter was absent or empty.
    #[error("missing required parameter '{field}'")]
    Missing {
        /// Name of the request parameter.
        field: &'static str,
    },

    /// A parameter did not match the expected grammar or named an impossible date.
    #[error("parameter '{field}' must be a valid date in {expected} format")]
    Malformed {
        /// Name of the request parameter.
        field: &'static str,
        /// Human-readable description of the accepted format.
        expected: &'static str,
    },
}

impl ValidationError {
    /// The request parameter this error refers to.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::Missing { field } | ValidationError::Malformed { field, .. } => field,
        }
    }
}

/// Result type alias using thermolog-types' ValidationError type.
pub type ValidationResult<T> = std::result::Result<T, ValidationError>;
