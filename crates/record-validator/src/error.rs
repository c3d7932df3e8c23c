//! Validation Error Types

use thiserror::Error;

/// Errors during admission record validation
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    /// Required attribute missing or empty
    #[error("Missing required attribute: {0}")]
    MissingAttribute(&'static str),

    /// Numeric attribute out of allowed range
    #[error("{field} value {value} is out of range [{min}, {max}]")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

impl ValidationError {
    /// Name of the attribute this error refers to
    pub fn attribute(&self) -> &'static str {
        match self {
            ValidationError::MissingAttribute(field) => field,
            ValidationError::OutOfRange { field, .. } => field,
        }
    }
}
