//! Admission Record Validation
//!
//! Enforces the caller-side contract: all required attributes present and
//! non-empty, severity code inside its documented range. Records that fail
//! here never reach the feature encoder.

mod error;
mod validator;

pub use error::ValidationError;
pub use validator::{ValidationConfig, ValidationResult, Validator};
