//! Schema-Aligned Feature Encoder
//!
//! Deterministically transforms a 13-attribute admission record into the
//! fixed-order numeric vector the trained LOS regressor expects, regardless
//! of which categorical levels appear in a given request.

mod artifacts;
mod encoder;
mod schema;
mod tables;

pub use artifacts::{load_artifacts, ArtifactError};
pub use encoder::{FeatureEncoder, FeatureVector, EXCLUDED_COLUMNS};
pub use schema::{TargetSchema, TRAINED_FEATURE_COUNT};
pub use tables::{mdc_code_for, LookupTables};

use thiserror::Error;

/// Errors during feature encoding
#[derive(Debug, Clone, Error)]
pub enum EncodeError {
    /// Description has no entry in the description-to-code table. There is
    /// no defensible default code, so this surfaces instead of guessing.
    #[error("Unknown MDC description: {0:?}")]
    UnknownCategory(String),

    /// Output width diverged from the target schema. Indicates a bug in the
    /// reconciliation step, never client input.
    #[error("Encoded width {actual} does not match target schema width {expected}")]
    SchemaMismatch { expected: usize, actual: usize },
}
