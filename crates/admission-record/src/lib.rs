//! Admission Record Types
//!
//! Shared representation of one hospital admission case, consumed by the
//! validator, the feature encoder, and the API layer.

mod record;

pub use record::{AdmissionRecord, columns};
