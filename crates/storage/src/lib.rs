//! Storage Layer
//!
//! In-memory prediction monitoring log with the repository pattern. Every
//! successful prediction is recorded for model monitoring; retention is
//! bounded so the process never grows without limit.

mod repository;

pub use repository::{PredictionRecord, Repository};

use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Lock error: {0}")]
    Lock(String),
}
