//! LOS Inference Engine
//!
//! Runs the trained gradient-boosted-tree regressor (ONNX export) over an
//! encoded feature vector using tract, with a heuristic mode when no model
//! artifact is available.

mod engine;

pub use engine::{InferenceResult, LosModel, Prediction};

use thiserror::Error;

/// Errors during inference
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("Model load failed: {0}")]
    ModelLoadError(String),
    #[error("Inference failed: {0}")]
    InferenceFailed(String),
    #[error("Invalid input width: expected {expected}, got {actual}")]
    InvalidInputWidth { expected: usize, actual: usize },
}
