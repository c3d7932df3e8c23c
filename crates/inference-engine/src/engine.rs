//! Inference Engine Implementation

use crate::InferenceError;
use feature_encoder::FeatureVector;
use serde::{Deserialize, Serialize};
use tract_onnx::prelude::*;
use tracing::{debug, info, warn};

/// Multiplier for the 95% confidence interval
const CI_Z: f64 = 1.96;
/// Relative standard error assumed for the point prediction
const CI_STD_ERROR: f64 = 0.15;

/// Predicted length of stay with its confidence interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prediction {
    /// Predicted LOS in days
    pub predicted_los: f64,
    /// Lower bound of the 95% confidence interval (floored at 1 day)
    pub confidence_low: f64,
    /// Upper bound of the 95% confidence interval
    pub confidence_high: f64,
}

impl Prediction {
    /// Wrap a point prediction with the interval the model card documents:
    /// ±1.96 × 15% standard error, never below one day.
    pub fn from_point(predicted_los: f64) -> Self {
        let std_error = predicted_los * CI_STD_ERROR;
        Self {
            predicted_los,
            confidence_low: (predicted_los - CI_Z * std_error).max(1.0),
            confidence_high: predicted_los + CI_Z * std_error,
        }
    }
}

/// Result of one inference call
#[derive(Debug, Clone)]
pub struct InferenceResult {
    /// The prediction
    pub prediction: Prediction,
    /// Inference latency in microseconds
    pub latency_us: u64,
    /// Whether the heuristic path was used instead of the ONNX model
    pub used_heuristic: bool,
}

/// LOS regression model. Loads an ONNX export of the trained tree ensemble;
/// falls back to a median-based heuristic when no artifact is present so the
/// pipeline stays exercisable end to end.
pub struct LosModel {
    model_path: String,
    input_width: usize,
    plan: Option<TypedRunnableModel<TypedModel>>,
}

impl LosModel {
    /// Create an unloaded model for the given artifact path and input width
    pub fn new(model_path: &str, input_width: usize) -> Self {
        Self {
            model_path: model_path.to_string(),
            input_width,
            plan: None,
        }
    }

    /// Create a heuristic-only model for development and tests
    pub fn heuristic(input_width: usize) -> Self {
        info!("Creating heuristic LOS model");
        Self {
            model_path: String::new(),
            input_width,
            plan: None,
        }
    }

    /// Load and optimize the ONNX model
    pub fn load(&mut self) -> Result<(), InferenceError> {
        if self.model_path.is_empty() {
            debug!("heuristic model, nothing to load");
            return Ok(());
        }

        let plan = tract_onnx::onnx()
            .model_for_path(&self.model_path)
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, self.input_width)),
            )
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?
            .into_optimized()
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?
            .into_runnable()
            .map_err(|e| InferenceError::ModelLoadError(e.to_string()))?;

        info!(path = %self.model_path, width = self.input_width, "ONNX model loaded");
        self.plan = Some(plan);
        Ok(())
    }

    /// Whether the ONNX model is loaded (false = heuristic path)
    pub fn is_loaded(&self) -> bool {
        self.plan.is_some()
    }

    /// Model kind for the info endpoint
    pub fn kind(&self) -> &'static str {
        if self.is_loaded() {
            "xgboost-onnx"
        } else {
            "heuristic"
        }
    }

    /// Expected input width
    pub fn input_width(&self) -> usize {
        self.input_width
    }

    /// Predict LOS for an encoded feature vector
    pub async fn predict(&self, features: &FeatureVector) -> Result<InferenceResult, InferenceError> {
        if features.len() != self.input_width {
            return Err(InferenceError::InvalidInputWidth {
                expected: self.input_width,
                actual: features.len(),
            });
        }

        let start = std::time::Instant::now();
        let (point, used_heuristic) = match &self.plan {
            Some(plan) => (self.run_model(plan, features)?, false),
            None => (self.heuristic_predict(features), true),
        };

        let latency_us = start.elapsed().as_micros() as u64;
        debug!(point, latency_us, used_heuristic, "inference completed");

        Ok(InferenceResult {
            prediction: Prediction::from_point(point),
            latency_us,
            used_heuristic,
        })
    }

    fn run_model(
        &self,
        plan: &TypedRunnableModel<TypedModel>,
        features: &FeatureVector,
    ) -> Result<f64, InferenceError> {
        let floats: Vec<f32> = features.values.iter().map(|v| *v as f32).collect();
        let input = tract_ndarray::Array2::from_shape_vec((1, self.input_width), floats)
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let outputs = plan
            .run(tvec!(Tensor::from(input).into()))
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| InferenceError::InferenceFailed(e.to_string()))?;
        let point = view.iter().next().copied().ok_or_else(|| {
            InferenceError::InferenceFailed("model produced an empty output".to_string())
        })?;

        Ok(f64::from(point))
    }

    /// Median-based heuristic: weighted blend of the two target-encoded
    /// features already in the vector. Stands in for the tree ensemble when
    /// the artifact is absent.
    fn heuristic_predict(&self, features: &FeatureVector) -> f64 {
        if features.los_per_mdc == 0.0 && features.los_per_severity == 0.0 {
            warn!("heuristic prediction over empty lookup tables");
        }
        (0.6 * features.los_per_mdc + 0.4 * features.los_per_severity).max(1.0)
    }
}
