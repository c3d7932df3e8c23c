//! Repository Implementation

use crate::StorageError;
use serde::{Deserialize, Serialize};
use std::sync::Mutex;
use tracing::debug;

/// One logged prediction, kept for monitoring and model improvement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionRecord {
    pub id: i64,
    pub timestamp_ms: i64,
    pub hospital_county: String,
    pub age_group: String,
    pub mdc_description: String,
    pub severity_code: i64,
    pub type_of_admission: String,
    pub predicted_los: f64,
}

/// In-memory prediction log with bounded retention
pub struct Repository {
    predictions: Mutex<Vec<PredictionRecord>>,
    max_records: usize,
    next_id: Mutex<i64>,
}

impl Repository {
    /// Create a repository with the default retention cap
    pub fn new() -> Self {
        Self::with_capacity(10_000)
    }

    /// Create a repository retaining at most `max_records` predictions
    pub fn with_capacity(max_records: usize) -> Self {
        Self {
            predictions: Mutex::new(Vec::with_capacity(max_records.min(1_000))),
            max_records,
            next_id: Mutex::new(1),
        }
    }

    /// Insert a prediction record, returning its assigned id
    pub fn insert_prediction(&self, mut record: PredictionRecord) -> Result<i64, StorageError> {
        let mut predictions = self
            .predictions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;
        let mut id = self
            .next_id
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        record.id = *id;
        *id += 1;

        // Enforce retention
        if predictions.len() >= self.max_records {
            predictions.remove(0);
        }

        let assigned = record.id;
        predictions.push(record);
        debug!(id = assigned, "prediction logged");

        Ok(assigned)
    }

    /// Most recent predictions first, optionally filtered by age group
    pub fn get_predictions(
        &self,
        age_group: Option<&str>,
        limit: usize,
    ) -> Result<Vec<PredictionRecord>, StorageError> {
        let predictions = self
            .predictions
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))?;

        Ok(predictions
            .iter()
            .rev()
            .filter(|p| age_group.map_or(true, |g| p.age_group == g))
            .take(limit)
            .cloned()
            .collect())
    }

    /// Total logged predictions
    pub fn prediction_count(&self) -> usize {
        self.predictions.lock().map(|p| p.len()).unwrap_or(0)
    }

    /// Clear all data (for testing)
    pub fn clear(&self) {
        if let Ok(mut predictions) = self.predictions.lock() {
            predictions.clear();
        }
    }
}

impl Default for Repository {
    fn default() -> Self {
        Self::new()
    }
}
