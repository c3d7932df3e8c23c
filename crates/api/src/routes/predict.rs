//! Prediction Routes

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use crate::{AppState, Pipeline};
use admission_record::{columns, AdmissionRecord};
use feature_encoder::EncodeError;
use storage::PredictionRecord;

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

fn error_response(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

fn service_unavailable() -> Response {
    error_response(
        StatusCode::SERVICE_UNAVAILABLE,
        json!({
            "error": "Model not loaded",
            "message": "Server configuration error. Please contact administrator."
        }),
    )
}

/// Required keys absent from the payload or carrying an empty string
fn missing_fields(payload: &Value) -> Vec<&'static str> {
    columns::REQUIRED
        .iter()
        .filter(|key| match payload.get(**key) {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => s.trim().is_empty(),
            Some(_) => false,
        })
        .copied()
        .collect()
}

/// Parse and validate the admission record out of a request payload
fn parse_record(state: &AppState, payload: &Value) -> Result<AdmissionRecord, Response> {
    let missing = missing_fields(payload);
    if !missing.is_empty() {
        warn!(?missing, "request rejected, missing required fields");
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Missing required fields",
                "missing_fields": missing,
            }),
        ));
    }

    let record: AdmissionRecord = serde_json::from_value(payload.clone()).map_err(|e| {
        warn!(error = %e, "request rejected, malformed record");
        error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid request body",
                "message": e.to_string(),
            }),
        )
    })?;

    let validation = state.validator.validate(&record);
    if !validation.valid {
        let details: Vec<String> = validation.errors.iter().map(|e| e.to_string()).collect();
        warn!(?details, "request rejected by validator");
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            json!({
                "error": "Invalid attribute values",
                "details": details,
            }),
        ));
    }

    Ok(record)
}

fn encode_response(err: EncodeError) -> Response {
    match err {
        EncodeError::UnknownCategory(_) => error_response(
            StatusCode::UNPROCESSABLE_ENTITY,
            json!({
                "error": "Unknown category",
                "message": err.to_string(),
            }),
        ),
        EncodeError::SchemaMismatch { .. } => {
            // Invariant violation in the reconciliation step; a bug, not input
            error!(error = %err, "schema mismatch during encoding");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            )
        }
    }
}

/// Main prediction endpoint.
///
/// Expects the 13 admission attributes keyed by dataset column names, plus
/// optional `hospital_id`/`hospital_name` echo fields. Returns predicted
/// LOS, confidence interval, risk factors, and metadata.
pub async fn predict(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(payload): Json<Value>,
) -> Response {
    let state = state.read().await;
    let Some(Pipeline { encoder, model }) = state.pipeline.as_ref() else {
        return service_unavailable();
    };

    let record = match parse_record(&state, &payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    let vector = match encoder.encode(&record) {
        Ok(vector) => vector,
        Err(e) => return encode_response(e),
    };

    let result = match model.predict(&vector).await {
        Ok(result) => result,
        Err(e) => {
            error!(error = %e, "inference failed");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({
                    "error": "Prediction failed",
                    "message": e.to_string(),
                }),
            );
        }
    };

    let prediction = &result.prediction;
    info!(
        predicted_los = round2(prediction.predicted_los),
        latency_us = result.latency_us,
        used_heuristic = result.used_heuristic,
        county = %record.hospital_county,
        "prediction served"
    );

    let risk_factors = state.risk_engine.assess(&record);

    let now = chrono::Utc::now();
    if let Err(e) = state.repository.insert_prediction(PredictionRecord {
        id: 0,
        timestamp_ms: now.timestamp_millis(),
        hospital_county: record.hospital_county.clone(),
        age_group: record.age_group.clone(),
        mdc_description: record.mdc_description.clone(),
        severity_code: record.severity_code,
        type_of_admission: record.type_of_admission.clone(),
        predicted_los: prediction.predicted_los,
    }) {
        // Monitoring log failure must not fail the prediction
        warn!(error = %e, "failed to log prediction");
    }

    Json(json!({
        "predicted_los": round2(prediction.predicted_los),
        "confidence_interval": [
            round1(prediction.confidence_low),
            round1(prediction.confidence_high),
        ],
        "risk_factors": risk_factors,
        "metadata": {
            "model_version": state.version,
            "model_kind": model.kind(),
            "prediction_timestamp": now.to_rfc3339(),
            "hospital_id": payload.get("hospital_id"),
            "hospital_name": payload.get("hospital_name"),
            "input_features": columns::REQUIRED.len(),
            "encoded_features": vector.len(),
        }
    }))
    .into_response()
}

/// Debug endpoint: show how a record is encoded without running inference.
/// Useful for validating the preprocessing against the training schema.
pub async fn feature_info(
    State(state): State<Arc<RwLock<AppState>>>,
    Json(payload): Json<Value>,
) -> Response {
    let state = state.read().await;
    let Some(Pipeline { encoder, .. }) = state.pipeline.as_ref() else {
        return service_unavailable();
    };

    let record = match parse_record(&state, &payload) {
        Ok(record) => record,
        Err(response) => return response,
    };

    let vector = match encoder.encode(&record) {
        Ok(vector) => vector,
        Err(e) => return encode_response(e),
    };

    let nonzero = encoder.nonzero_features(&vector);
    let sample: serde_json::Map<String, Value> = nonzero
        .iter()
        .take(20)
        .map(|(name, value)| (name.clone(), json!(value)))
        .collect();

    Json(json!({
        "input_features": columns::REQUIRED.len(),
        "encoded_features": vector.len(),
        "non_zero_features": nonzero.len(),
        "sample_features": sample,
        "all_features_present": vector.len() == encoder.schema().len(),
    }))
    .into_response()
}
