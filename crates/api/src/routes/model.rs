//! Model Info Route

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::AppState;
use admission_record::columns;

/// Return information about the loaded model and its schema
pub async fn model_info(State(state): State<Arc<RwLock<AppState>>>) -> Response {
    let state = state.read().await;

    let Some(pipeline) = state.pipeline.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "error": "Model not loaded" })),
        )
            .into_response();
    };

    let schema = pipeline.encoder.schema();
    let mut feature_columns: Vec<String> = schema.columns().iter().take(15).cloned().collect();
    if schema.len() > 15 {
        feature_columns.push("...".to_string());
    }

    Json(json!({
        "input_features": columns::REQUIRED.len(),
        "encoded_features": schema.len(),
        "model_type": pipeline.model.kind(),
        "feature_columns": feature_columns,
        "mdc_mappings": pipeline.encoder.tables().mdc_entries(),
        "severity_mappings": pipeline.encoder.tables().severity_entries(),
    }))
    .into_response()
}
