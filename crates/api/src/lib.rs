//! Hospital LOS Prediction API Server
//!
//! REST layer over the encode-then-infer pipeline: request parsing,
//! validation, prediction, risk factor reporting, and monitoring endpoints.

use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

mod rate_limit;
mod routes;
mod settings;

pub use rate_limit::{create_governor_config, RateLimitConfig, RateLimits};
pub use settings::Settings;

use feature_encoder::FeatureEncoder;
use inference_engine::LosModel;
use record_validator::Validator;
use risk_factors::RiskEngine;
use storage::Repository;

/// Encoder plus model, present only when the training artifacts loaded
pub struct Pipeline {
    pub encoder: FeatureEncoder,
    pub model: LosModel,
}

/// Application state shared across handlers
pub struct AppState {
    /// Encode-then-infer pipeline; `None` means degraded startup
    pub pipeline: Option<Pipeline>,
    /// Input contract validator
    pub validator: Validator,
    /// Rule-based risk factor reporter
    pub risk_engine: RiskEngine,
    /// Prediction monitoring log
    pub repository: Repository,
    /// Version string
    pub version: String,
    /// Start time
    pub start_time: std::time::Instant,
}

impl AppState {
    /// Build state from settings. Missing artifacts or model files degrade
    /// the service instead of aborting it, matching the health contract.
    pub fn new(settings: &Settings) -> Self {
        let pipeline = match feature_encoder::load_artifacts(Path::new(&settings.assets_dir)) {
            Ok(encoder) => {
                let width = encoder.schema().len();
                let mut model = if settings.model_path.is_empty() {
                    LosModel::heuristic(width)
                } else {
                    LosModel::new(&settings.model_path, width)
                };
                if let Err(e) = model.load() {
                    warn!(error = %e, "ONNX model unavailable, using heuristic predictions");
                    model = LosModel::heuristic(width);
                }
                Some(Pipeline { encoder, model })
            }
            Err(e) => {
                warn!(error = %e, "training artifacts unavailable, starting degraded");
                None
            }
        };

        Self::with_pipeline(pipeline)
    }

    /// Build state around an already-assembled pipeline (tests and tools)
    pub fn with_pipeline(pipeline: Option<Pipeline>) -> Self {
        Self {
            pipeline,
            validator: Validator::default(),
            risk_engine: RiskEngine::new(),
            repository: Repository::new(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            start_time: std::time::Instant::now(),
        }
    }
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub components: ComponentStatus,
    pub metrics: SystemMetrics,
}

/// Component status
#[derive(Debug, Serialize)]
pub struct ComponentStatus {
    pub encoder: ComponentHealth,
    pub model: ComponentHealth,
}

/// Individual component health
#[derive(Debug, Serialize)]
pub struct ComponentHealth {
    pub status: String,
}

/// System metrics
#[derive(Debug, Serialize)]
pub struct SystemMetrics {
    pub expected_features: Option<usize>,
    pub prediction_count: usize,
}

/// Create the application router without rate limiting (tests and tools)
pub fn create_router(state: Arc<RwLock<AppState>>) -> Router {
    router(state, None)
}

/// Create the application router with per-IP rate limits, scoped per route
/// group: the prediction endpoints get their own budget so monitoring
/// traffic on the read-only endpoints is never throttled with them.
pub fn create_rate_limited_router(state: Arc<RwLock<AppState>>, limits: RateLimits) -> Router {
    router(state, Some(limits))
}

fn router(state: Arc<RwLock<AppState>>, limits: Option<RateLimits>) -> Router {
    let mut predict_routes = Router::new()
        .route("/api/predict", post(routes::predict::predict))
        .route("/api/feature-info", post(routes::predict::feature_info));
    let mut read_routes = Router::new()
        .route("/api/health", get(health_handler))
        .route("/api/model-info", get(routes::model::model_info))
        .route("/api/predictions", get(routes::predictions::get_predictions));

    if let Some(limits) = limits {
        predict_routes = predict_routes.route_layer(GovernorLayer {
            config: limits.predict,
        });
        read_routes = read_routes.route_layer(GovernorLayer {
            config: limits.read,
        });
    }

    Router::new()
        .merge(predict_routes)
        .merge(read_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check handler
async fn health_handler(State(state): State<Arc<RwLock<AppState>>>) -> impl IntoResponse {
    let state = state.read().await;

    let (status, encoder_status, model_status, expected) = match &state.pipeline {
        Some(pipeline) => (
            "healthy",
            "ok",
            pipeline.model.kind(),
            Some(pipeline.encoder.schema().len()),
        ),
        None => ("degraded", "unavailable", "unavailable", None),
    };

    let response = HealthResponse {
        status: status.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: state.version.clone(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        components: ComponentStatus {
            encoder: ComponentHealth {
                status: encoder_status.to_string(),
            },
            model: ComponentHealth {
                status: model_status.to_string(),
            },
        },
        metrics: SystemMetrics {
            expected_features: expected,
            prediction_count: state.repository.prediction_count(),
        },
    };

    Json(response)
}

/// Initialize logging
pub fn init_logging() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");
}

/// Run the server until shutdown
pub async fn run_server(settings: &Settings) -> anyhow::Result<()> {
    let state = Arc::new(RwLock::new(AppState::new(settings)));
    let app = create_rate_limited_router(state, RateLimits::standard());

    info!("Starting API server on {}", settings.bind_addr);

    let listener = tokio::net::TcpListener::bind(&settings.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
