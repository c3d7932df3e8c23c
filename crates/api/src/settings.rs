//! Server Settings

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Runtime configuration, merged from defaults, an optional
/// `config/los-pipeline.toml`, and `LOS_PIPELINE_*` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Socket address the server binds to
    pub bind_addr: String,
    /// Directory holding the training artifacts (schema + median tables)
    pub assets_dir: String,
    /// Path to the ONNX model export; empty string selects the heuristic
    pub model_path: String,
}

impl Settings {
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_addr", "0.0.0.0:8080")?
            .set_default("assets_dir", "assets")?
            .set_default("model_path", "assets/los_model.onnx")?
            .add_source(File::with_name("config/los-pipeline").required(false))
            .add_source(Environment::with_prefix("LOS_PIPELINE"))
            .build()?
            .try_deserialize()
    }
}
