//! Training Artifact Loading
//!
//! The target schema and median-LOS tables are produced offline during
//! training and shipped as JSON files. Loaded once at startup, immutable
//! afterwards.

use crate::encoder::FeatureEncoder;
use crate::schema::{TargetSchema, TRAINED_FEATURE_COUNT};
use crate::tables::LookupTables;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

/// Target schema file: ordered JSON array of feature column names
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";
/// MDC median-LOS table: JSON object, MDC code -> median LOS
pub const MDC_MEDIAN_LOS_FILE: &str = "mdc_median_los.json";
/// Severity median-LOS table: JSON object, severity code -> median LOS
pub const SEVERITY_MEDIAN_LOS_FILE: &str = "severity_median_los.json";

/// Errors while loading training artifacts
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Non-numeric code {key:?} in {path}")]
    BadKey { path: PathBuf, key: String },
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// JSON object keys are strings; table codes are integers.
fn parse_table(path: &Path, raw: HashMap<String, f64>) -> Result<HashMap<i64, f64>, ArtifactError> {
    raw.into_iter()
        .map(|(key, value)| {
            key.parse::<i64>()
                .map(|code| (code, value))
                .map_err(|_| ArtifactError::BadKey {
                    path: path.to_path_buf(),
                    key,
                })
        })
        .collect()
}

/// Load the target schema and lookup tables from an artifact directory and
/// assemble the encoder.
pub fn load_artifacts(dir: &Path) -> Result<FeatureEncoder, ArtifactError> {
    let names_path = dir.join(FEATURE_NAMES_FILE);
    let columns: Vec<String> = load_json(&names_path)?;
    if columns.len() != TRAINED_FEATURE_COUNT {
        warn!(
            loaded = columns.len(),
            expected = TRAINED_FEATURE_COUNT,
            "target schema width differs from the production model"
        );
    }

    let mdc_path = dir.join(MDC_MEDIAN_LOS_FILE);
    let los_per_mdc = parse_table(&mdc_path, load_json(&mdc_path)?)?;

    let severity_path = dir.join(SEVERITY_MEDIAN_LOS_FILE);
    let los_per_severity = parse_table(&severity_path, load_json(&severity_path)?)?;

    let tables = LookupTables::new(los_per_mdc, los_per_severity);
    info!(
        columns = columns.len(),
        mdc_entries = tables.mdc_entries(),
        severity_entries = tables.severity_entries(),
        "training artifacts loaded"
    );

    Ok(FeatureEncoder::new(TargetSchema::new(columns), tables))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_artifacts(dir: &Path) {
        std::fs::write(
            dir.join(FEATURE_NAMES_FILE),
            r#"["Age Group_70+", "APR MDC Code", "LOS_per_MDC", "LOS_per_severity"]"#,
        )
        .unwrap();
        std::fs::write(dir.join(MDC_MEDIAN_LOS_FILE), r#"{"5": 4.0, "22": 9.0}"#).unwrap();
        std::fs::write(dir.join(SEVERITY_MEDIAN_LOS_FILE), r#"{"1": 2.0, "4": 7.0}"#).unwrap();
    }

    #[test]
    fn test_load_round_trip() {
        let dir = std::env::temp_dir().join("los-artifacts-ok");
        std::fs::create_dir_all(&dir).unwrap();
        write_artifacts(&dir);

        let encoder = load_artifacts(&dir).unwrap();
        assert_eq!(encoder.schema().len(), 4);
        assert_eq!(encoder.tables().mdc_median_los(22), Some(9.0));
        assert_eq!(encoder.tables().severity_median_los(4), Some(7.0));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = std::env::temp_dir().join("los-artifacts-missing");
        std::fs::create_dir_all(&dir).unwrap();
        let _ = std::fs::remove_file(dir.join(FEATURE_NAMES_FILE));

        let err = load_artifacts(&dir).unwrap_err();
        assert!(matches!(err, ArtifactError::Io { .. }));
    }

    #[test]
    fn test_non_numeric_code_rejected() {
        let dir = std::env::temp_dir().join("los-artifacts-badkey");
        std::fs::create_dir_all(&dir).unwrap();
        write_artifacts(&dir);
        std::fs::write(dir.join(MDC_MEDIAN_LOS_FILE), r#"{"not-a-code": 4.0}"#).unwrap();

        let err = load_artifacts(&dir).unwrap_err();
        assert!(matches!(err, ArtifactError::BadKey { key, .. } if key == "not-a-code"));
    }
}
