//! Record Validator

use crate::error::ValidationError;
use admission_record::{columns, AdmissionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Severity of illness code valid range (0 = unknown severity in the
    /// source dataset, 4 = extreme)
    pub severity_range: (i64, i64),
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            severity_range: (0, 4),
        }
    }
}

/// Result of validating one record
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the record passed all checks
    pub valid: bool,
    /// List of validation errors
    pub errors: Vec<ValidationError>,
    /// Number of attributes checked
    pub fields_checked: usize,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid(fields_checked: usize) -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            fields_checked,
        }
    }

    /// Create an invalid result with errors
    pub fn invalid(errors: Vec<ValidationError>, fields_checked: usize) -> Self {
        Self {
            valid: false,
            errors,
            fields_checked,
        }
    }

    /// Attribute names of all failed checks
    pub fn missing_attributes(&self) -> Vec<&'static str> {
        self.errors.iter().map(|e| e.attribute()).collect()
    }
}

/// Validator for admission records
pub struct Validator {
    config: ValidationConfig,
}

impl Validator {
    /// Create a new validator with given config
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a single categorical attribute for presence
    pub fn validate_present(
        &self,
        field: &'static str,
        value: &str,
    ) -> Result<(), ValidationError> {
        if value.trim().is_empty() {
            Err(ValidationError::MissingAttribute(field))
        } else {
            Ok(())
        }
    }

    /// Validate the severity of illness code
    pub fn validate_severity(&self, code: i64) -> Result<(), ValidationError> {
        let (min, max) = self.config.severity_range;
        if code < min || code > max {
            Err(ValidationError::OutOfRange {
                field: columns::SEVERITY_CODE,
                value: code,
                min,
                max,
            })
        } else {
            Ok(())
        }
    }

    /// Validate a full record: all 13 attributes checked, every failure
    /// collected so the caller can report them together.
    pub fn validate(&self, record: &AdmissionRecord) -> ValidationResult {
        let mut errors = Vec::new();
        let mut checked = 0;

        for (field, value) in record.categorical_levels() {
            checked += 1;
            if let Err(e) = self.validate_present(field, value) {
                errors.push(e);
            }
        }

        checked += 1;
        if let Err(e) = self.validate_severity(record.severity_code) {
            errors.push(e);
        }

        if errors.is_empty() {
            ValidationResult::valid(checked)
        } else {
            debug!(
                failed = errors.len(),
                checked, "record failed validation"
            );
            ValidationResult::invalid(errors, checked)
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AdmissionRecord {
        AdmissionRecord {
            hospital_county: "Albany".into(),
            facility_name: "Albany Medical Center Hospital".into(),
            age_group: "50-69".into(),
            gender: "M".into(),
            race: "White".into(),
            ethnicity: "Not Span/Hispanic".into(),
            type_of_admission: "Emergency".into(),
            patient_disposition: "Home or Self Care".into(),
            mdc_description: "Diseases and Disorders of the Circulatory System".into(),
            severity_code: 2,
            medical_surgical: "Medical".into(),
            payment_typology: "Medicare".into(),
            ed_indicator: "Y".into(),
        }
    }

    #[test]
    fn test_valid_record() {
        let validator = Validator::default();
        let result = validator.validate(&sample_record());
        assert!(result.valid);
        assert_eq!(result.fields_checked, 13);
    }

    #[test]
    fn test_empty_attribute_rejected() {
        let validator = Validator::default();
        let mut record = sample_record();
        record.age_group = String::new();
        record.gender = "   ".into();

        let result = validator.validate(&record);
        assert!(!result.valid);
        let missing = result.missing_attributes();
        assert!(missing.contains(&columns::AGE_GROUP));
        assert!(missing.contains(&columns::GENDER));
        assert_eq!(result.errors.len(), 2);
    }

    #[test]
    fn test_severity_range() {
        let validator = Validator::default();
        assert!(validator.validate_severity(0).is_ok());
        assert!(validator.validate_severity(4).is_ok());
        assert!(validator.validate_severity(-1).is_err());
        assert!(validator.validate_severity(5).is_err());
    }

    #[test]
    fn test_severity_out_of_range_reported() {
        let validator = Validator::default();
        let mut record = sample_record();
        record.severity_code = 9;

        let result = validator.validate(&record);
        assert!(!result.valid);
        assert!(matches!(
            result.errors[0],
            ValidationError::OutOfRange { value: 9, .. }
        ));
    }
}
