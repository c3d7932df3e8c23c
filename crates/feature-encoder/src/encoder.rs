//! Feature Vector Assembly

use crate::schema::TargetSchema;
use crate::tables::{mdc_code_for, LookupTables};
use crate::EncodeError;
use admission_record::{columns, AdmissionRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Columns dropped before one-hot expansion. The MDC description is only an
/// intermediate key for code resolution; the model never sees it directly.
pub const EXCLUDED_COLUMNS: &[&str] = &[columns::MDC_DESCRIPTION];

/// Encoded feature vector for one admission, index-aligned to the target
/// schema. Produced fresh per request and discarded after inference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Feature values in target schema order
    pub values: Vec<f64>,

    // Named derived features for easy access
    /// Resolved MDC code
    pub mdc_code: i64,
    /// Median LOS joined on the MDC code
    pub los_per_mdc: f64,
    /// Median LOS joined on the severity code
    pub los_per_severity: f64,
}

impl FeatureVector {
    /// Number of encoded columns
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Encoder that maps admission records onto the training schema. Pure given
/// its schema and tables; safe to share across requests.
#[derive(Debug)]
pub struct FeatureEncoder {
    schema: TargetSchema,
    tables: LookupTables,
}

impl FeatureEncoder {
    /// Create an encoder over a target schema and its lookup tables
    pub fn new(schema: TargetSchema, tables: LookupTables) -> Self {
        Self { schema, tables }
    }

    /// The target schema this encoder aligns to
    pub fn schema(&self) -> &TargetSchema {
        &self.schema
    }

    /// The lookup tables backing the derived features
    pub fn tables(&self) -> &LookupTables {
        &self.tables
    }

    /// Encode a record into a schema-aligned vector.
    ///
    /// Indicator columns follow the `{column}_{level}` naming the schema was
    /// built with. Levels unseen at training time simply have no schema
    /// column and contribute nothing; schema columns the record does not
    /// express stay 0. Output length always equals the schema length.
    pub fn encode(&self, record: &AdmissionRecord) -> Result<FeatureVector, EncodeError> {
        let mdc_code = mdc_code_for(&record.mdc_description)
            .ok_or_else(|| EncodeError::UnknownCategory(record.mdc_description.clone()))?;

        let los_per_mdc = match self.tables.mdc_median_los(mdc_code) {
            Some(v) => v,
            None => {
                debug!(mdc_code, "MDC code unseen at training time, using table median");
                self.tables.mdc_fallback()
            }
        };
        let los_per_severity = match self.tables.severity_median_los(record.severity_code) {
            Some(v) => v,
            None => {
                debug!(
                    severity_code = record.severity_code,
                    "severity code unseen at training time, using table median"
                );
                self.tables.severity_fallback()
            }
        };

        let mut values = vec![0.0; self.schema.len()];

        // Numeric passthroughs and derived features
        self.set(&mut values, columns::MDC_CODE, mdc_code as f64);
        self.set(&mut values, columns::SEVERITY_CODE, record.severity_code as f64);
        self.set(&mut values, columns::LOS_PER_MDC, los_per_mdc);
        self.set(&mut values, columns::LOS_PER_SEVERITY, los_per_severity);

        // One-hot expansion of the categorical attributes, reconciled
        // against the schema: names without a schema column are dropped.
        for (column, level) in record.categorical_levels() {
            if EXCLUDED_COLUMNS.contains(&column) {
                continue;
            }
            let indicator = format!("{column}_{level}");
            match self.schema.column_index(&indicator) {
                Some(i) => values[i] = 1.0,
                None => debug!(%indicator, "level unseen at training time, dropped"),
            }
        }

        // Fixed-width postcondition. Cannot fail with the write-in-place
        // reconciliation above; kept as the invariant check the contract
        // requires.
        if values.len() != self.schema.len() {
            return Err(EncodeError::SchemaMismatch {
                expected: self.schema.len(),
                actual: values.len(),
            });
        }

        Ok(FeatureVector {
            values,
            mdc_code,
            los_per_mdc,
            los_per_severity,
        })
    }

    /// Non-zero features of an encoded vector as (column, value) pairs in
    /// schema order. Debug aid for validating the preprocessing.
    pub fn nonzero_features(&self, vector: &FeatureVector) -> Vec<(String, f64)> {
        self.schema
            .columns()
            .iter()
            .zip(vector.values.iter())
            .filter(|(_, v)| **v != 0.0)
            .map(|(name, v)| (name.clone(), *v))
            .collect()
    }

    fn set(&self, values: &mut [f64], column: &str, value: f64) {
        if let Some(i) = self.schema.column_index(column) {
            values[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashMap;

    fn fixture_schema() -> TargetSchema {
        TargetSchema::new(
            [
                "Hospital County_Albany",
                "Hospital County_Bronx",
                "Facility Name_Albany Medical Center Hospital",
                "Age Group_0-17",
                "Age Group_50-69",
                "Age Group_70+",
                "Gender_F",
                "Gender_M",
                "Race_White",
                "Ethnicity_Not Span/Hispanic",
                "Type of Admission_Emergency",
                "Type of Admission_Elective",
                "Patient Disposition_Home or Self Care",
                "APR Medical Surgical Description_Medical",
                "APR Medical Surgical Description_Surgical",
                "Payment Typology 1_Medicare",
                "Emergency Department Indicator_Y",
                "Emergency Department Indicator_N",
                "APR MDC Code",
                "APR Severity of Illness Code",
                "LOS_per_MDC",
                "LOS_per_severity",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    fn fixture_tables() -> LookupTables {
        LookupTables::new(
            HashMap::from([(5, 4.0), (22, 9.0), (25, 12.0)]),
            HashMap::from([(1, 2.0), (2, 3.0), (3, 5.0), (4, 7.0)]),
        )
    }

    fn encoder() -> FeatureEncoder {
        FeatureEncoder::new(fixture_schema(), fixture_tables())
    }

    fn burns_record() -> AdmissionRecord {
        AdmissionRecord {
            hospital_county: "Albany".into(),
            facility_name: "Albany Medical Center Hospital".into(),
            age_group: "70+".into(),
            gender: "F".into(),
            race: "White".into(),
            ethnicity: "Not Span/Hispanic".into(),
            type_of_admission: "Emergency".into(),
            patient_disposition: "Home or Self Care".into(),
            mdc_description: "Burns".into(),
            severity_code: 4,
            medical_surgical: "Medical".into(),
            payment_typology: "Medicare".into(),
            ed_indicator: "Y".into(),
        }
    }

    #[test]
    fn test_derived_features_and_indicators() {
        let enc = encoder();
        let vector = enc.encode(&burns_record()).unwrap();

        assert_eq!(vector.len(), enc.schema().len());
        assert_eq!(vector.mdc_code, 22);
        assert_eq!(vector.los_per_mdc, 9.0);
        assert_eq!(vector.los_per_severity, 7.0);

        let at = |name: &str| vector.values[enc.schema().column_index(name).unwrap()];
        assert_eq!(at("Age Group_70+"), 1.0);
        assert_eq!(at("Age Group_50-69"), 0.0);
        assert_eq!(at("Age Group_0-17"), 0.0);
        assert_eq!(at("APR MDC Code"), 22.0);
        assert_eq!(at("APR Severity of Illness Code"), 4.0);
        assert_eq!(at("LOS_per_MDC"), 9.0);
        assert_eq!(at("LOS_per_severity"), 7.0);
    }

    #[test]
    fn test_unknown_description_is_an_error() {
        let enc = encoder();
        let mut record = burns_record();
        record.mdc_description = "Common Cold".into();

        let err = enc.encode(&record).unwrap_err();
        assert!(matches!(err, EncodeError::UnknownCategory(ref d) if d == "Common Cold"));
    }

    #[test]
    fn test_unseen_level_contributes_only_zeros() {
        let enc = encoder();
        let mut record = burns_record();
        record.age_group = "18-29".into(); // not in the fixture schema

        let vector = enc.encode(&record).unwrap();
        assert_eq!(vector.len(), enc.schema().len());
        for name in ["Age Group_0-17", "Age Group_50-69", "Age Group_70+"] {
            assert_eq!(vector.values[enc.schema().column_index(name).unwrap()], 0.0);
        }
    }

    #[test]
    fn test_unseen_severity_code_falls_back_to_median() {
        let enc = encoder();
        let mut record = burns_record();
        record.severity_code = 0; // absent from the fixture severity table

        let vector = enc.encode(&record).unwrap();
        // Median of {2, 3, 5, 7}
        assert_eq!(vector.los_per_severity, 4.0);
    }

    #[test]
    fn test_unseen_mdc_code_falls_back_to_median() {
        let enc = encoder();
        let mut record = burns_record();
        // Cataloged description whose code is absent from the fixture table
        record.mdc_description = "Mental Diseases and Disorders".into();

        let vector = enc.encode(&record).unwrap();
        assert_eq!(vector.mdc_code, 19);
        // Median of {4, 9, 12}
        assert_eq!(vector.los_per_mdc, 9.0);
    }

    #[test]
    fn test_excluded_description_never_sets_an_indicator() {
        // Schema that (wrongly) carries an MDC description indicator; the
        // exclusion list must keep it at zero.
        let mut cols: Vec<String> = fixture_schema().columns().to_vec();
        cols.push("APR MDC Description_Burns".to_string());
        let enc = FeatureEncoder::new(TargetSchema::new(cols), fixture_tables());

        let vector = enc.encode(&burns_record()).unwrap();
        let i = enc.schema().column_index("APR MDC Description_Burns").unwrap();
        assert_eq!(vector.values[i], 0.0);
    }

    #[test]
    fn test_nonzero_features_in_schema_order() {
        let enc = encoder();
        let vector = enc.encode(&burns_record()).unwrap();
        let nonzero = enc.nonzero_features(&vector);

        assert!(nonzero.iter().any(|(n, v)| n == "Age Group_70+" && *v == 1.0));
        assert!(nonzero.iter().any(|(n, v)| n == "LOS_per_MDC" && *v == 9.0));
        // Ordered by schema position
        let positions: Vec<usize> = nonzero
            .iter()
            .map(|(n, _)| enc.schema().column_index(n).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    prop_compose! {
        fn arb_record()(
            county in "[A-Za-z ]{1,12}",
            age in prop_oneof![
                Just("0-17".to_string()),
                Just("18-29".to_string()),
                Just("50-69".to_string()),
                Just("70+".to_string()),
            ],
            gender in "[FMU]",
            severity in 0i64..=4,
            mdc in prop_oneof![
                Just("Burns".to_string()),
                Just("Mental Diseases and Disorders".to_string()),
                Just("Diseases and Disorders of the Circulatory System".to_string()),
            ],
        ) -> AdmissionRecord {
            let mut record = burns_record();
            record.hospital_county = county;
            record.age_group = age;
            record.gender = gender;
            record.severity_code = severity;
            record.mdc_description = mdc;
            record
        }
    }

    proptest! {
        #[test]
        fn prop_output_width_always_matches_schema(record in arb_record()) {
            let enc = encoder();
            let vector = enc.encode(&record).unwrap();
            prop_assert_eq!(vector.len(), enc.schema().len());
        }

        #[test]
        fn prop_encoding_is_deterministic(record in arb_record()) {
            let enc = encoder();
            let a = enc.encode(&record).unwrap();
            let b = enc.encode(&record).unwrap();
            prop_assert_eq!(a.values, b.values);
        }

        #[test]
        fn prop_indicators_are_binary(record in arb_record()) {
            let enc = encoder();
            let vector = enc.encode(&record).unwrap();
            for (name, value) in enc.schema().columns().iter().zip(&vector.values) {
                // Everything except the four numeric columns is an indicator
                if name.contains('_') && !name.starts_with("LOS_per") {
                    prop_assert!(*value == 0.0 || *value == 1.0);
                }
            }
        }
    }
}
