//! Admission Record

use serde::{Deserialize, Serialize};

/// Dataset column names, shared between the record, the validator and the
/// encoder so indicator names line up with the training schema.
pub mod columns {
    pub const HOSPITAL_COUNTY: &str = "Hospital County";
    pub const FACILITY_NAME: &str = "Facility Name";
    pub const AGE_GROUP: &str = "Age Group";
    pub const GENDER: &str = "Gender";
    pub const RACE: &str = "Race";
    pub const ETHNICITY: &str = "Ethnicity";
    pub const TYPE_OF_ADMISSION: &str = "Type of Admission";
    pub const PATIENT_DISPOSITION: &str = "Patient Disposition";
    pub const MDC_CODE: &str = "APR MDC Code";
    pub const MDC_DESCRIPTION: &str = "APR MDC Description";
    pub const SEVERITY_CODE: &str = "APR Severity of Illness Code";
    pub const MEDICAL_SURGICAL: &str = "APR Medical Surgical Description";
    pub const PAYMENT_TYPOLOGY: &str = "Payment Typology 1";
    pub const ED_INDICATOR: &str = "Emergency Department Indicator";

    /// Derived numeric features appended before encoding.
    pub const LOS_PER_MDC: &str = "LOS_per_MDC";
    pub const LOS_PER_SEVERITY: &str = "LOS_per_severity";

    /// The 13 attributes every prediction request must carry. `APR MDC
    /// Code` is not among them; it is derived from the description.
    pub const REQUIRED: [&str; 13] = [
        HOSPITAL_COUNTY,
        FACILITY_NAME,
        AGE_GROUP,
        GENDER,
        RACE,
        ETHNICITY,
        TYPE_OF_ADMISSION,
        PATIENT_DISPOSITION,
        MDC_DESCRIPTION,
        SEVERITY_CODE,
        MEDICAL_SURGICAL,
        PAYMENT_TYPOLOGY,
        ED_INDICATOR,
    ];
}

/// One admission case: the 13 attributes the model was trained on, keyed by
/// the SPARCS dataset column names on the wire. Immutable once deserialized;
/// built per request and discarded after the prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionRecord {
    #[serde(rename = "Hospital County")]
    pub hospital_county: String,
    #[serde(rename = "Facility Name")]
    pub facility_name: String,
    #[serde(rename = "Age Group")]
    pub age_group: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Race")]
    pub race: String,
    #[serde(rename = "Ethnicity")]
    pub ethnicity: String,
    #[serde(rename = "Type of Admission")]
    pub type_of_admission: String,
    #[serde(rename = "Patient Disposition")]
    pub patient_disposition: String,
    #[serde(rename = "APR MDC Description")]
    pub mdc_description: String,
    #[serde(rename = "APR Severity of Illness Code")]
    pub severity_code: i64,
    #[serde(rename = "APR Medical Surgical Description")]
    pub medical_surgical: String,
    #[serde(rename = "Payment Typology 1")]
    pub payment_typology: String,
    #[serde(rename = "Emergency Department Indicator")]
    pub ed_indicator: String,
}

impl AdmissionRecord {
    /// All string-valued attributes as (column name, level) pairs, in
    /// dataset column order. The encoder expands these into indicator
    /// columns; the validator checks them for emptiness.
    pub fn categorical_levels(&self) -> [(&'static str, &str); 12] {
        [
            (columns::HOSPITAL_COUNTY, &self.hospital_county),
            (columns::FACILITY_NAME, &self.facility_name),
            (columns::AGE_GROUP, &self.age_group),
            (columns::GENDER, &self.gender),
            (columns::RACE, &self.race),
            (columns::ETHNICITY, &self.ethnicity),
            (columns::TYPE_OF_ADMISSION, &self.type_of_admission),
            (columns::PATIENT_DISPOSITION, &self.patient_disposition),
            (columns::MDC_DESCRIPTION, &self.mdc_description),
            (columns::MEDICAL_SURGICAL, &self.medical_surgical),
            (columns::PAYMENT_TYPOLOGY, &self.payment_typology),
            (columns::ED_INDICATOR, &self.ed_indicator),
        ]
    }
}
