//! Risk Factor Rules

use admission_record::AdmissionRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Qualitative impact of a factor on the expected stay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    None,
    Low,
    Medium,
    High,
}

/// One contributing factor in the prediction report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskFactor {
    /// Short factor name, e.g. "High Clinical Severity"
    pub factor: String,
    /// Sentence-length explanation
    pub description: String,
    /// Qualitative impact
    pub impact: Impact,
    /// Rough impact range in days, e.g. "+2-4 days"
    pub impact_days: String,
}

impl RiskFactor {
    fn new(factor: &str, description: String, impact: Impact, impact_days: &str) -> Self {
        Self {
            factor: factor.to_string(),
            description,
            impact,
            impact_days: impact_days.to_string(),
        }
    }
}

/// Diagnoses known to drive long stays
const HIGH_LOS_DIAGNOSES: &[(&str, Impact, &str)] = &[
    ("Multiple Significant Trauma", Impact::High, "+4-7 days"),
    ("Burns", Impact::High, "+5-10 days"),
    ("Mental Diseases and Disorders", Impact::Medium, "+2-4 days"),
    (
        "Newborns and Other Neonates with Conditions Originating in the Perinatal Period",
        Impact::Medium,
        "+3-5 days",
    ),
    (
        "Diseases and Disorders of the Circulatory System",
        Impact::Medium,
        "+1-3 days",
    ),
    (
        "Diseases and Disorders of the Respiratory System",
        Impact::Medium,
        "+1-2 days",
    ),
];

/// Rule engine over admission attributes. Stateless; one instance serves all
/// requests.
#[derive(Debug, Default)]
pub struct RiskEngine;

impl RiskEngine {
    pub fn new() -> Self {
        Self
    }

    /// Evaluate every rule against a record. Always returns at least one
    /// entry; routine admissions get an explicit "no complexity" marker.
    pub fn assess(&self, record: &AdmissionRecord) -> Vec<RiskFactor> {
        let mut factors = Vec::new();

        if record.severity_code >= 3 {
            factors.push(RiskFactor::new(
                "High Clinical Severity",
                format!(
                    "Severity level {} indicates complex medical needs",
                    record.severity_code
                ),
                Impact::High,
                "+2-4 days",
            ));
        }

        match record.age_group.as_str() {
            "70+" => factors.push(RiskFactor::new(
                "Advanced Age",
                "Patients 70+ typically require longer recovery periods".to_string(),
                Impact::Medium,
                "+1-2 days",
            )),
            "50-69" => factors.push(RiskFactor::new(
                "Older Adult",
                "Age may contribute to extended recovery time".to_string(),
                Impact::Low,
                "+0.5-1 day",
            )),
            _ => {}
        }

        match record.type_of_admission.as_str() {
            "Emergency" => factors.push(RiskFactor::new(
                "Emergency Admission",
                "Unplanned admissions often involve more complex conditions".to_string(),
                Impact::Medium,
                "+1-3 days",
            )),
            "Trauma" => factors.push(RiskFactor::new(
                "Trauma Case",
                "Traumatic injuries typically require intensive care".to_string(),
                Impact::High,
                "+3-5 days",
            )),
            _ => {}
        }

        if record.medical_surgical == "Surgical" {
            factors.push(RiskFactor::new(
                "Surgical Procedure",
                "Post-operative care and recovery time needed".to_string(),
                Impact::Medium,
                "+2-3 days",
            ));
        }

        if record.ed_indicator == "Y" {
            factors.push(RiskFactor::new(
                "Emergency Department Admission",
                "Initial ED evaluation may indicate urgent condition".to_string(),
                Impact::Low,
                "+0.5-1 day",
            ));
        }

        if let Some((name, impact, days)) = HIGH_LOS_DIAGNOSES
            .iter()
            .find(|(name, _, _)| *name == record.mdc_description)
        {
            let short_name = name.split(" and ").next().unwrap_or(name);
            factors.push(RiskFactor::new(
                "Complex Diagnosis",
                format!("{short_name} typically requires extended care"),
                *impact,
                days,
            ));
        }

        match record.payment_typology.as_str() {
            "Self-Pay" | "Unknown" => factors.push(RiskFactor::new(
                "Insurance Coverage",
                "Insurance status may affect discharge planning".to_string(),
                Impact::Low,
                "+0.5-1 day",
            )),
            "Medicaid" => factors.push(RiskFactor::new(
                "Medicaid Coverage",
                "May require additional discharge planning resources".to_string(),
                Impact::Low,
                "+0.5 day",
            )),
            _ => {}
        }

        if matches!(
            record.patient_disposition.as_str(),
            "Skilled Nursing Home" | "Inpatient Rehabilitation Facility"
        ) {
            factors.push(RiskFactor::new(
                "Post-Acute Care Planning",
                format!(
                    "Discharge to {} requires coordination",
                    record.patient_disposition
                ),
                Impact::Medium,
                "+1-2 days",
            ));
        }

        if factors.is_empty() {
            factors.push(RiskFactor::new(
                "Routine Admission",
                "No major clinical complexity indicators identified".to_string(),
                Impact::None,
                "Standard LOS expected",
            ));
        }

        debug!(count = factors.len(), "risk factors assessed");
        factors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn routine_record() -> AdmissionRecord {
        AdmissionRecord {
            hospital_county: "Albany".into(),
            facility_name: "Albany Medical Center Hospital".into(),
            age_group: "30-49".into(),
            gender: "F".into(),
            race: "White".into(),
            ethnicity: "Not Span/Hispanic".into(),
            type_of_admission: "Elective".into(),
            patient_disposition: "Home or Self Care".into(),
            mdc_description: "Diseases and Disorders of the Eye".into(),
            severity_code: 1,
            medical_surgical: "Medical".into(),
            payment_typology: "Medicare".into(),
            ed_indicator: "N".into(),
        }
    }

    #[test]
    fn test_routine_admission_marker() {
        let engine = RiskEngine::new();
        let factors = engine.assess(&routine_record());
        assert_eq!(factors.len(), 1);
        assert_eq!(factors[0].factor, "Routine Admission");
        assert_eq!(factors[0].impact, Impact::None);
    }

    #[test]
    fn test_severe_elderly_burn_case() {
        let engine = RiskEngine::new();
        let mut record = routine_record();
        record.severity_code = 4;
        record.age_group = "70+".into();
        record.type_of_admission = "Emergency".into();
        record.mdc_description = "Burns".into();
        record.ed_indicator = "Y".into();

        let factors = engine.assess(&record);
        let names: Vec<&str> = factors.iter().map(|f| f.factor.as_str()).collect();
        assert!(names.contains(&"High Clinical Severity"));
        assert!(names.contains(&"Advanced Age"));
        assert!(names.contains(&"Emergency Admission"));
        assert!(names.contains(&"Complex Diagnosis"));
        assert!(names.contains(&"Emergency Department Admission"));
        assert!(!names.contains(&"Routine Admission"));
    }

    #[test]
    fn test_diagnosis_description_is_shortened() {
        let engine = RiskEngine::new();
        let mut record = routine_record();
        record.mdc_description = "Mental Diseases and Disorders".into();

        let factors = engine.assess(&record);
        let diagnosis = factors
            .iter()
            .find(|f| f.factor == "Complex Diagnosis")
            .unwrap();
        assert!(diagnosis.description.starts_with("Mental Diseases typically"));
        assert_eq!(diagnosis.impact, Impact::Medium);
    }

    #[test]
    fn test_disposition_and_payment_rules() {
        let engine = RiskEngine::new();
        let mut record = routine_record();
        record.patient_disposition = "Skilled Nursing Home".into();
        record.payment_typology = "Medicaid".into();

        let factors = engine.assess(&record);
        let names: Vec<&str> = factors.iter().map(|f| f.factor.as_str()).collect();
        assert!(names.contains(&"Post-Acute Care Planning"));
        assert!(names.contains(&"Medicaid Coverage"));
    }

    #[test]
    fn test_impact_serializes_lowercase() {
        let json = serde_json::to_string(&Impact::High).unwrap();
        assert_eq!(json, "\"high\"");
    }
}
