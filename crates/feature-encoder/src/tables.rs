//! Category-to-Code Lookup Tables
//!
//! The MDC description-to-code table is fixed by the APR-DRG grouper and
//! compiled in. The median-LOS tables are training artifacts loaded at
//! startup; both are read-only for the process lifetime.

use std::collections::HashMap;

/// APR MDC description to numeric code (APR-DRG major diagnostic categories)
const MDC_CODES: &[(&str, i64)] = &[
    ("Pre-MDC or Ungroupable", 0),
    ("Diseases and Disorders of the Nervous System", 1),
    ("Diseases and Disorders of the Eye", 2),
    (
        "Ear, Nose, Mouth, Throat and Craniofacial Diseases and Disorders",
        3,
    ),
    ("Diseases and Disorders of the Respiratory System", 4),
    ("Diseases and Disorders of the Circulatory System", 5),
    ("Diseases and Disorders of the Digestive System", 6),
    (
        "Diseases and Disorders of the Hepatobiliary System and Pancreas",
        7,
    ),
    (
        "Diseases and Disorders of the Musculoskeletal System and Conn Tissue",
        8,
    ),
    (
        "Diseases and Disorders of the Skin, Subcutaneous Tissue and Breast",
        9,
    ),
    (
        "Endocrine, Nutritional and Metabolic Diseases and Disorders",
        10,
    ),
    ("Diseases and Disorders of the Kidney and Urinary Tract", 11),
    ("Diseases and Disorders of the Male Reproductive System", 12),
    ("Diseases and Disorders of the Female Reproductive System", 13),
    ("Pregnancy, Childbirth and the Puerperium", 14),
    (
        "Newborns and Other Neonates with Conditions Originating in the Perinatal Period",
        15,
    ),
    (
        "Diseases and Disorders of Blood, Blood Forming Organs and Immunological Disorders",
        16,
    ),
    (
        "Lymphatic, Hematopoietic, Other Malignancies, Chemotherapy and Radiotherapy",
        17,
    ),
    (
        "Infectious and Parasitic Diseases, Systemic or Unspecified Sites",
        18,
    ),
    ("Mental Diseases and Disorders", 19),
    (
        "Alcohol/Drug Use and Alcohol/Drug Induced Organic Mental Disorders",
        20,
    ),
    (
        "Poisonings, Toxic Effects, Other Injuries and Other Complications of Treatment",
        21,
    ),
    ("Burns", 22),
    (
        "Rehabilitation, Aftercare, Other Factors Influencing Health Status and Other Health Service Contacts",
        23,
    ),
    ("Human Immunodeficiency Virus Infections", 24),
    ("Multiple Significant Trauma", 25),
];

/// Resolve an MDC description to its numeric code. `None` means the
/// description was never cataloged; callers must surface that, not guess.
pub fn mdc_code_for(description: &str) -> Option<i64> {
    MDC_CODES
        .iter()
        .find(|(name, _)| *name == description)
        .map(|(_, code)| *code)
}

/// Median length-of-stay tables learned during training, keyed by MDC code
/// and severity code. Codes absent from a table (unseen at training time)
/// fall back to that table's own median, keeping inference available at the
/// cost of specificity.
#[derive(Debug, Clone)]
pub struct LookupTables {
    los_per_mdc: HashMap<i64, f64>,
    los_per_severity: HashMap<i64, f64>,
    mdc_fallback: f64,
    severity_fallback: f64,
}

impl LookupTables {
    /// Build tables and precompute the fallback medians.
    pub fn new(los_per_mdc: HashMap<i64, f64>, los_per_severity: HashMap<i64, f64>) -> Self {
        let mdc_fallback = median(&los_per_mdc);
        let severity_fallback = median(&los_per_severity);
        Self {
            los_per_mdc,
            los_per_severity,
            mdc_fallback,
            severity_fallback,
        }
    }

    /// Median LOS for an MDC code seen at training time
    pub fn mdc_median_los(&self, code: i64) -> Option<f64> {
        self.los_per_mdc.get(&code).copied()
    }

    /// Median LOS for a severity code seen at training time
    pub fn severity_median_los(&self, code: i64) -> Option<f64> {
        self.los_per_severity.get(&code).copied()
    }

    /// Fallback value for MDC codes unseen at training time
    pub fn mdc_fallback(&self) -> f64 {
        self.mdc_fallback
    }

    /// Fallback value for severity codes unseen at training time
    pub fn severity_fallback(&self) -> f64 {
        self.severity_fallback
    }

    /// Number of MDC entries
    pub fn mdc_entries(&self) -> usize {
        self.los_per_mdc.len()
    }

    /// Number of severity entries
    pub fn severity_entries(&self) -> usize {
        self.los_per_severity.len()
    }
}

/// Median of a table's values; 0.0 for an empty table.
fn median(table: &HashMap<i64, f64>) -> f64 {
    if table.is_empty() {
        return 0.0;
    }
    let mut values: Vec<f64> = table.values().copied().collect();
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}
