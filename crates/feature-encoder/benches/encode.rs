//! Encoder hot path benchmark

use admission_record::AdmissionRecord;
use criterion::{criterion_group, criterion_main, Criterion};
use feature_encoder::{FeatureEncoder, LookupTables, TargetSchema};
use std::collections::HashMap;

fn production_sized_encoder() -> FeatureEncoder {
    // Schema shaped like the trained model: mostly indicator columns plus
    // the four numeric features.
    let mut columns: Vec<String> = (0..250).map(|i| format!("Facility Name_F{i}")).collect();
    for level in ["0-17", "18-29", "30-49", "50-69", "70+"] {
        columns.push(format!("Age Group_{level}"));
    }
    columns.push("Gender_F".to_string());
    columns.push("Gender_M".to_string());
    columns.push("APR MDC Code".to_string());
    columns.push("APR Severity of Illness Code".to_string());
    columns.push("LOS_per_MDC".to_string());
    columns.push("LOS_per_severity".to_string());

    let tables = LookupTables::new(
        (0..26).map(|c| (c, 3.0 + c as f64 * 0.25)).collect::<HashMap<_, _>>(),
        (1..=4).map(|c| (c, 2.0 * c as f64)).collect::<HashMap<_, _>>(),
    );
    FeatureEncoder::new(TargetSchema::new(columns), tables)
}

fn bench_encode(c: &mut Criterion) {
    let encoder = production_sized_encoder();
    let record = AdmissionRecord {
        hospital_county: "Albany".into(),
        facility_name: "F42".into(),
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
    };

    c.bench_function("encode_admission_record", |b| {
        b.iter(|| encoder.encode(&record).unwrap())
    });
}

criterion_group!(benches, bench_encode);
criterion_main!(benches);
