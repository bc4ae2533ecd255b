//! Tests for the disease prevalence report

use cohort_stats::algorithm::reports::prevalence::{
    DiseaseSpec, PREVALENCE_REPORT, PrevalenceDefinition, RATE_COLUMN,
};
use cohort_stats::models::patient::{CategoricalField, FlagField};
use cohort_stats::utils::test::{generate_synthetic_records, scenario_records};
use cohort_stats::{PatientRecord, Predicate, ReportConfig, prevalence_report};

#[test]
fn test_scenario_heart_disease_prevalence() {
    let records = scenario_records();
    let report = prevalence_report(&records, &ReportConfig::default());

    assert_eq!(report.name, PREVALENCE_REPORT);
    assert_eq!(report.total_records, 4);

    let heart = report.row("Heart Disease").unwrap();
    assert_eq!(heart.count, 2);
    assert_eq!(heart.metric(RATE_COLUMN), Some(50.0));
    assert_eq!(report.rows[0].label, "Heart Disease");
}

#[test]
fn test_rows_sorted_by_rate_with_declared_order_on_ties() {
    let records = scenario_records();
    let report = prevalence_report(&records, &ReportConfig::default());

    let labels: Vec<&str> = report.rows.iter().map(|r| r.label.as_str()).collect();
    assert_eq!(
        labels,
        vec![
            "Heart Disease",
            "Stroke",
            "Diabetes",
            "Asthma",
            "Kidney Disease",
            "Skin Cancer",
            "Difficulty Walking",
        ]
    );
    assert!(report.rows[1..].iter().all(|r| r.metric(RATE_COLUMN) == Some(0.0)));
}

#[test]
fn test_empty_input_has_no_rows() {
    let report = prevalence_report(&[], &ReportConfig::default());
    assert!(report.rows.is_empty());
    assert_eq!(report.total_records, 0);
}

#[test]
fn test_diabetes_matches_yes_but_not_its_variants() {
    let statuses = ["Yes", "Yes (during pregnancy)", "No, borderline diabetes", "yes"];
    let records: Vec<PatientRecord> = statuses
        .iter()
        .enumerate()
        .map(|(i, status)| PatientRecord {
            diabetic_status: Some((*status).to_string()),
            ..PatientRecord::new(format!("p{i}"))
        })
        .collect();

    let definition = PrevalenceDefinition::new(vec![DiseaseSpec::new(
        "Diabetes",
        Predicate::category(CategoricalField::DiabeticStatus, "Yes"),
    )])
    .unwrap();
    let report = definition.run(&records, &ReportConfig::default());
    // "Yes" and "yes"; the pregnancy and borderline variants are not diabetes
    assert_eq!(report.rows[0].count, 2);
    assert_eq!(report.rows[0].metric(RATE_COLUMN), Some(50.0));
}

#[test]
fn test_null_flags_count_in_denominator_only() {
    let records = vec![
        PatientRecord {
            stroke: Some(true),
            ..PatientRecord::new("a")
        },
        PatientRecord {
            stroke: Some(false),
            ..PatientRecord::new("b")
        },
        PatientRecord::new("c"),
    ];
    let definition =
        PrevalenceDefinition::new(vec![DiseaseSpec::new("Stroke", Predicate::Flag(FlagField::Stroke))])
            .unwrap();
    let report = definition.run(&records, &ReportConfig::default());
    assert_eq!(report.rows[0].count, 1);
    assert_eq!(report.rows[0].metric(RATE_COLUMN), Some(33.33));
}

#[test]
fn test_parallel_counting_matches_sequential() {
    let records = generate_synthetic_records(3_000, 17);
    let sequential = prevalence_report(&records, &ReportConfig::default());
    let parallel = prevalence_report(
        &records,
        &ReportConfig {
            parallel_threshold: 0,
            partitions: 4,
            ..ReportConfig::default()
        },
    );
    assert_eq!(sequential, parallel);
}

#[test]
fn test_single_partition_counts_sequentially() {
    let records = generate_synthetic_records(500, 29);
    let config = ReportConfig {
        parallel_threshold: 0,
        partitions: 1,
        ..ReportConfig::default()
    };
    assert!(!config.runs_parallel(records.len()));
    assert_eq!(
        prevalence_report(&records, &config),
        prevalence_report(&records, &ReportConfig::default())
    );
}
