//! End-to-end runs of the full report suite

use cohort_stats::algorithm::reports::cohort::{self, BMI_CATEGORY};
use cohort_stats::algorithm::reports::prevalence::PREVALENCE_REPORT;
use cohort_stats::utils::logging::render_suite;
use cohort_stats::utils::test::{generate_synthetic_records, scenario_records};
use cohort_stats::{ReportConfig, ReportSuite};

fn quiet_config() -> ReportConfig {
    ReportConfig {
        show_progress: false,
        ..ReportConfig::default()
    }
}

#[test]
fn test_scenario_bmi_report() {
    let records = scenario_records();
    let report = cohort::bmi_category_report()
        .unwrap()
        .run(&records, &quiet_config());

    let rows: Vec<(&str, u64, Option<f64>, Option<f64>)> = report
        .rows
        .iter()
        .map(|r| {
            (
                r.label.as_str(),
                r.count,
                r.metric("heart_disease_rate"),
                r.metric("avg_bmi"),
            )
        })
        .collect();
    assert_eq!(
        rows,
        vec![
            ("Underweight", 1, Some(0.0), Some(18.0)),
            ("Normal", 1, Some(0.0), Some(22.0)),
            ("Obese Class I", 1, Some(100.0), Some(32.0)),
            ("Obese Class III", 1, Some(100.0), Some(41.0)),
        ]
    );
}

#[test]
fn test_scenario_suite() {
    let records = scenario_records();
    let config = quiet_config();
    let output = ReportSuite::standard(&config).unwrap().run(&records, &config);

    assert_eq!(output.total_records, 4);
    assert_eq!(output.reports[0].name, PREVALENCE_REPORT);
    let bmi = output.report(BMI_CATEGORY).unwrap();
    assert_eq!(bmi.rows.len(), 4);

    // only BMI is populated, so every other cohort puts all four in Unknown
    let age = output.report(cohort::AGE_COHORT).unwrap();
    assert_eq!(age.rows.len(), 1);
    assert_eq!(age.rows[0].count, 4);
}

#[test]
fn test_synthetic_suite_accounts_for_every_record() {
    let records = generate_synthetic_records(10_000, 42);
    let config = ReportConfig {
        parallel_threshold: 1_000,
        partitions: 4,
        ..quiet_config()
    };
    let suite = ReportSuite::standard(&config).unwrap();
    let output = suite.run(&records, &config);

    assert_eq!(
        output.reports.iter().map(|r| r.name.as_str()).collect::<Vec<_>>(),
        suite.report_names()
    );
    for report in output.reports.iter().skip(1) {
        assert_eq!(report.population_sum(), 10_000, "report {}", report.name);
    }

    let correlations = output.correlations.as_ref().unwrap();
    assert_eq!(correlations.rows.len(), 10);
    for row in &correlations.rows {
        assert!(row.pairs <= 10_000);
        let r = row.r.unwrap();
        assert!((-1.0..=1.0).contains(&r), "{} x {}: {r}", row.x, row.y);
    }
}

#[test]
fn test_empty_input_gives_empty_reports() {
    let config = quiet_config();
    let output = ReportSuite::standard(&config).unwrap().run(&[], &config);

    assert_eq!(output.total_records, 0);
    assert!(output.reports.iter().all(|r| r.rows.is_empty()));
    let correlations = output.correlations.unwrap();
    assert!(correlations.rows.iter().all(|r| r.pairs == 0 && r.r.is_none()));
}

#[test]
fn test_json_output_shape() {
    let records = scenario_records();
    let config = quiet_config();
    let output = ReportSuite::standard(&config).unwrap().run(&records, &config);
    let json = serde_json::to_value(&output).unwrap();

    assert!(json["generated_at"].is_string());
    assert_eq!(json["total_records"], 4);

    let bmi = json["reports"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == BMI_CATEGORY)
        .unwrap();
    let first = &bmi["rows"][0];
    assert_eq!(first["label"], "Underweight");
    assert_eq!(first["count"], 1);
    assert_eq!(first["heart_disease_rate"], 0.0);
    // no physical health values, so the mean is null rather than zero
    assert!(first["avg_physical_health_days"].is_null());

    assert_eq!(json["correlations"]["rows"].as_array().unwrap().len(), 10);
}

#[test]
fn test_table_rendering_lists_every_report() {
    let records = scenario_records();
    let config = quiet_config();
    let suite = ReportSuite::standard(&config).unwrap();
    let rendered = render_suite(&suite.run(&records, &config));

    for name in suite.report_names() {
        assert!(rendered.contains(name), "missing {name}");
    }
    assert!(rendered.contains("Obese Class III"));
}
