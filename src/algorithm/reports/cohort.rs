//! Cohort breakdown reports
//!
//! Each report is an instance of the generic engine: a bucket specification
//! plus a metric list. Range boundaries are half-open `[low, high)`; the
//! inclusive integer bands (e.g. ages 18-24) are expressed as `[18, 25)`.

use crate::algorithm::aggregation::bucket::{BucketSpec, RangeBand};
use crate::algorithm::aggregation::metric::{MetricSpec, Predicate};
use crate::algorithm::aggregation::{ReportDefinition, RowOrder};
use crate::error::Result;
use crate::models::patient::{CategoricalField, FlagField, NumericField};

pub const AGE_COHORT: &str = "Age Cohort";
pub const BMI_CATEGORY: &str = "BMI Category";
pub const SMOKING_STATUS: &str = "Smoking Status";
pub const PHYSICAL_ACTIVITY: &str = "Physical Activity";
pub const MENTAL_HEALTH: &str = "Mental Health Severity";
pub const SLEEP_DURATION: &str = "Sleep Duration";
pub const GENDER: &str = "Gender";
pub const RACE: &str = "Race";
pub const GENERAL_HEALTH: &str = "General Health";
pub const DIABETIC_STATUS: &str = "Diabetic Status";

fn band(label: &str, low: Option<f64>, high: Option<f64>) -> RangeBand {
    RangeBand::new(label, low, high)
}

fn heart_disease_rate() -> MetricSpec {
    MetricSpec::rate("heart_disease_rate", Predicate::Flag(FlagField::HeartDisease))
}

fn stroke_rate() -> MetricSpec {
    MetricSpec::rate("stroke_rate", Predicate::Flag(FlagField::Stroke))
}

fn diabetes_rate() -> MetricSpec {
    MetricSpec::rate(
        "diabetes_rate",
        Predicate::category(CategoricalField::DiabeticStatus, "Yes"),
    )
}

/// Age bands 18-24 through 65+; under 18 is out of range
pub fn age_buckets() -> Result<BucketSpec> {
    BucketSpec::ranges(
        "age",
        NumericField::Age,
        vec![
            band("18-24", Some(18.0), Some(25.0)),
            band("25-34", Some(25.0), Some(35.0)),
            band("35-44", Some(35.0), Some(45.0)),
            band("45-54", Some(45.0), Some(55.0)),
            band("55-64", Some(55.0), Some(65.0)),
            band("65+", Some(65.0), None),
        ],
    )
}

/// WHO BMI classes
pub fn bmi_buckets() -> Result<BucketSpec> {
    BucketSpec::ranges(
        "bmi",
        NumericField::Bmi,
        vec![
            band("Underweight", None, Some(18.5)),
            band("Normal", Some(18.5), Some(25.0)),
            band("Overweight", Some(25.0), Some(30.0)),
            band("Obese Class I", Some(30.0), Some(35.0)),
            band("Obese Class II", Some(35.0), Some(40.0)),
            band("Obese Class III", Some(40.0), None),
        ],
    )
}

pub fn smoking_buckets() -> Result<BucketSpec> {
    BucketSpec::identity(
        "smoking_status",
        CategoricalField::SmokingStatus,
        &["Never", "Former", "Current"],
    )
}

pub fn physical_activity_buckets() -> Result<BucketSpec> {
    BucketSpec::flag(
        "physical_activity",
        FlagField::PhysicalActivity,
        "Active",
        "Sedentary",
    )
}

/// Poor mental health days in the last month
pub fn mental_health_buckets() -> Result<BucketSpec> {
    BucketSpec::ranges(
        "mental_health_days",
        NumericField::MentalHealthDays,
        vec![
            band("0 days", Some(0.0), Some(1.0)),
            band("1-7 days", Some(1.0), Some(8.0)),
            band("8-14 days", Some(8.0), Some(15.0)),
            band("15-21 days", Some(15.0), Some(22.0)),
            band(">21 days", Some(22.0), None),
        ],
    )
}

/// Hours of sleep per night
pub fn sleep_buckets() -> Result<BucketSpec> {
    BucketSpec::ranges(
        "sleep_time",
        NumericField::SleepTime,
        vec![
            band("<5h", None, Some(5.0)),
            band("5-5.9h", Some(5.0), Some(6.0)),
            band("6-6.9h", Some(6.0), Some(7.0)),
            band("7-8.9h", Some(7.0), Some(9.0)),
            band("9h+", Some(9.0), None),
        ],
    )
}

pub fn age_cohort_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        AGE_COHORT,
        age_buckets()?,
        vec![
            heart_disease_rate(),
            stroke_rate(),
            diabetes_rate(),
            MetricSpec::mean("avg_bmi", NumericField::Bmi),
        ],
        RowOrder::BucketRank,
    )
}

pub fn bmi_category_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        BMI_CATEGORY,
        bmi_buckets()?,
        vec![
            heart_disease_rate(),
            diabetes_rate(),
            MetricSpec::mean("avg_bmi", NumericField::Bmi),
            MetricSpec::mean("avg_physical_health_days", NumericField::PhysicalHealthDays),
        ],
        RowOrder::BucketRank,
    )
}

pub fn smoking_status_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        SMOKING_STATUS,
        smoking_buckets()?,
        vec![
            heart_disease_rate(),
            stroke_rate(),
            MetricSpec::rate("asthma_rate", Predicate::Flag(FlagField::Asthma)),
        ],
        RowOrder::BucketRank,
    )
}

pub fn physical_activity_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        PHYSICAL_ACTIVITY,
        physical_activity_buckets()?,
        vec![
            heart_disease_rate(),
            diabetes_rate(),
            MetricSpec::mean("avg_bmi", NumericField::Bmi),
            MetricSpec::mean("avg_physical_health_days", NumericField::PhysicalHealthDays),
        ],
        RowOrder::BucketRank,
    )
}

pub fn mental_health_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        MENTAL_HEALTH,
        mental_health_buckets()?,
        vec![
            heart_disease_rate(),
            MetricSpec::mean("avg_sleep_time", NumericField::SleepTime),
            MetricSpec::mean("avg_physical_health_days", NumericField::PhysicalHealthDays),
        ],
        RowOrder::BucketRank,
    )
}

pub fn sleep_duration_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        SLEEP_DURATION,
        sleep_buckets()?,
        vec![
            heart_disease_rate(),
            stroke_rate(),
            MetricSpec::mean("avg_mental_health_days", NumericField::MentalHealthDays),
        ],
        RowOrder::BucketRank,
    )
}

/// The six canonical cohort breakdowns in report order
pub fn canonical_reports() -> Result<Vec<ReportDefinition>> {
    Ok(vec![
        age_cohort_report()?,
        bmi_category_report()?,
        smoking_status_report()?,
        physical_activity_report()?,
        mental_health_report()?,
        sleep_duration_report()?,
    ])
}

pub fn gender_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        GENDER,
        BucketSpec::identity("gender", CategoricalField::Gender, &["Female", "Male"])?,
        vec![
            heart_disease_rate(),
            stroke_rate(),
            MetricSpec::rate("alcohol_drinking_rate", Predicate::Flag(FlagField::AlcoholDrinking)),
            MetricSpec::mean("avg_bmi", NumericField::Bmi),
        ],
        RowOrder::BucketRank,
    )
}

/// Race breakdown, ordered by heart disease rate
pub fn race_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        RACE,
        BucketSpec::identity(
            "race",
            CategoricalField::Race,
            &[
                "White",
                "Black",
                "Asian",
                "American Indian/Alaskan Native",
                "Hispanic",
                "Other",
            ],
        )?,
        vec![heart_disease_rate(), diabetes_rate()],
        RowOrder::MetricDesc(0),
    )
}

pub fn general_health_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        GENERAL_HEALTH,
        BucketSpec::identity(
            "general_health",
            CategoricalField::GeneralHealth,
            &["Excellent", "Very good", "Good", "Fair", "Poor"],
        )?,
        vec![
            heart_disease_rate(),
            MetricSpec::rate("diff_walking_rate", Predicate::Flag(FlagField::DiffWalking)),
            MetricSpec::mean("avg_physical_health_days", NumericField::PhysicalHealthDays),
            MetricSpec::mean("avg_mental_health_days", NumericField::MentalHealthDays),
        ],
        RowOrder::BucketRank,
    )
}

pub fn diabetic_status_report() -> Result<ReportDefinition> {
    ReportDefinition::new(
        DIABETIC_STATUS,
        BucketSpec::categories(
            "diabetic_status",
            CategoricalField::DiabeticStatus,
            &[
                ("No", &["No"]),
                ("Borderline", &["No, borderline diabetes", "Borderline"]),
                ("Yes", &["Yes"]),
                ("During pregnancy", &["Yes (during pregnancy)"]),
            ],
        )?,
        vec![
            heart_disease_rate(),
            MetricSpec::rate("kidney_disease_rate", Predicate::Flag(FlagField::KidneyDisease)),
            MetricSpec::mean("avg_bmi", NumericField::Bmi),
        ],
        RowOrder::BucketRank,
    )
}

/// Breakdowns by the remaining categorical fields
pub fn supplemental_reports() -> Result<Vec<ReportDefinition>> {
    Ok(vec![
        gender_report()?,
        race_report()?,
        general_health_report()?,
        diabetic_status_report()?,
    ])
}
