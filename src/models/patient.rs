//! Patient record model
//!
//! A `PatientRecord` is one row of the population-health dataset. Records are
//! immutable once loaded; every field except the identifier may be null.

use serde::{Deserialize, Serialize};

/// One row of patient health indicators
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Unique patient identifier
    pub patient_id: String,

    // Numeric indicators
    /// Age in years
    pub age: Option<f64>,
    /// Body mass index
    pub bmi: Option<f64>,
    /// Average hours of sleep per night
    pub sleep_time: Option<f64>,
    /// Days of poor mental health in the last 30 days
    pub mental_health_days: Option<f64>,
    /// Days of poor physical health in the last 30 days
    pub physical_health_days: Option<f64>,

    // Categorical indicators
    /// Reported gender
    pub gender: Option<String>,
    /// Never / Former / Current
    pub smoking_status: Option<String>,
    /// Diabetic status as reported (e.g. "Yes", "No", "No, borderline diabetes")
    pub diabetic_status: Option<String>,
    /// Reported race
    pub race: Option<String>,
    /// Self-assessed general health
    pub general_health: Option<String>,

    // Condition and behaviour flags
    /// Ever had a stroke
    pub stroke: Option<bool>,
    /// Physical activity in the last 30 days
    pub physical_activity: Option<bool>,
    /// Serious difficulty walking or climbing stairs
    pub diff_walking: Option<bool>,
    /// Ever told they had asthma
    pub asthma: Option<bool>,
    /// Ever told they had kidney disease
    pub kidney_disease: Option<bool>,
    /// Ever told they had skin cancer
    pub skin_cancer: Option<bool>,
    /// Coronary heart disease or myocardial infarction
    pub heart_disease: Option<bool>,
    /// Heavy alcohol consumption
    pub alcohol_drinking: Option<bool>,
}

impl PatientRecord {
    /// Create a record with the given id and every indicator null
    #[must_use]
    pub fn new(patient_id: impl Into<String>) -> Self {
        Self {
            patient_id: patient_id.into(),
            ..Self::default()
        }
    }
}

/// Selector for the numeric columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    Age,
    Bmi,
    SleepTime,
    MentalHealthDays,
    PhysicalHealthDays,
}

impl NumericField {
    /// All numeric fields in schema order
    pub const ALL: [Self; 5] = [
        Self::Age,
        Self::Bmi,
        Self::SleepTime,
        Self::MentalHealthDays,
        Self::PhysicalHealthDays,
    ];

    /// Read the value, treating `NaN` as null
    #[must_use]
    pub fn value(self, record: &PatientRecord) -> Option<f64> {
        let value = match self {
            Self::Age => record.age,
            Self::Bmi => record.bmi,
            Self::SleepTime => record.sleep_time,
            Self::MentalHealthDays => record.mental_health_days,
            Self::PhysicalHealthDays => record.physical_health_days,
        };
        value.filter(|v| !v.is_nan())
    }

    /// Column name in the dataset schema
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Bmi => "bmi",
            Self::SleepTime => "sleep_time",
            Self::MentalHealthDays => "mental_health_days",
            Self::PhysicalHealthDays => "physical_health_days",
        }
    }
}

/// Selector for the categorical columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoricalField {
    Gender,
    SmokingStatus,
    DiabeticStatus,
    Race,
    GeneralHealth,
}

impl CategoricalField {
    /// Read the value; blank strings count as null
    #[must_use]
    pub fn value(self, record: &PatientRecord) -> Option<&str> {
        let value = match self {
            Self::Gender => record.gender.as_deref(),
            Self::SmokingStatus => record.smoking_status.as_deref(),
            Self::DiabeticStatus => record.diabetic_status.as_deref(),
            Self::Race => record.race.as_deref(),
            Self::GeneralHealth => record.general_health.as_deref(),
        };
        value.map(str::trim).filter(|v| !v.is_empty())
    }

    /// Column name in the dataset schema
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Gender => "gender",
            Self::SmokingStatus => "smoking_status",
            Self::DiabeticStatus => "diabetic_status",
            Self::Race => "race",
            Self::GeneralHealth => "general_health",
        }
    }
}

/// Selector for the boolean columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    Stroke,
    PhysicalActivity,
    DiffWalking,
    Asthma,
    KidneyDisease,
    SkinCancer,
    HeartDisease,
    AlcoholDrinking,
}

impl FlagField {
    #[must_use]
    pub fn value(self, record: &PatientRecord) -> Option<bool> {
        match self {
            Self::Stroke => record.stroke,
            Self::PhysicalActivity => record.physical_activity,
            Self::DiffWalking => record.diff_walking,
            Self::Asthma => record.asthma,
            Self::KidneyDisease => record.kidney_disease,
            Self::SkinCancer => record.skin_cancer,
            Self::HeartDisease => record.heart_disease,
            Self::AlcoholDrinking => record.alcohol_drinking,
        }
    }

    /// Column name in the dataset schema
    #[must_use]
    pub const fn column_name(self) -> &'static str {
        match self {
            Self::Stroke => "stroke",
            Self::PhysicalActivity => "physical_activity",
            Self::DiffWalking => "diff_walking",
            Self::Asthma => "asthma",
            Self::KidneyDisease => "kidney_disease",
            Self::SkinCancer => "skin_cancer",
            Self::HeartDisease => "heart_disease",
            Self::AlcoholDrinking => "alcohol_drinking",
        }
    }
}
