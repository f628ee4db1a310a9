//! Patient vitals and the feature/target split used for training.

use ndarray::{Array2, arr2};
use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::labels::RiskCategory;
use super::loader::Table;

/// Feature columns in the order the model sees them.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Age",
    "SystolicBP",
    "DiastolicBP",
    "BS",
    "BodyTemp",
    "HeartRate",
];

/// Number of vital-sign features per patient.
pub const FEATURE_COUNT: usize = 6;

/// Allowed range and input step for one form field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldBounds {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl FieldBounds {
    const fn new(min: f64, max: f64, step: f64) -> Self {
        Self { min, max, step }
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

pub const AGE_BOUNDS: FieldBounds = FieldBounds::new(10.0, 100.0, 1.0);
pub const SYSTOLIC_BP_BOUNDS: FieldBounds = FieldBounds::new(50.0, 200.0, 1.0);
pub const DIASTOLIC_BP_BOUNDS: FieldBounds = FieldBounds::new(30.0, 150.0, 1.0);
pub const BLOOD_SUGAR_BOUNDS: FieldBounds = FieldBounds::new(0.0, 10.0, 0.1);
pub const BODY_TEMP_BOUNDS: FieldBounds = FieldBounds::new(35.0, 42.0, 0.1);
pub const HEART_RATE_BOUNDS: FieldBounds = FieldBounds::new(40.0, 200.0, 1.0);

/// Vitals for a single patient, as entered in the form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatientRecord {
    /// Age in whole years.
    pub age: u32,
    /// Systolic blood pressure (mmHg).
    pub systolic_bp: u32,
    /// Diastolic blood pressure (mmHg).
    pub diastolic_bp: u32,
    /// Blood sugar level (mmol/L).
    pub blood_sugar: f32,
    /// Body temperature.
    pub body_temp: f32,
    /// Heart rate (bpm).
    pub heart_rate: u32,
}

impl Default for PatientRecord {
    fn default() -> Self {
        Self {
            age: 25,
            systolic_bp: 120,
            diastolic_bp: 80,
            blood_sugar: 4.5,
            body_temp: 37.0,
            heart_rate: 75,
        }
    }
}

impl PatientRecord {
    /// Feature vector in [`FEATURE_COLUMNS`] order.
    pub fn to_features(&self) -> [f32; FEATURE_COUNT] {
        [
            self.age as f32,
            self.systolic_bp as f32,
            self.diastolic_bp as f32,
            self.blood_sugar,
            self.body_temp,
            self.heart_rate as f32,
        ]
    }

    /// Single-row feature matrix matching the training layout.
    pub fn to_matrix(&self) -> Array2<f32> {
        arr2(&[self.to_features()])
    }

    /// Pin every field to its form bounds.
    pub fn clamped(self) -> Self {
        Self {
            age: clamp_u32(self.age, AGE_BOUNDS),
            systolic_bp: clamp_u32(self.systolic_bp, SYSTOLIC_BP_BOUNDS),
            diastolic_bp: clamp_u32(self.diastolic_bp, DIASTOLIC_BP_BOUNDS),
            blood_sugar: clamp_f32(self.blood_sugar, BLOOD_SUGAR_BOUNDS),
            body_temp: clamp_f32(self.body_temp, BODY_TEMP_BOUNDS),
            heart_rate: clamp_u32(self.heart_rate, HEART_RATE_BOUNDS),
        }
    }

    pub fn is_within_bounds(&self) -> bool {
        AGE_BOUNDS.contains(self.age as f64)
            && SYSTOLIC_BP_BOUNDS.contains(self.systolic_bp as f64)
            && DIASTOLIC_BP_BOUNDS.contains(self.diastolic_bp as f64)
            && BLOOD_SUGAR_BOUNDS.contains(self.blood_sugar as f64)
            && BODY_TEMP_BOUNDS.contains(self.body_temp as f64)
            && HEART_RATE_BOUNDS.contains(self.heart_rate as f64)
    }
}

fn clamp_u32(value: u32, bounds: FieldBounds) -> u32 {
    value.clamp(bounds.min as u32, bounds.max as u32)
}

fn clamp_f32(value: f32, bounds: FieldBounds) -> f32 {
    if value.is_nan() {
        return bounds.min as f32;
    }
    value.clamp(bounds.min as f32, bounds.max as f32)
}

/// Feature matrix and aligned targets ready for training.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// Shape: `[rows][FEATURE_COUNT]`.
    pub features: Array2<f32>,
    /// One category per feature row.
    pub target: Vec<RiskCategory>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.target.len()
    }

    pub fn is_empty(&self) -> bool {
        self.target.is_empty()
    }

    /// Targets as class codes.
    pub fn target_codes(&self) -> Vec<usize> {
        self.target.iter().map(|category| category.code()).collect()
    }

    /// Row count per category, indexed by class code.
    pub fn class_counts(&self) -> [usize; RiskCategory::COUNT] {
        let mut counts = [0usize; RiskCategory::COUNT];
        for category in &self.target {
            counts[category.code()] += 1;
        }
        counts
    }

    /// Number of categories with at least one row.
    pub fn distinct_classes(&self) -> usize {
        self.class_counts().iter().filter(|&&count| count > 0).count()
    }
}

/// Fail unless every feature column is present.
pub fn require_feature_columns(table: &Table) -> Result<(), SchemaError> {
    match FEATURE_COLUMNS
        .iter()
        .find(|column| table.column_index(column).is_none())
    {
        Some(&column) => Err(SchemaError::MissingColumn { column }),
        None => Ok(()),
    }
}

/// Select the six feature columns (fixed order) and pair them with the cleaned target.
pub fn split_features_target(
    table: &Table,
    target: Vec<RiskCategory>,
) -> Result<Dataset, SchemaError> {
    require_feature_columns(table)?;
    let rows = table.len();
    let mut features = Array2::<f32>::zeros((rows, FEATURE_COUNT));
    for (col_idx, column) in FEATURE_COLUMNS.into_iter().enumerate() {
        let cells = table
            .column(column)
            .ok_or(SchemaError::MissingColumn { column })?;
        for (row_idx, cell) in cells.into_iter().enumerate() {
            features[[row_idx, col_idx]] = parse_feature(column, row_idx, cell)?;
        }
    }
    debug_assert_eq!(target.len(), rows);
    Ok(Dataset { features, target })
}

fn parse_feature(
    column: &'static str,
    row_idx: usize,
    cell: Option<&str>,
) -> Result<f32, SchemaError> {
    let invalid = |value: &str| SchemaError::InvalidValue {
        column,
        row: row_idx + 1,
        value: value.to_string(),
    };
    let raw = cell.ok_or_else(|| invalid(""))?;
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(invalid(raw)),
    }
}
