//! Uploaded dataset handling: CSV loading, label cleanup and feature selection.

mod error;
pub mod features;
pub mod labels;
pub mod loader;

pub use error::{LoadError, SchemaError};
pub use features::{Dataset, FEATURE_COLUMNS, FEATURE_COUNT, PatientRecord, split_features_target};
pub use labels::{NormalizedLabels, RISK_LEVEL_COLUMN, RiskCategory, normalize_risk_levels};
pub use loader::Table;

/// Cleaned dataset plus how many target labels were filled in along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedDataset {
    pub dataset: Dataset,
    /// Missing labels replaced by the column mode.
    pub mode_filled: usize,
    /// Labels that defaulted to `Low`.
    pub defaulted: usize,
}

/// Run label cleanup and the feature/target split over a loaded table.
///
/// All required columns are checked before any cleanup so a schema problem is
/// reported regardless of which column is missing.
pub fn prepare_dataset(table: &Table) -> Result<PreparedDataset, SchemaError> {
    features::require_feature_columns(table)?;
    let raw_labels = table
        .column(RISK_LEVEL_COLUMN)
        .ok_or(SchemaError::MissingColumn {
            column: RISK_LEVEL_COLUMN,
        })?;
    let NormalizedLabels {
        categories,
        mode_filled,
        defaulted,
    } = normalize_risk_levels(&raw_labels);
    if mode_filled > 0 {
        tracing::warn!("Filled {mode_filled} missing {RISK_LEVEL_COLUMN} values with the column mode");
    }
    if defaulted > 0 {
        tracing::warn!("Defaulted {defaulted} unrecognized {RISK_LEVEL_COLUMN} values to Low");
    }
    let dataset = split_features_target(table, categories)?;
    Ok(PreparedDataset {
        dataset,
        mode_filled,
        defaulted,
    })
}
