use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while turning an uploaded file into a [`super::Table`].
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("Failed to read {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// The CSV reader rejected the content (bad quoting or invalid UTF-8).
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    /// A data row carries more fields than the header names.
    #[error("Malformed CSV: row {row} has {found} fields, but the header has {expected}")]
    ExtraFields {
        /// 1-based data row (header excluded).
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// The uploaded table does not carry what the pipeline needs.
#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    /// A required column is absent from the header row.
    #[error("Missing required column '{column}'")]
    MissingColumn {
        /// Column name that was expected.
        column: &'static str,
    },
    /// A feature cell is empty or not a number.
    #[error("Column '{column}' row {row}: expected a number, found '{value}'")]
    InvalidValue {
        /// Feature column holding the bad cell.
        column: &'static str,
        /// 1-based data row (header excluded).
        row: usize,
        /// Raw cell content, empty when the cell was missing.
        value: String,
    },
}
