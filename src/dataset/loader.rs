//! CSV loader producing an in-memory table of named string columns.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::error::LoadError;

/// Cell contents that count as missing, matching common dataframe readers.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Row-major table with a header row; missing cells are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Load a table from a CSV file on disk.
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Load a table from in-memory CSV bytes (e.g. a dropped file).
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, LoadError> {
        Self::from_reader(bytes)
    }

    /// Parse CSV from any reader. The first record is the header row.
    ///
    /// Rows shorter than the header read their trailing cells as missing;
    /// rows longer than the header are rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);
        let headers = reader
            .headers()?
            .iter()
            .map(|name| name.trim_start_matches('\u{feff}').trim().to_string())
            .collect::<Vec<_>>();
        let mut rows = Vec::new();
        for (idx, record) in reader.records().enumerate() {
            let record = record?;
            if record.len() > headers.len() {
                return Err(LoadError::ExtraFields {
                    row: idx + 1,
                    found: record.len(),
                    expected: headers.len(),
                });
            }
            rows.push(record.iter().map(parse_cell).collect());
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact (trimmed) header name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|header| header == name)
    }

    /// Borrow every cell of a column, top to bottom.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).and_then(|cell| cell.as_deref()))
                .collect(),
        )
    }
}

fn parse_cell(raw: &str) -> Option<String> {
    if MISSING_MARKERS.contains(&raw) {
        None
    } else {
        Some(raw.to_string())
    }
}
