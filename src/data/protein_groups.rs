//! Raw MaxQuant `proteinGroups.txt` table with identification-quality flags.

use crate::data::AbundanceMatrix;
use crate::error::{MqError, Result};
use nalgebra::DMatrix;
use std::path::Path;

/// Column holding the protein group identity.
pub const ID_COLUMN: &str = "Majority protein IDs";

/// Identification-quality flag columns; a `"+"` marks the flag as set.
pub const FLAG_COLUMNS: [&str; 3] = [
    "Only identified by site",
    "Reverse",
    "Potential contaminant",
];

/// Marker value indicating a set quality flag.
pub const FLAG_SET: &str = "+";

/// Separator found in ambiguous (multi-ID) protein identities.
pub const ID_SEPARATOR: char = ';';

/// Default feature-type prefix selecting intensity columns.
pub const DEFAULT_INTENSITY_PREFIX: &str = "iBAQ ";

/// The raw protein groups table, loaded as strings.
///
/// Rows represent protein groups, columns are the MaxQuant export columns.
/// Numeric interpretation is deferred until an intensity slice is taken.
#[derive(Debug, Clone)]
pub struct ProteinGroups {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    id_idx: usize,
    flag_idx: [usize; 3],
}

impl ProteinGroups {
    /// Load a protein groups table from a tab-separated file.
    ///
    /// Fails fast with [`MqError::MissingColumn`] if the identity column or
    /// any quality flag column is absent, before any transform runs.
    pub fn from_tsv<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'\t')
            .flexible(true)
            .from_path(path)?;

        let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
        let n_cols = headers.len();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut row: Vec<String> = record.iter().map(|f| f.to_string()).collect();
            // Short records happen when trailing flag cells are empty.
            row.resize(n_cols, String::new());
            rows.push(row);
        }

        Self::new(headers, rows)
    }

    /// Create a table from headers and string rows, validating the schema.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self> {
        let find = |name: &str| -> Result<usize> {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| MqError::MissingColumn(name.to_string()))
        };

        let id_idx = find(ID_COLUMN)?;
        let flag_idx = [
            find(FLAG_COLUMNS[0])?,
            find(FLAG_COLUMNS[1])?,
            find(FLAG_COLUMNS[2])?,
        ];

        Ok(Self {
            headers,
            rows,
            id_idx,
            flag_idx,
        })
    }

    /// Number of rows (protein groups).
    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column headers.
    #[inline]
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The protein identity value for a row.
    #[inline]
    pub fn protein_id(&self, row: usize) -> &str {
        &self.rows[row][self.id_idx]
    }

    /// Whether any quality flag is set for a row (exact `"+"` match).
    pub fn any_flag_set(&self, row: usize) -> bool {
        self.flag_idx
            .iter()
            .any(|&idx| self.rows[row][idx] == FLAG_SET)
    }

    /// Whether a row's identity is ambiguous (contains the ID separator).
    pub fn is_multi_id(&self, row: usize) -> bool {
        self.protein_id(row).contains(ID_SEPARATOR)
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Subset the table to the given row indices, preserving order.
    pub fn subset_rows(&self, indices: &[usize]) -> Result<Self> {
        let mut rows = Vec::with_capacity(indices.len());
        for &idx in indices {
            let row = self.rows.get(idx).ok_or_else(|| {
                MqError::InvalidParameter(format!("Row index {} out of bounds", idx))
            })?;
            rows.push(row.clone());
        }
        Ok(Self {
            headers: self.headers.clone(),
            rows,
            id_idx: self.id_idx,
            flag_idx: self.flag_idx,
        })
    }

    /// Slice out the identity column plus all columns starting with `prefix`,
    /// parsing the selected cells into an [`AbundanceMatrix`].
    ///
    /// Empty cells and `NaN` markers become the missing-value sentinel.
    /// Selecting zero sample columns is a configuration error.
    pub fn slice_intensity(&self, prefix: &str) -> Result<AbundanceMatrix> {
        let selected: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .filter(|(idx, h)| *idx != self.id_idx && h.starts_with(prefix))
            .map(|(idx, _)| idx)
            .collect();

        if selected.is_empty() {
            return Err(MqError::Grouping(format!(
                "Feature prefix '{}' matched no sample columns",
                prefix
            )));
        }

        let sample_ids: Vec<String> = selected
            .iter()
            .map(|&idx| self.headers[idx].clone())
            .collect();
        let protein_ids: Vec<String> = (0..self.n_rows())
            .map(|row| self.protein_id(row).to_string())
            .collect();

        let mut data = DMatrix::zeros(self.n_rows(), selected.len());
        for (row_idx, row) in self.rows.iter().enumerate() {
            for (col_idx, &src_idx) in selected.iter().enumerate() {
                data[(row_idx, col_idx)] =
                    parse_cell(&row[src_idx], row_idx, &self.headers[src_idx])?;
            }
        }

        AbundanceMatrix::new(data, protein_ids, sample_ids)
    }
}

/// Parse a single intensity cell. Empty and `NaN` cells are missing.
fn parse_cell(value: &str, row: usize, column: &str) -> Result<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(f64::NAN);
    }
    trimmed.parse::<f64>().map_err(|_| MqError::InvalidValue {
        value: value.to_string(),
        row,
        column: column.to_string(),
    })
}
