//! Dense abundance matrix with missing-value sentinels.

use crate::error::{MqError, Result};
use nalgebra::DMatrix;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// A protein × sample abundance matrix.
///
/// Rows represent protein groups, columns represent samples. Missing values
/// (undetected or removed by the log transform) are stored as `f64::NAN`.
/// Transforms never mutate in place; every stage returns a new matrix.
#[derive(Debug, Clone)]
pub struct AbundanceMatrix {
    /// Dense data (proteins × samples).
    data: DMatrix<f64>,
    /// Protein identifiers (row names).
    protein_ids: Vec<String>,
    /// Sample column names.
    sample_ids: Vec<String>,
}

impl AbundanceMatrix {
    /// Create a new matrix from dense data and identifiers.
    pub fn new(
        data: DMatrix<f64>,
        protein_ids: Vec<String>,
        sample_ids: Vec<String>,
    ) -> Result<Self> {
        let (nrows, ncols) = data.shape();
        if nrows != protein_ids.len() {
            return Err(MqError::DimensionMismatch {
                expected: nrows,
                actual: protein_ids.len(),
            });
        }
        if ncols != sample_ids.len() {
            return Err(MqError::DimensionMismatch {
                expected: ncols,
                actual: sample_ids.len(),
            });
        }
        Ok(Self {
            data,
            protein_ids,
            sample_ids,
        })
    }

    /// Get the value at (protein, sample).
    #[inline]
    pub fn get(&self, protein: usize, sample: usize) -> f64 {
        self.data[(protein, sample)]
    }

    /// Number of proteins (rows).
    #[inline]
    pub fn n_proteins(&self) -> usize {
        self.data.nrows()
    }

    /// Number of samples (columns).
    #[inline]
    pub fn n_samples(&self) -> usize {
        self.data.ncols()
    }

    /// Protein identifiers.
    #[inline]
    pub fn protein_ids(&self) -> &[String] {
        &self.protein_ids
    }

    /// Sample column names.
    #[inline]
    pub fn sample_ids(&self) -> &[String] {
        &self.sample_ids
    }

    /// Reference to the underlying dense matrix.
    #[inline]
    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Get a row (protein) as a vector.
    pub fn row(&self, protein: usize) -> Vec<f64> {
        self.data.row(protein).iter().cloned().collect()
    }

    /// Get a column (sample) as a vector.
    pub fn col(&self, sample: usize) -> Vec<f64> {
        self.data.column(sample).iter().cloned().collect()
    }

    /// Index of a sample column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.sample_ids.iter().position(|s| s == name)
    }

    /// Apply a cell-wise transform, returning a new matrix.
    pub fn map_values<F: Fn(f64) -> f64>(&self, f: F) -> Self {
        Self {
            data: self.data.map(f),
            protein_ids: self.protein_ids.clone(),
            sample_ids: self.sample_ids.clone(),
        }
    }

    /// Subset the matrix to the given protein indices, preserving order.
    pub fn subset_proteins(&self, indices: &[usize]) -> Result<Self> {
        let mut data = DMatrix::zeros(indices.len(), self.n_samples());
        let mut protein_ids = Vec::with_capacity(indices.len());

        for (new_row, &old_row) in indices.iter().enumerate() {
            if old_row >= self.n_proteins() {
                return Err(MqError::InvalidParameter(format!(
                    "Protein index {} out of bounds",
                    old_row
                )));
            }
            protein_ids.push(self.protein_ids[old_row].clone());
            for col in 0..self.n_samples() {
                data[(new_row, col)] = self.data[(old_row, col)];
            }
        }

        Self::new(data, protein_ids, self.sample_ids.clone())
    }

    /// Reorder sample columns into the given name order.
    ///
    /// Every requested name must exist; columns not named are dropped,
    /// which is how non-grouped columns leave the matrix.
    pub fn reorder_samples(&self, order: &[String]) -> Result<Self> {
        let mut data = DMatrix::zeros(self.n_proteins(), order.len());
        for (new_col, name) in order.iter().enumerate() {
            let old_col = self.column_index(name).ok_or_else(|| {
                MqError::Grouping(format!("Sample column '{}' not found in matrix", name))
            })?;
            for row in 0..self.n_proteins() {
                data[(row, new_col)] = self.data[(row, old_col)];
            }
        }
        Self::new(data, self.protein_ids.clone(), order.to_vec())
    }

    /// Write the matrix to a TSV file. Missing values are written as `NaN`.
    pub fn to_tsv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let mut writer = BufWriter::new(file);

        write!(writer, "{}", super::protein_groups::ID_COLUMN)?;
        for sample_id in &self.sample_ids {
            write!(writer, "\t{}", sample_id)?;
        }
        writeln!(writer)?;

        for (row, protein_id) in self.protein_ids.iter().enumerate() {
            write!(writer, "{}", protein_id)?;
            for col in 0..self.n_samples() {
                let value = self.get(row, col);
                if value.is_nan() {
                    write!(writer, "\tNaN")?;
                } else {
                    write!(writer, "\t{}", value)?;
                }
            }
            writeln!(writer)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_matrix() -> AbundanceMatrix {
        let data = DMatrix::from_row_slice(
            3,
            4,
            &[
                10.0, 20.0, 0.0, 5.0, //
                100.0, f64::NAN, 150.0, 175.0, //
                1.0, 0.0, 0.0, 0.0,
            ],
        );
        let protein_ids = vec!["P1".to_string(), "P2".to_string(), "P3".to_string()];
        let sample_ids = vec![
            "iBAQ 01_Liver".to_string(),
            "iBAQ 02_Liver".to_string(),
            "iBAQ 01_Brain".to_string(),
            "iBAQ 02_Brain".to_string(),
        ];
        AbundanceMatrix::new(data, protein_ids, sample_ids).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let mat = create_test_matrix();
        assert_eq!(mat.n_proteins(), 3);
        assert_eq!(mat.n_samples(), 4);
    }

    #[test]
    fn test_dimension_mismatch() {
        let data = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let result = AbundanceMatrix::new(
            data,
            vec!["P1".into(), "P2".into()],
            vec!["S1".into(), "S2".into()],
        );
        assert!(matches!(result, Err(MqError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_subset_proteins() {
        let mat = create_test_matrix();
        let subset = mat.subset_proteins(&[0, 2]).unwrap();
        assert_eq!(subset.n_proteins(), 2);
        assert_eq!(subset.protein_ids(), &["P1", "P3"]);
        assert_eq!(subset.get(1, 0), 1.0);
    }

    #[test]
    fn test_reorder_samples() {
        let mat = create_test_matrix();
        let order = vec![
            "iBAQ 01_Brain".to_string(),
            "iBAQ 02_Brain".to_string(),
            "iBAQ 01_Liver".to_string(),
            "iBAQ 02_Liver".to_string(),
        ];
        let reordered = mat.reorder_samples(&order).unwrap();
        assert_eq!(reordered.sample_ids(), order.as_slice());
        assert_eq!(reordered.get(0, 0), 0.0);
        assert_eq!(reordered.get(0, 2), 10.0);
        assert!(reordered.get(1, 3).is_nan());
    }

    #[test]
    fn test_reorder_unknown_column() {
        let mat = create_test_matrix();
        let err = mat
            .reorder_samples(&["iBAQ 99_Kidney".to_string()])
            .unwrap_err();
        assert!(matches!(err, MqError::Grouping(_)));
    }

    #[test]
    fn test_tsv_output() {
        let mat = create_test_matrix();
        let file = tempfile::NamedTempFile::new().unwrap();
        mat.to_tsv(file.path()).unwrap();

        let contents = std::fs::read_to_string(file.path()).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("Majority protein IDs\t"));
        assert_eq!(lines.next().unwrap(), "P1\t10\t20\t0\t5");
        assert!(lines.next().unwrap().contains("\tNaN\t"));
    }
}
