//! Median normalization anchored to the median of per-sample medians.

use crate::data::AbundanceMatrix;
use rayon::prelude::*;

/// Rescale every sample column to a common median, returning a new matrix.
///
/// Computes the median of each column's observed values, then the median of
/// those medians, and replaces each value `v` in column `c` with
/// `v / median(c) * median_of_medians`. Missing cells are skipped when
/// computing medians and stay missing afterwards. Columns with no observed
/// values are left untouched, as is a matrix with no observed values at all.
pub fn median_normalize(matrix: &AbundanceMatrix) -> AbundanceMatrix {
    let n_samples = matrix.n_samples();

    let medians: Vec<Option<f64>> = (0..n_samples)
        .into_par_iter()
        .map(|col| {
            let observed: Vec<f64> = matrix.col(col).into_iter().filter(|v| !v.is_nan()).collect();
            median_of(observed)
        })
        .collect();

    let all_medians: Vec<f64> = medians.iter().filter_map(|m| *m).collect();
    let median_of_medians = match median_of(all_medians) {
        Some(m) => m,
        None => return matrix.clone(),
    };

    let mut data = matrix.matrix().clone();
    for col in 0..n_samples {
        if let Some(col_median) = medians[col] {
            for row in 0..matrix.n_proteins() {
                let v = data[(row, col)];
                if !v.is_nan() {
                    data[(row, col)] = v / col_median * median_of_medians;
                }
            }
        }
    }

    AbundanceMatrix::new(
        data,
        matrix.protein_ids().to_vec(),
        matrix.sample_ids().to_vec(),
    )
    .expect("shape unchanged")
}

/// Median of a set of values; `None` when empty. Even-length sets take the
/// mean of the two middle values.
fn median_of(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);
    let n = values.len();
    if n % 2 == 1 {
        Some(values[n / 2])
    } else {
        Some((values[n / 2 - 1] + values[n / 2]) / 2.0)
    }
}
