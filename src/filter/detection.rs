//! Group-aware detection-rate filtering.

use crate::data::{AbundanceMatrix, GroupMap};
use crate::error::Result;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Statistics from detection filtering.
///
/// `counts` holds, for each group, the per-row number of detected samples
/// among the retained rows, in output row order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Number of proteins before filtering.
    pub n_before: usize,
    /// Number of proteins after filtering.
    pub n_after: usize,
    /// Group name -> per-row detected-sample counts for retained rows.
    pub counts: HashMap<String, Vec<usize>>,
}

/// Retain proteins detected in at least half the samples of some group.
///
/// A cell counts as detected when its value is strictly greater than zero;
/// missing sentinels never count. The threshold is half the group's current
/// column count, and boundary equality passes. Pass conditions combine
/// across groups with logical OR. Row order is preserved and the output is
/// always a subset of the input rows; an empty input yields an empty output.
pub fn filter_detection(
    matrix: &AbundanceMatrix,
    groups: &GroupMap,
) -> Result<(AbundanceMatrix, DetectionResult)> {
    let group_indices = groups.indices(matrix)?;
    let n_before = matrix.n_proteins();

    let keep: Vec<usize> = (0..n_before)
        .into_par_iter()
        .filter(|&row| {
            group_indices.iter().any(|(_, indices)| {
                let threshold = indices.len() as f64 / 2.0;
                let detected = detected_count(matrix, row, indices);
                detected as f64 >= threshold
            })
        })
        .collect();

    let filtered = matrix.subset_proteins(&keep)?;

    let counts: HashMap<String, Vec<usize>> = group_indices
        .iter()
        .map(|(group, indices)| {
            let per_row: Vec<usize> = keep
                .iter()
                .map(|&row| detected_count(matrix, row, indices))
                .collect();
            (group.clone(), per_row)
        })
        .collect();

    let result = DetectionResult {
        n_before,
        n_after: filtered.n_proteins(),
        counts,
    };

    Ok((filtered, result))
}

#[inline]
fn detected_count(matrix: &AbundanceMatrix, row: usize, indices: &[usize]) -> usize {
    indices
        .iter()
        .filter(|&&col| matrix.get(row, col) > 0.0)
        .count()
}
