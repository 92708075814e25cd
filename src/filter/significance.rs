//! Significance filtering by one-way ANOVA.

use crate::data::{AbundanceMatrix, GroupMap};
use crate::error::{MqError, Result};
use crate::test::{test_anova, AnovaResult};

/// Default significance threshold.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Retain proteins whose group means differ significantly.
///
/// Runs a one-way ANOVA per row and keeps rows with `p <= alpha`. Rows with
/// an undefined test (NaN p-value) never pass. The returned [`AnovaResult`]
/// covers all input rows, in input order, so callers can inspect the
/// p-values of removed proteins too.
pub fn filter_significant(
    matrix: &AbundanceMatrix,
    groups: &GroupMap,
    alpha: f64,
) -> Result<(AbundanceMatrix, AnovaResult)> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(MqError::InvalidParameter(
            "Significance threshold must be between 0 and 1".to_string(),
        ));
    }

    let anova = test_anova(matrix, groups)?;

    let keep: Vec<usize> = anova
        .results
        .iter()
        .enumerate()
        .filter(|(_, r)| r.p_value <= alpha)
        .map(|(idx, _)| idx)
        .collect();

    let filtered = matrix.subset_proteins(&keep)?;
    Ok((filtered, anova))
}
