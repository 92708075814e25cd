//! Log2 transform with missing-value sentinels.

use crate::data::AbundanceMatrix;

/// Apply a log2 transform to every cell, returning a new matrix.
///
/// `log2(0)` would yield negative infinity and a negative input would yield
/// NaN through the math itself; any non-finite result becomes the missing
/// sentinel so infinities never reach later statistics. Already-missing
/// cells stay missing.
pub fn log2_transform(matrix: &AbundanceMatrix) -> AbundanceMatrix {
    matrix.map_values(|v| {
        if v.is_nan() {
            return f64::NAN;
        }
        let log = v.log2();
        if log.is_finite() {
            log
        } else {
            f64::NAN
        }
    })
}
