//! Missing-value imputation by half the global minimum.

use crate::data::AbundanceMatrix;

/// Replace every missing cell with half the smallest observed value.
///
/// The minimum is taken across the entire sample-column region, ignoring
/// missing sentinels, and halved once; every missing cell receives that same
/// constant, so downstream matrix methods see complete data. Observed cells
/// are unchanged. A matrix with no observed values is returned as-is.
pub fn impute_halfmin(matrix: &AbundanceMatrix) -> AbundanceMatrix {
    let mut min_observed = f64::INFINITY;
    for v in matrix.matrix().iter() {
        if !v.is_nan() && *v < min_observed {
            min_observed = *v;
        }
    }

    if min_observed.is_infinite() {
        return matrix.clone();
    }

    let fill = min_observed / 2.0;
    matrix.map_values(|v| if v.is_nan() { fill } else { v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::DMatrix;

    fn create_test_matrix() -> AbundanceMatrix {
        let data = DMatrix::from_row_slice(
            2,
            3,
            &[
                4.0, f64::NAN, 10.0, //
                f64::NAN, 6.0, 8.0,
            ],
        );
        AbundanceMatrix::new(
            data,
            vec!["P1".into(), "P2".into()],
            vec!["S1".into(), "S2".into(), "S3".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_missing_filled_with_half_minimum() {
        let out = impute_halfmin(&create_test_matrix());
        assert_eq!(out.get(0, 1), 2.0);
        assert_eq!(out.get(1, 0), 2.0);
    }

    #[test]
    fn test_observed_unchanged() {
        let out = impute_halfmin(&create_test_matrix());
        assert_eq!(out.get(0, 0), 4.0);
        assert_eq!(out.get(1, 1), 6.0);
        assert_eq!(out.get(1, 2), 8.0);
    }

    #[test]
    fn test_complete_after_imputation() {
        let out = impute_halfmin(&create_test_matrix());
        assert!(out.matrix().iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_input_not_mutated() {
        let matrix = create_test_matrix();
        let _ = impute_halfmin(&matrix);
        assert!(matrix.get(0, 1).is_nan());
    }

    #[test]
    fn test_negative_minimum() {
        // Log-scale values can be negative; the half-minimum follows sign.
        let data = DMatrix::from_row_slice(1, 3, &[-4.0, f64::NAN, 2.0]);
        let matrix =
            AbundanceMatrix::new(data, vec!["P1".into()], vec!["S1".into(), "S2".into(), "S3".into()])
                .unwrap();
        let out = impute_halfmin(&matrix);
        assert_eq!(out.get(0, 1), -2.0);
    }

    #[test]
    fn test_all_missing_unchanged() {
        let data = DMatrix::from_element(1, 2, f64::NAN);
        let matrix =
            AbundanceMatrix::new(data, vec!["P1".into()], vec!["S1".into(), "S2".into()]).unwrap();
        let out = impute_halfmin(&matrix);
        assert!(out.get(0, 0).is_nan());
    }
}
