//! inference::standard_errors — per-coefficient standard errors.
//!
//! Standard errors are square roots of the covariance diagonal. A negative
//! or non-finite variance is a numerical failure on *that* coefficient, so
//! [`extract_standard_errors`] marks it and keeps going; callers that need
//! every coefficient usable call [`strict_standard_errors`] instead.
use crate::inference::errors::{InferenceError, InferenceResult};
use ndarray::{Array1, Array2};

/// One coefficient's standard error, or the reason there is none.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StandardError {
    Estimated(f64),
    Unstable { index: usize, variance: f64 },
}

impl StandardError {
    /// The estimate, if any.
    pub fn value(&self) -> Option<f64> {
        match self {
            StandardError::Estimated(se) => Some(*se),
            StandardError::Unstable { .. } => None,
        }
    }

    pub fn is_unstable(&self) -> bool {
        matches!(self, StandardError::Unstable { .. })
    }
}

impl std::fmt::Display for StandardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StandardError::Estimated(se) => write!(f, "{se:.6}"),
            StandardError::Unstable { variance, .. } => write!(f, "unstable (var = {variance:.3e})"),
        }
    }
}

/// Standard errors with per-coefficient instability markers.
///
/// # Errors
/// Only [`InferenceError::NotSquare`]; bad variances become
/// [`StandardError::Unstable`].
pub fn extract_standard_errors(cov: &Array2<f64>) -> InferenceResult<Vec<StandardError>> {
    check_square(cov)?;
    Ok(cov
        .diag()
        .iter()
        .enumerate()
        .map(|(index, &variance)| {
            if variance.is_finite() && variance >= 0.0 {
                StandardError::Estimated(variance.sqrt())
            } else {
                StandardError::Unstable { index, variance }
            }
        })
        .collect())
}

/// Standard errors, failing at the first unusable variance.
///
/// # Errors
/// - [`InferenceError::NotSquare`] for a non-square matrix.
/// - [`InferenceError::EstimationInstability`] for the first negative or
///   non-finite diagonal entry.
pub fn strict_standard_errors(cov: &Array2<f64>) -> InferenceResult<Array1<f64>> {
    extract_standard_errors(cov)?
        .into_iter()
        .map(|se| match se {
            StandardError::Estimated(v) => Ok(v),
            StandardError::Unstable { index, variance } => {
                Err(InferenceError::EstimationInstability { index, variance })
            }
        })
        .collect()
}

fn check_square(cov: &Array2<f64>) -> InferenceResult<()> {
    if cov.nrows() != cov.ncols() {
        return Err(InferenceError::NotSquare { rows: cov.nrows(), cols: cov.ncols() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover exact square roots, per-coefficient instability
    // markers, the strict variant, and shape validation.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Exact square roots of a clean diagonal.
    //
    // Given
    // -----
    // - diag = [4, 9].
    //
    // Expect
    // ------
    // - [2, 3] from both extractors.
    fn diag_four_nine_gives_two_three() {
        // Arrange
        let cov = array![[4.0, 0.3], [0.3, 9.0]];

        // Act
        let marked = extract_standard_errors(&cov).expect("square");
        let strict = strict_standard_errors(&cov).expect("stable");

        // Assert
        assert_eq!(marked, vec![StandardError::Estimated(2.0), StandardError::Estimated(3.0)]);
        assert_eq!(strict, array![2.0, 3.0]);
    }

    #[test]
    // Purpose
    // -------
    // A negative variance is marked on its coefficient only.
    //
    // Given
    // -----
    // - diag = [4, -1, 16].
    //
    // Expect
    // ------
    // - [Estimated(2), Unstable{1, -1}, Estimated(4)];
    //   strict variant returns `EstimationInstability { index: 1, .. }`.
    fn negative_variance_is_marked_not_fatal() {
        // Arrange
        let cov = array![[4.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 16.0]];

        // Act
        let marked = extract_standard_errors(&cov).expect("square");
        let strict = strict_standard_errors(&cov);

        // Assert
        assert_eq!(marked[0], StandardError::Estimated(2.0));
        assert_eq!(marked[1], StandardError::Unstable { index: 1, variance: -1.0 });
        assert_eq!(marked[2].value(), Some(4.0));
        assert_eq!(strict, Err(InferenceError::EstimationInstability { index: 1, variance: -1.0 }));
    }

    #[test]
    // Purpose
    // -------
    // Non-finite variances are unstable too; non-square input is an error.
    fn nan_variance_and_shape_errors() {
        let cov = array![[f64::NAN]];
        assert!(extract_standard_errors(&cov).expect("square")[0].is_unstable());

        let rect = Array2::<f64>::zeros((1, 2));
        assert_eq!(
            extract_standard_errors(&rect),
            Err(InferenceError::NotSquare { rows: 1, cols: 2 })
        );
    }
}
