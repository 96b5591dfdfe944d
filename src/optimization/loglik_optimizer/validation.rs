//! Validation helpers for log-likelihood optimization.
//!
//! Consistency checks shared by the optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`].
//! - **Search bounds**: [`verify_bounds`] for the one-dimensional Brent path.
//! - **Parameter vectors**: [`validate_theta_input`] for starting values and
//!   [`validate_theta_hat`] for estimates.
//! - **Derivatives**: [`validate_grad`] and [`validate_hessian`].
//! - **Objective values**: [`validate_value`].
//!
//! Every helper reports a specific [`OptError`] variant and never panics.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate the optional gradient‐norm tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a bracketing interval `[lower, upper]` for scalar search.
///
/// # Errors
/// Returns [`OptError::InvalidBounds`] when either end is non-finite or
/// `lower >= upper`.
pub fn verify_bounds(lower: f64, upper: f64) -> OptResult<()> {
    if !lower.is_finite() || !upper.is_finite() {
        return Err(OptError::InvalidBounds { lower, upper, reason: "Bounds must be finite." });
    }
    if lower >= upper {
        return Err(OptError::InvalidBounds {
            lower,
            upper,
            reason: "Lower bound must be strictly below the upper bound.",
        });
    }
    Ok(())
}

/// Validate a starting vector against the model dimension.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] at the first non-finite entry.
pub fn validate_theta_input(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    let t = theta_hat.ok_or(OptError::MissingThetaHat)?;
    for (index, &value) in t.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidThetaHat {
                index,
                value,
                reason: "Parameter estimates must be finite.",
            });
        }
    }
    Ok(t)
}

/// Validate that a scalar log-likelihood value is finite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover the error branches of each helper plus one happy
    // path apiece. Solver-level behavior is out of scope.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Reject non-positive and non-finite tolerances.
    //
    // Expect
    // ------
    // - `InvalidTolGrad` / `InvalidTolCost`; `None` is accepted.
    fn tolerance_checks_reject_bad_values() {
        assert!(matches!(verify_tol_grad(Some(0.0)), Err(OptError::InvalidTolGrad { .. })));
        assert!(matches!(verify_tol_cost(Some(f64::NAN)), Err(OptError::InvalidTolCost { .. })));
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_cost(Some(1e-9)).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Check bracketing-interval validation.
    //
    // Given
    // -----
    // - Reversed bounds, infinite bounds and a valid interval.
    //
    // Expect
    // ------
    // - Errors for the first two, `Ok` for the last.
    fn verify_bounds_requires_finite_ordered_interval() {
        assert!(matches!(verify_bounds(2.0, 1.0), Err(OptError::InvalidBounds { .. })));
        assert!(matches!(verify_bounds(0.0, f64::INFINITY), Err(OptError::InvalidBounds { .. })));
        assert!(verify_bounds(1e-8, 10.0).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Validate starting vectors for length and finiteness.
    //
    // Expect
    // ------
    // - Length mismatch reports expected/actual; NaN reports its index.
    fn validate_theta_input_reports_length_and_nan() {
        assert_eq!(
            validate_theta_input(&array![0.0, 1.0], 3),
            Err(OptError::ThetaLengthMismatch { expected: 3, actual: 2 })
        );
        match validate_theta_input(&array![0.0, f64::NAN], 2) {
            Err(OptError::InvalidThetaInput { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidThetaInput, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Ensure estimates are present and finite.
    //
    // Expect
    // ------
    // - `MissingThetaHat` for `None`; `InvalidThetaHat` for an infinite entry.
    fn validate_theta_hat_rejects_missing_and_infinite() {
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert!(matches!(
            validate_theta_hat(Some(array![f64::INFINITY])),
            Err(OptError::InvalidThetaHat { index: 0, .. })
        ));
    }

    #[test]
    // Purpose
    // -------
    // Check Hessian shape and finiteness validation.
    //
    // Expect
    // ------
    // - Non-square input yields `HessianDimMismatch`; NaN yields `InvalidHessian`.
    fn validate_hessian_checks_shape_and_entries() {
        let rect = Array2::<f64>::zeros((2, 3));
        assert!(matches!(validate_hessian(&rect, 2), Err(OptError::HessianDimMismatch { .. })));

        let nan = array![[1.0, f64::NAN], [0.0, 1.0]];
        assert!(matches!(
            validate_hessian(&nan, 2),
            Err(OptError::InvalidHessian { row: 0, col: 1, .. })
        ));
    }
}
