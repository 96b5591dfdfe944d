//! loglik_optimizer::finite_diff — finite-difference gradient and Hessian helpers.
//!
//! Purpose
//! -------
//! Provide finite-difference gradient and Hessian approximations around a
//! coefficient vector, together with validation and symmetry cleanup, so the
//! rest of the crate never calls the `finitediff` API directly.
//!
//! Key behaviors
//! -------------
//! - Forward-difference gradients with error capture ([`run_fd_diff`]); the
//!   adapter uses this as the retry path after a failed central difference.
//! - Central-difference Hessians of a gradient map, falling back to forward
//!   differences when validation fails ([`compute_hessian`]).
//! - Central-difference Jacobians of vector maps ([`compute_jacobian`]),
//!   used by the delta method for marginal-effect standard errors.
//!
//! Invariants & assumptions
//! ------------------------
//! - Gradients, Hessians and Jacobians returned here have passed finiteness
//!   and shape validation.
//! - Hessians are symmetrized in place before being returned.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use ndarray::Array2;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`, with error capture.
///
/// The FD closure cannot return `Result`, so callers route any error raised
/// inside `func` into `closure_err` and return `NaN`. This helper clears the
/// cell, differentiates, surfaces a captured error, and validates the result.
///
/// # Errors
/// The captured closure error (converted to [`OptError`]) or a gradient
/// validation error.
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Symmetric Hessian of the scalar function whose gradient map is `f`.
///
/// Central differences first; forward differences if the central estimate
/// fails validation.
///
/// # Errors
/// [`OptError::InvalidHessian`] / [`OptError::HessianDimMismatch`] when both
/// approximations are unusable.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

/// Central-difference Jacobian `∂f/∂θ` of a vector map, shape `m × p`.
///
/// # Errors
/// [`OptError::InvalidHessian`] (reused for matrix entries) when an entry is
/// non-finite.
pub fn compute_jacobian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Array2<f64>> {
    let m = f(theta).len();
    let mut jac = Array2::<f64>::zeros((m, theta.len()));
    // Row by row keeps the (output, parameter) layout explicit.
    for k in 0..m {
        let component = |t: &Theta| f(t)[k];
        let row = theta.central_diff(&component);
        jac.row_mut(k).assign(&row);
    }
    for ((row, col), &value) in jac.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row, col, value });
        }
    }
    Ok(jac)
}

// ---- Helper methods ----

fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
