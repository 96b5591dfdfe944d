//! inference::hessian — covariance matrices from observed information.
//!
//! Purpose
//! -------
//! Turn a finite-difference Hessian of the cost (the observed information
//! `J(θ̂)` on the summed log-likelihood scale) into a covariance matrix
//! `J(θ̂)⁻¹`. This module handles conversion between `ndarray` and
//! `nalgebra` types and supports both an exact inverse and an
//! eigen-truncated pseudoinverse.
//!
//! Key behaviors
//! -------------
//! - Call [`compute_hessian`] on the cost gradient `∇c(θ) = -∇ℓ(θ)` to
//!   obtain `J(θ̂)` ([`calc_covariance`]).
//! - Invert an already-built information matrix (`XᵀWX` from IRLS, `XᵀX`
//!   from OLS) with [`covariance_from_information`].
//! - [`CovarianceMethod::Inverse`] uses an LU inverse and fails with
//!   [`InferenceError::SingularInformation`] when none exists;
//!   [`CovarianceMethod::PseudoInverse`] drops eigen-directions with
//!   `λ ≤ EIGEN_EPS`.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`compute_hessian`] returns a finite, symmetric `p×p` matrix with
//!   `p = θ̂.len()`; this module does **not** re-symmetrize.
//! - The returned covariance is not checked for positive semi-definiteness;
//!   that check is per-coefficient and lives in
//!   [`standard_errors`](super::standard_errors).
//!
//! Conventions
//! -----------
//! - Hessians are on the **summed** log-likelihood scale, so the inverse is
//!   the classical MLE covariance.
//! - Errors are reported via [`InferenceResult<T>`].
use crate::{
    inference::errors::{InferenceError, InferenceResult},
    optimization::{
        loglik_optimizer::{Grad, Theta, finite_diff::compute_hessian},
        numerical_stability::transformations::EIGEN_EPS,
    },
};
use nalgebra::DMatrix;
use ndarray::Array2;

/// How an information matrix is turned into a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CovarianceMethod {
    /// Exact inverse; singular information is an error.
    #[default]
    Inverse,
    /// Moore–Penrose pseudoinverse via symmetric eigendecomposition.
    PseudoInverse,
}

impl std::str::FromStr for CovarianceMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inverse" => Ok(CovarianceMethod::Inverse),
            "pinv" | "pseudoinverse" => Ok(CovarianceMethod::PseudoInverse),
            other => Err(format!("unknown covariance method '{other}' (use inverse or pinv)")),
        }
    }
}

/// calc_covariance — covariance from the Hessian of the cost.
///
/// Parameters
/// ----------
/// - `cost_grad`: gradient map of the cost `c(θ) = -ℓ(θ)`, so that its
///   Jacobian is the observed information.
/// - `theta_hat`: the estimate at which the information is evaluated.
/// - `method`: inverse or pseudoinverse.
///
/// Errors
/// ------
/// - `InferenceError::Optimization` when the finite-difference Hessian is
///   unusable.
/// - `InferenceError::SingularInformation` for a singular information
///   matrix under [`CovarianceMethod::Inverse`].
pub fn calc_covariance<F: Fn(&Theta) -> Grad>(
    cost_grad: &F, theta_hat: &Theta, method: CovarianceMethod,
) -> InferenceResult<Array2<f64>> {
    let obs_info = compute_hessian(cost_grad, theta_hat)?;
    covariance_from_information(&obs_info, method)
}

/// Invert a symmetric information matrix according to `method`.
///
/// # Errors
/// [`InferenceError::NotSquare`] for non-square input and
/// [`InferenceError::SingularInformation`] as in [`calc_covariance`].
pub fn covariance_from_information(
    info: &Array2<f64>, method: CovarianceMethod,
) -> InferenceResult<Array2<f64>> {
    if info.nrows() != info.ncols() {
        return Err(InferenceError::NotSquare { rows: info.nrows(), cols: info.ncols() });
    }
    let n = info.nrows();
    let mut info_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(info, &mut info_nalg);
    let cov = match method {
        CovarianceMethod::Inverse => {
            let inv = info_nalg.try_inverse().ok_or(InferenceError::SingularInformation)?;
            if inv.iter().any(|v| !v.is_finite()) {
                return Err(InferenceError::SingularInformation);
            }
            inv
        }
        CovarianceMethod::PseudoInverse => pseudo_inverse(info_nalg),
    };
    Ok(Array2::from_shape_fn((n, n), |(i, j)| cov[(i, j)]))
}

// ---- Helper methods ----

/// Copy an `ndarray` matrix into a `nalgebra::DMatrix`, column by column.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    let n = src.ncols();
    for j in 0..n {
        for i in 0..src.nrows() {
            dst[(i, j)] = src[[i, j]];
        }
    }
}

/// `J⁺ = Σ_{k: λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k` with `J = Q Λ Qᵀ`.
fn pseudo_inverse(info_nalg: DMatrix<f64>) -> DMatrix<f64> {
    let n = info_nalg.nrows();
    let eigen_decomp = info_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let mut pinv = DMatrix::<f64>::zeros(n, n);
    for (k, &lambda) in eigen_decomp.eigenvalues.iter().enumerate() {
        if lambda <= EIGEN_EPS {
            continue;
        }
        for i in 0..n {
            for j in 0..n {
                pinv[(i, j)] += q[(i, k)] * q[(j, k)] / lambda;
            }
        }
    }
    pinv
}
