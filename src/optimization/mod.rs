//! optimization — MLE stack, numerical helpers, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, numerically guarded transforms,
//! and a single error/result surface. Callers implement a log-likelihood,
//! choose tolerances, and obtain fitted parameters and diagnostics without
//! touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including L-BFGS configuration, stopping
//!   criteria, and a bounded scalar path for one-parameter problems.
//! - Supply shared numerical primitives (`numerical_stability`) for
//!   clipping linear predictors, evaluating the normal link, and rescaling
//!   design columns with the matching covariance map.
//! - Normalize configuration issues, numerical failures, non-convergence and
//!   backend solver errors into a single enum (`errors::OptError`) with a
//!   common result alias (`OptResult<T>`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Optimizers operate on finite inputs once validation has passed;
//!   invalid states are reported as `OptError`, not panics.
//! - Log-likelihood implementations signal invalid parameters with a
//!   non-finite value (conventionally `-∞`); the adapter reports such a
//!   step as a prohibitive cost so the line search backtracks.
//! - A run that exhausts its iteration budget is an error, never a result.
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize a log-likelihood `ℓ(θ)` by minimizing
//!   an internal cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are
//!   expressed in terms of `ℓ`.
//! - Parameters, gradients, and Hessians are represented using `ndarray`
//!   aliases (`Theta`, `Grad`, `Hessian`).
//! - This module and its submodules avoid I/O and logging; the analysis
//!   layer reports fitted models and failures.
//!
//! Downstream usage
//! ----------------
//! - `models` implements `LogLikelihood` for the Poisson and probit models
//!   and calls `maximize` / `maximize_scalar`.
//! - `inference` uses `loglik_optimizer::finite_diff` for Hessians and
//!   `numerical_stability::EIGEN_EPS` for pseudo-inverses.
//!
//! Testing notes
//! -------------
//! - Unit tests in the submodules focus on local concerns: solver wiring,
//!   tolerance handling, convergence reporting, guarded transforms, and
//!   error conversions.

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use replication_stats::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
