//! inference — covariance matrices and standard errors for fitted models.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification on top of a fitted
//! coefficient vector: covariance from the observed information (or from an
//! information matrix a solver already built) and per-coefficient standard
//! errors that survive numerical trouble on individual coefficients.
//!
//! Key behaviors
//! -------------
//! - Define a unified error and result type, [`InferenceError`] and
//!   [`InferenceResult`].
//! - Build covariance matrices with [`calc_covariance`] (finite-difference
//!   Hessian of the cost) or [`covariance_from_information`], choosing
//!   between an exact inverse and a pseudoinverse via [`CovarianceMethod`].
//! - Extract standard errors with [`extract_standard_errors`] (instability
//!   marked per coefficient) or [`strict_standard_errors`] (instability is
//!   an error).
//!
//! Invariants & assumptions
//! ------------------------
//! - Covariance matrices are `p × p` with `p` the number of coefficients,
//!   ordered like the design-matrix columns.
//! - All routines return [`InferenceError`] on failure rather than
//!   panicking.
//!
//! Conventions
//! -----------
//! - Information matrices are on the summed log-likelihood scale.
//! - No logging, no global state.
//!
//! Downstream usage
//! ----------------
//! - `models::poisson` and `models::probit` call [`calc_covariance`] at the
//!   MLE; `models::glm` and `models::ols` call
//!   [`covariance_from_information`] with `XᵀWX` / `XᵀX`.
//! - `models::fitted::FittedModel` stores the output of
//!   [`extract_standard_errors`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover analytic inverses, singular-matrix handling under
//!   both methods, the diag [4, 9] → [2, 3] identity, and instability
//!   marking.

pub mod errors;
pub mod hessian;
pub mod standard_errors;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{CovarianceMethod, calc_covariance, covariance_from_information};
pub use self::standard_errors::{StandardError, extract_standard_errors, strict_standard_errors};

pub mod prelude {
    pub use super::errors::{InferenceError, InferenceResult};
    pub use super::hessian::{CovarianceMethod, calc_covariance};
    pub use super::standard_errors::{StandardError, extract_standard_errors};
}
