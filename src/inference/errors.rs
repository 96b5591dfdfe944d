//! Unified error handling for inference routines.
//!
//! This module defines `InferenceError`, the central error type used by
//! covariance construction and standard-error extraction. It groups
//! numerical degeneracies (singular information, unstable variances) with
//! shape errors and a passthrough for optimizer failures raised while
//! differentiating. An alias `InferenceResult<T>` standardizes the return
//! type across inference code.
use crate::optimization::errors::OptError;

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Covariance diagonal ----
    /// A variance on the covariance diagonal is negative or non-finite.
    EstimationInstability {
        index: usize,
        variance: f64,
    },

    // ---- Matrix shape ----
    /// Covariance / information matrix is not square.
    NotSquare {
        rows: usize,
        cols: usize,
    },

    /// Matrix dimension does not match the coefficient count.
    DimensionMismatch {
        expected: usize,
        found: usize,
    },

    // ---- Inversion ----
    /// Information matrix could not be inverted.
    SingularInformation,

    // ---- Passthrough ----
    /// Failure while building the finite-difference Hessian.
    Optimization(OptError),
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl From<OptError> for InferenceError {
    fn from(err: OptError) -> Self {
        InferenceError::Optimization(err)
    }
}

impl std::error::Error for InferenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            InferenceError::Optimization(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Covariance diagonal ----
            InferenceError::EstimationInstability { index, variance } => write!(
                f,
                "Inference Error: Estimation instability at coefficient {index} (variance = {variance})"
            ),

            // ---- Matrix shape ----
            InferenceError::NotSquare { rows, cols } => {
                write!(f, "Inference Error: Matrix must be square, got {rows}x{cols}")
            }
            InferenceError::DimensionMismatch { expected, found } => {
                write!(f, "Inference Error: Dimension mismatch: expected {expected}, found {found}")
            }

            // ---- Inversion ----
            InferenceError::SingularInformation => {
                write!(f, "Inference Error: Information matrix is singular")
            }

            // ---- Passthrough ----
            InferenceError::Optimization(err) => write!(f, "Inference Error: {err}"),
        }
    }
}
