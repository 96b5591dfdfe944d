//! models::errors — error surface for model fitting.
//!
//! [`ModelError`] covers design/outcome validation and wraps the optimizer
//! and inference errors raised while fitting, so an analysis can report
//! *which* stage of a fit failed.
use crate::{inference::errors::InferenceError, optimization::errors::OptError};

pub type ModelResult<T> = Result<T, ModelError>;

#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Design ----
    /// Design matrix has no rows or no columns.
    EmptyDesign,

    /// Column names do not match the column count.
    NameCountMismatch { names: usize, columns: usize },

    /// Design entries must be finite.
    NonFiniteDesign { row: usize, col: usize, value: f64 },

    /// Named column is not part of the design.
    UnknownColumn { column: String },

    /// Column is not a 0/1 indicator.
    NotAnIndicator { column: String },

    /// Two designs (or a design and a vector) disagree in shape.
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Vector length does not match the number of observations or params.
    LengthMismatch { expected: usize, found: usize },

    /// Fewer observations than parameters.
    Underdetermined { n_obs: usize, n_params: usize },

    /// Operation is defined for a different model family.
    UnsupportedModel { operation: &'static str, model: &'static str },

    // ---- Outcome ----
    /// Outcome value outside the model's support.
    InvalidOutcome { index: usize, value: f64, reason: &'static str },

    // ---- Solvers ----
    /// Least-squares system is singular.
    SingularDesign,

    /// IRLS exhausted its iteration budget.
    IrlsNotConverged { iterations: usize, deviance_change: f64 },

    /// IRLS options are invalid.
    InvalidIrlsOptions { reason: &'static str },

    // ---- Passthrough ----
    Optimization(OptError),
    Inference(InferenceError),
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Optimization(err) => Some(err),
            ModelError::Inference(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Design ----
            ModelError::EmptyDesign => write!(f, "Design matrix is empty"),
            ModelError::NameCountMismatch { names, columns } => {
                write!(f, "{names} column names for {columns} design columns")
            }
            ModelError::NonFiniteDesign { row, col, value } => {
                write!(f, "Non-finite design entry {value} at ({row}, {col})")
            }
            ModelError::UnknownColumn { column } => {
                write!(f, "Column '{column}' is not in the design")
            }
            ModelError::NotAnIndicator { column } => {
                write!(f, "Column '{column}' is not a 0/1 indicator")
            }
            ModelError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }
            ModelError::LengthMismatch { expected, found } => {
                write!(f, "Length mismatch: expected {expected}, found {found}")
            }
            ModelError::Underdetermined { n_obs, n_params } => {
                write!(f, "{n_obs} observations cannot identify {n_params} parameters")
            }
            ModelError::UnsupportedModel { operation, model } => {
                write!(f, "{operation} is not defined for {model}")
            }

            // ---- Outcome ----
            ModelError::InvalidOutcome { index, value, reason } => {
                write!(f, "Invalid outcome {value} at row {index}: {reason}")
            }

            // ---- Solvers ----
            ModelError::SingularDesign => write!(f, "Design matrix is singular"),
            ModelError::IrlsNotConverged { iterations, deviance_change } => write!(
                f,
                "IRLS did not converge after {iterations} iterations (last deviance change {deviance_change:.3e})"
            ),
            ModelError::InvalidIrlsOptions { reason } => write!(f, "Invalid IRLS options: {reason}"),

            // ---- Passthrough ----
            ModelError::Optimization(err) => write!(f, "{err}"),
            ModelError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<OptError> for ModelError {
    fn from(err: OptError) -> Self {
        ModelError::Optimization(err)
    }
}

impl From<InferenceError> for ModelError {
    fn from(err: InferenceError) -> Self {
        ModelError::Inference(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Non-convergence stays recognizable after wrapping.
    fn not_converged_survives_wrapping() {
        // Arrange
        let opt = OptError::NotConverged { status: "MaxItersReached".into(), iterations: 500 };

        // Act
        let err: ModelError = opt.clone().into();

        // Assert
        assert_eq!(err, ModelError::Optimization(opt));
        assert!(err.to_string().contains("500"));
    }
}
