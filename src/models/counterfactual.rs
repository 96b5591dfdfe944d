//! models::counterfactual — model-based effects of switching a regressor.
//!
//! Two designs that differ only in one column are pushed through the fitted
//! Poisson mean `exp(Xβ)`; the per-row difference and its average are the
//! effect estimate. Averages are independent of row order.
use ndarray::Array1;

use crate::{
    models::{
        design::DesignMatrix,
        errors::{ModelError, ModelResult},
        fitted::{FittedModel, ModelKind},
    },
    optimization::numerical_stability::clip_eta,
};

/// Per-observation and average counterfactual differences.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterfactualEffect {
    /// `exp(X₁β) − exp(X₀β)`, row by row.
    pub differences: Array1<f64>,
    /// Mean of `differences`.
    pub average: f64,
}

/// Compare predicted means under `x_zero` and `x_one`.
///
/// # Errors
/// - [`ModelError::ShapeMismatch`] when the two designs differ in shape or
///   column names.
/// - [`ModelError::LengthMismatch`] when `beta` does not match the columns.
pub fn counterfactual_from_designs(
    beta: &Array1<f64>, x_zero: &DesignMatrix, x_one: &DesignMatrix,
) -> ModelResult<CounterfactualEffect> {
    let shape0 = (x_zero.n_obs(), x_zero.n_params());
    let shape1 = (x_one.n_obs(), x_one.n_params());
    if shape0 != shape1 || x_zero.names() != x_one.names() {
        return Err(ModelError::ShapeMismatch { expected: shape0, found: shape1 });
    }
    if beta.len() != x_zero.n_params() {
        return Err(ModelError::LengthMismatch { expected: x_zero.n_params(), found: beta.len() });
    }
    let mu0 = x_zero.x().dot(beta).mapv(|e| clip_eta(e).exp());
    let mu1 = x_one.x().dot(beta).mapv(|e| clip_eta(e).exp());
    let differences = mu1 - mu0;
    let average = differences.mean().unwrap_or(0.0);
    Ok(CounterfactualEffect { differences, average })
}

/// Effect of switching indicator `column` from 0 to 1 for every row,
/// holding the other observed covariates fixed.
///
/// # Errors
/// - [`ModelError::UnsupportedModel`] for a probit fit.
/// - [`ModelError::UnknownColumn`] when `column` is not in the design.
/// - [`ModelError::NotAnIndicator`] when the column holds values other than
///   0 and 1.
/// - [`ModelError::ShapeMismatch`] when `design` does not match the fit.
pub fn indicator_effect(
    fitted: &FittedModel, design: &DesignMatrix, column: &str,
) -> ModelResult<CounterfactualEffect> {
    if fitted.kind() == ModelKind::Probit {
        return Err(ModelError::UnsupportedModel {
            operation: "Poisson counterfactual",
            model: fitted.kind().label(),
        });
    }
    if design.names() != fitted.names() {
        return Err(ModelError::ShapeMismatch {
            expected: (design.n_obs(), fitted.names().len()),
            found: (design.n_obs(), design.n_params()),
        });
    }
    let idx = design.column_index(column)?;
    if design.x().column(idx).iter().any(|&v| v != 0.0 && v != 1.0) {
        return Err(ModelError::NotAnIndicator { column: column.to_string() });
    }
    let x_zero = design.with_column_value(column, 0.0)?;
    let x_one = design.with_column_value(column, 1.0)?;
    counterfactual_from_designs(fitted.beta(), &x_zero, &x_one)
}
