//! models::fitted — read-only results of a likelihood-based fit.
//!
//! A [`FittedModel`] is created once by an estimator and never modified. It
//! keeps the coefficient names of the design it was fitted on so every
//! table and prediction uses the same column order.
use log::warn;
use ndarray::{Array1, Array2};

use crate::{
    inference::{
        errors::{InferenceError, InferenceResult},
        standard_errors::StandardError,
    },
    models::{
        design::DesignMatrix,
        errors::{ModelError, ModelResult},
    },
    optimization::numerical_stability::{clip_eta, std_normal_cdf},
};

/// Which estimator produced a fit; also fixes the inverse link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    /// Poisson regression by direct likelihood maximization.
    PoissonMle,
    /// Poisson GLM by iteratively reweighted least squares.
    PoissonGlm,
    /// Probit regression by likelihood maximization.
    Probit,
}

impl ModelKind {
    /// Mean response for a linear predictor value.
    pub fn inverse_link(&self, eta: f64) -> f64 {
        match self {
            ModelKind::PoissonMle | ModelKind::PoissonGlm => clip_eta(eta).exp(),
            ModelKind::Probit => std_normal_cdf(eta),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ModelKind::PoissonMle => "Poisson regression (MLE)",
            ModelKind::PoissonGlm => "Poisson GLM (IRLS)",
            ModelKind::Probit => "Probit regression (MLE)",
        }
    }
}

/// Solver diagnostics carried alongside the estimates.
#[derive(Debug, Clone, PartialEq)]
pub struct FitDiagnostics {
    pub iterations: usize,
    pub status: String,
    pub grad_norm: Option<f64>,
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientRow {
    pub name: String,
    pub estimate: f64,
    pub std_error: StandardError,
    /// `estimate / se`; `None` when the standard error is unusable.
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// Fitted likelihood model.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    kind: ModelKind,
    names: Vec<String>,
    beta: Array1<f64>,
    covariance: Array2<f64>,
    standard_errors: Vec<StandardError>,
    eta: Array1<f64>,
    mu: Array1<f64>,
    loglik: f64,
    n_obs: usize,
    diagnostics: FitDiagnostics,
}

impl FittedModel {
    /// Assemble a fit. `eta` and `mu` are computed from `design` and `beta`.
    pub(crate) fn new(
        kind: ModelKind, design: &DesignMatrix, beta: Array1<f64>, covariance: Array2<f64>,
        standard_errors: Vec<StandardError>, loglik: f64, diagnostics: FitDiagnostics,
    ) -> Self {
        let eta = design.x().dot(&beta);
        let mu = eta.mapv(|e| kind.inverse_link(e));
        Self {
            kind,
            names: design.names().to_vec(),
            beta,
            covariance,
            standard_errors,
            eta,
            mu,
            loglik,
            n_obs: design.n_obs(),
            diagnostics,
        }
    }

    pub fn kind(&self) -> ModelKind {
        self.kind
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn beta(&self) -> &Array1<f64> {
        &self.beta
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn standard_errors(&self) -> &[StandardError] {
        &self.standard_errors
    }

    /// Fitted linear predictor `η = Xβ`.
    pub fn eta(&self) -> &Array1<f64> {
        &self.eta
    }

    /// Fitted mean response.
    pub fn mu(&self) -> &Array1<f64> {
        &self.mu
    }

    pub fn loglik(&self) -> f64 {
        self.loglik
    }

    pub fn n_obs(&self) -> usize {
        self.n_obs
    }

    pub fn diagnostics(&self) -> &FitDiagnostics {
        &self.diagnostics
    }

    /// Coefficient for `name`.
    pub fn coefficient(&self, name: &str) -> ModelResult<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.beta[i])
            .ok_or_else(|| ModelError::UnknownColumn { column: name.to_string() })
    }

    /// Akaike information criterion `2p − 2ℓ`.
    pub fn aic(&self) -> f64 {
        2.0 * self.beta.len() as f64 - 2.0 * self.loglik
    }

    /// Coefficient table with Wald z statistics and normal p-values.
    pub fn coefficient_table(&self) -> Vec<CoefficientRow> {
        self.names
            .iter()
            .zip(self.beta.iter())
            .zip(&self.standard_errors)
            .map(|((name, &estimate), se)| {
                let statistic = se.value().filter(|s| *s > 0.0).map(|s| estimate / s);
                let p_value = statistic.map(|z| 2.0 * (1.0 - std_normal_cdf(z.abs())));
                CoefficientRow { name: name.clone(), estimate, std_error: *se, statistic, p_value }
            })
            .collect()
    }

    /// Mean response for a new design with the same columns.
    ///
    /// # Errors
    /// [`ModelError::ShapeMismatch`] if the column count or names differ.
    pub fn predict(&self, design: &DesignMatrix) -> ModelResult<Array1<f64>> {
        if design.names() != self.names.as_slice() {
            return Err(ModelError::ShapeMismatch {
                expected: (design.n_obs(), self.names.len()),
                found: (design.n_obs(), design.n_params()),
            });
        }
        Ok(design.x().dot(&self.beta).mapv(|e| self.kind.inverse_link(e)))
    }
}

/// Covariance to report for a converged fit.
///
/// A singular information matrix keeps the estimates: the covariance is
/// filled with NaN so that every standard error comes out `Unstable`.
/// Other inference failures are returned.
pub(crate) fn covariance_or_unstable(
    result: InferenceResult<Array2<f64>>, n_params: usize, kind: ModelKind,
) -> ModelResult<Array2<f64>> {
    match result {
        Ok(cov) => Ok(cov),
        Err(InferenceError::SingularInformation) => {
            warn!("{}: singular information matrix, standard errors unavailable", kind.label());
            Ok(Array2::from_elem((n_params, n_params), f64::NAN))
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    fn fitted() -> FittedModel {
        let design = DesignMatrix::new(
            vec!["const".into(), "x".into()],
            array![[1.0, 0.0], [1.0, 1.0]],
        )
        .expect("valid design");
        FittedModel::new(
            ModelKind::PoissonMle,
            &design,
            array![0.5, 1.0],
            array![[0.04, 0.0], [0.0, -1.0]],
            vec![
                StandardError::Estimated(0.2),
                StandardError::Unstable { index: 1, variance: -1.0 },
            ],
            -3.0,
            FitDiagnostics { iterations: 4, status: "SolverConverged".into(), grad_norm: None },
        )
    }

    #[test]
    // Purpose
    // -------
    // Fitted means follow the inverse link; unstable SEs yield no statistic.
    //
    // Expect
    // ------
    // - μ = (e^0.5, e^1.5); z = 2.5 for `const`; `x` has no z or p.
    fn fitted_model_means_and_table() {
        // Arrange
        let fit = fitted();

        // Act
        let table = fit.coefficient_table();

        // Assert
        assert_relative_eq!(fit.mu()[0], 0.5_f64.exp());
        assert_relative_eq!(fit.mu()[1], 1.5_f64.exp());
        assert_relative_eq!(table[0].statistic.expect("stable se"), 2.5);
        assert!(table[1].statistic.is_none() && table[1].p_value.is_none());
        assert_relative_eq!(fit.aic(), 10.0);
        assert_eq!(fit.coefficient("x"), Ok(1.0));
    }

    #[test]
    // Purpose
    // -------
    // Prediction requires the same column names.
    fn predict_rejects_mismatched_design() {
        let other = DesignMatrix::new(vec!["const".into()], array![[1.0]]).expect("valid");
        assert!(matches!(fitted().predict(&other), Err(ModelError::ShapeMismatch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // A singular information matrix degrades to unstable standard errors;
    // other inference failures still propagate.
    //
    // Expect
    // ------
    // - `SingularInformation` gives a 2×2 NaN covariance whose standard
    //   errors are all `Unstable`.
    // - `NotSquare` stays an error.
    fn covariance_or_unstable_keeps_singular_fits() {
        // Act
        let cov = covariance_or_unstable(
            Err(InferenceError::SingularInformation),
            2,
            ModelKind::PoissonGlm,
        )
        .expect("singular information is not fatal");
        let other = covariance_or_unstable(
            Err(InferenceError::NotSquare { rows: 2, cols: 3 }),
            2,
            ModelKind::PoissonGlm,
        );

        // Assert
        assert_eq!(cov.dim(), (2, 2));
        let ses = crate::inference::standard_errors::extract_standard_errors(&cov)
            .expect("square matrix");
        assert!(ses.iter().all(StandardError::is_unstable));
        assert_eq!(
            other,
            Err(ModelError::Inference(InferenceError::NotSquare { rows: 2, cols: 3 }))
        );
    }
}
