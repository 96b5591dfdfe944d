//! models::probit — probit regression and marginal effects.
//!
//! Purpose
//! -------
//! Fit `P(y = 1 | x) = Φ(xβ)` by maximum likelihood through the L-BFGS
//! driver and summarize the fit as marginal effects on the probability
//! scale.
//!
//! Key behaviors
//! -------------
//! - Probabilities are clamped to `[PROB_EPS, 1 − PROB_EPS]` in both the
//!   likelihood and the analytic score, so neither produces `ln 0`.
//! - Average marginal effect of column `j`: `mean_i φ(xᵢβ) βⱼ`.
//!   At-means effect: `φ(x̄β) βⱼ`.
//! - Standard errors of the average effects use the delta method
//!   `J Σ Jᵀ` with a finite-difference Jacobian `J = ∂AME/∂β`.
//!
//! Conventions
//! -----------
//! - Outcomes must be exactly 0 or 1.
//! - The intercept gets no marginal effect row.
use ndarray::{Array1, Array2};

use crate::{
    inference::{
        hessian::{CovarianceMethod, calc_covariance},
        standard_errors::{StandardError, extract_standard_errors},
    },
    models::{
        design::{DesignMatrix, INTERCEPT, validate_binary},
        errors::{ModelError, ModelResult},
        fitted::{FitDiagnostics, FittedModel, ModelKind, covariance_or_unstable},
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            Grad, LogLikelihood, MLEOptions, Theta, finite_diff::compute_jacobian, maximize,
            validation::validate_theta_input,
        },
        numerical_stability::{clamp_probability, std_normal_cdf, std_normal_pdf},
    },
};

/// Summed probit log-likelihood with clamped probabilities.
pub fn probit_loglik(beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
    x.dot(beta)
        .iter()
        .zip(y.iter())
        .map(|(&eta, &yi)| {
            let p = clamp_probability(std_normal_cdf(eta));
            yi * p.ln() + (1.0 - yi) * (1.0 - p).ln()
        })
        .sum()
}

/// Score `Σᵢ xᵢ φ(ηᵢ)(yᵢ − Φᵢ) / (Φᵢ(1 − Φᵢ))`.
pub fn probit_score(beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
    let weights: Array1<f64> = x
        .dot(beta)
        .iter()
        .zip(y.iter())
        .map(|(&eta, &yi)| {
            let p = clamp_probability(std_normal_cdf(eta));
            std_normal_pdf(eta) * (yi - p) / (p * (1.0 - p))
        })
        .collect();
    x.t().dot(&weights)
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbitData {
    x: Array2<f64>,
    y: Array1<f64>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProbitRegression;

impl LogLikelihood for ProbitRegression {
    type Data = ProbitData;

    fn value(&self, theta: &Theta, data: &ProbitData) -> OptResult<f64> {
        Ok(probit_loglik(theta, &data.x, &data.y))
    }

    fn check(&self, theta: &Theta, data: &ProbitData) -> OptResult<()> {
        validate_theta_input(theta, data.x.ncols())
    }

    fn grad(&self, theta: &Theta, data: &ProbitData) -> OptResult<Grad> {
        Ok(probit_score(theta, &data.x, &data.y))
    }
}

/// Configuration for [`fit_probit`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProbitOptions {
    pub mle: MLEOptions,
    /// Starting coefficients; zeros when `None`.
    pub theta0: Option<Array1<f64>>,
    pub covariance: CovarianceMethod,
}

/// Fit a probit model by maximum likelihood.
///
/// # Errors
/// - [`ModelError::InvalidOutcome`] for outcomes other than 0/1.
/// - [`ModelError::Underdetermined`] when `n < p`.
/// - [`ModelError::Optimization`] / [`ModelError::Inference`] from the fit.
pub fn fit_probit(
    design: &DesignMatrix, y: &Array1<f64>, opts: &ProbitOptions,
) -> ModelResult<FittedModel> {
    validate_binary(y, design)?;
    if design.n_obs() < design.n_params() {
        return Err(ModelError::Underdetermined {
            n_obs: design.n_obs(),
            n_params: design.n_params(),
        });
    }
    let theta0 = match &opts.theta0 {
        Some(theta) if theta.len() != design.n_params() => {
            return Err(ModelError::LengthMismatch {
                expected: design.n_params(),
                found: theta.len(),
            });
        }
        Some(theta) => theta.clone(),
        None => Array1::zeros(design.n_params()),
    };

    let data = ProbitData { x: design.x().clone(), y: y.clone() };
    let outcome = maximize(&ProbitRegression, theta0, &data, &opts.mle)?;
    let cost_grad = |theta: &Theta| -probit_score(theta, &data.x, &data.y);
    let covariance = covariance_or_unstable(
        calc_covariance(&cost_grad, &outcome.theta_hat, opts.covariance),
        design.n_params(),
        ModelKind::Probit,
    )?;
    let standard_errors = extract_standard_errors(&covariance)?;

    Ok(FittedModel::new(
        ModelKind::Probit,
        design,
        outcome.theta_hat,
        covariance,
        standard_errors,
        outcome.value,
        FitDiagnostics {
            iterations: outcome.iterations,
            status: outcome.status,
            grad_norm: outcome.grad_norm,
        },
    ))
}

/// Marginal effect of one regressor on `P(y = 1)`.
#[derive(Debug, Clone, PartialEq)]
pub struct MarginalEffect {
    pub name: String,
    /// Average over observations of `φ(xᵢβ) βⱼ`.
    pub average: f64,
    /// Delta-method standard error of `average`.
    pub std_error: StandardError,
    /// `φ(x̄β) βⱼ`.
    pub at_means: f64,
}

/// Average and at-means marginal effects of every non-intercept column.
///
/// # Errors
/// - [`ModelError::UnsupportedModel`] for a non-probit fit.
/// - [`ModelError::ShapeMismatch`] if `design` has different columns.
/// - [`ModelError::Optimization`] when the Jacobian is non-finite.
pub fn marginal_effects(
    fit: &FittedModel, design: &DesignMatrix,
) -> ModelResult<Vec<MarginalEffect>> {
    if fit.kind() != ModelKind::Probit {
        return Err(ModelError::UnsupportedModel {
            operation: "probit marginal effects",
            model: fit.kind().label(),
        });
    }
    if design.names() != fit.names() {
        return Err(ModelError::ShapeMismatch {
            expected: (design.n_obs(), fit.names().len()),
            found: (design.n_obs(), design.n_params()),
        });
    }
    let x = design.x();
    let ame = |beta: &Theta| -> Grad {
        let mean_density = x.dot(beta).mapv(std_normal_pdf).mean().unwrap_or(0.0);
        beta * mean_density
    };
    let beta = fit.beta();
    let averages = ame(beta);
    let jac = compute_jacobian(&ame, beta)?;
    let cov = jac.dot(fit.covariance()).dot(&jac.t());
    let ses = extract_standard_errors(&cov)?;
    let density_at_means = std_normal_pdf(design.column_means().dot(beta));

    Ok(fit
        .names()
        .iter()
        .enumerate()
        .filter(|(_, name)| name.as_str() != INTERCEPT)
        .map(|(j, name)| MarginalEffect {
            name: name.clone(),
            average: averages[j],
            std_error: ses[j],
            at_means: density_at_means * beta[j],
        })
        .collect())
}
