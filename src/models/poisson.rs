//! models::poisson — Poisson regression by direct likelihood maximization.
//!
//! Purpose
//! -------
//! Evaluate the Poisson log-likelihood of a log-linear mean `μ = exp(Xβ)`,
//! provide its analytic score, and fit `β` with the crate's L-BFGS driver.
//! A one-parameter rate fit (`Y ~ Poisson(λ)`) is provided separately and
//! solved with a bounded Brent search.
//!
//! Key behaviors
//! -------------
//! - [`poisson_loglik`] clips `η = Xβ` to `[-ETA_BOUND, ETA_BOUND]` before
//!   exponentiating, so the value is finite for any finite `β`. A `NaN`
//!   in `η` yields `f64::NEG_INFINITY`.
//! - [`poisson_loglik_from_mean`] returns `f64::NEG_INFINITY` whenever some
//!   `μᵢ ≤ 0` or is `NaN`.
//! - [`fit_poisson`] rescales non-constant columns by their maximum
//!   absolute value, maximizes on the scaled problem, and maps `β` and its
//!   covariance back to the caller's units.
//! - The covariance is the inverse of a finite-difference Hessian of the
//!   cost gradient `−Xᵀ(y − μ)` at `β̂`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Outcomes are validated as non-negative integers before any fit.
//! - `lnΓ(yᵢ + 1)` is precomputed once per fit in [`PoissonData`].
//! - Non-convergence of the optimizer is an error
//!   ([`OptError::NotConverged`](crate::optimization::errors::OptError::NotConverged)
//!   wrapped in [`ModelError::Optimization`]).
//!
//! Conventions
//! -----------
//! - Coefficients follow the design's column order.
//! - Without an explicit `θ₀`, the intercept starts at `ln ȳ` (when `ȳ > 0`)
//!   and every slope at zero.
//!
//! Testing notes
//! -------------
//! - Intercept-only fits must return `λ̂ = ȳ` on both the Brent path and the
//!   L-BFGS path.
//! - End-to-end recovery on synthetic data lives in the integration tests.
use ndarray::{Array1, Array2};
use statrs::function::gamma::ln_gamma;

use crate::{
    inference::{
        hessian::{CovarianceMethod, calc_covariance},
        standard_errors::extract_standard_errors,
    },
    models::{
        design::{DesignMatrix, INTERCEPT, validate_counts},
        errors::{ModelError, ModelResult},
        fitted::{FitDiagnostics, FittedModel, ModelKind, covariance_or_unstable},
    },
    optimization::{
        errors::OptResult,
        loglik_optimizer::{
            Grad, LogLikelihood, MLEOptions, ScalarOptions, Theta, maximize, maximize_scalar,
            validation::validate_theta_input,
        },
        numerical_stability::{
            clip_eta, column_scales, scale_columns, unscale_coefficients, unscale_covariance,
        },
    },
};

/// Lower edge of the default rate bracket.
const RATE_LOWER: f64 = 1e-10;

/// Summed Poisson log-likelihood of `μ = exp(Xβ)`.
///
/// Returns `f64::NEG_INFINITY` when `Xβ` contains `NaN`.
pub fn poisson_loglik(beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> f64 {
    let eta = x.dot(beta);
    if eta.iter().any(|e| e.is_nan()) {
        return f64::NEG_INFINITY;
    }
    let mu = eta.mapv(|e| clip_eta(e).exp());
    poisson_loglik_from_mean(y, &mu)
}

/// Summed Poisson log-likelihood `Σ [yᵢ ln μᵢ − μᵢ − lnΓ(yᵢ + 1)]`.
///
/// Returns `f64::NEG_INFINITY` if any `μᵢ ≤ 0` or is `NaN`.
pub fn poisson_loglik_from_mean(y: &Array1<f64>, mu: &Array1<f64>) -> f64 {
    if mu.iter().any(|&m| m.is_nan() || m <= 0.0) {
        return f64::NEG_INFINITY;
    }
    y.iter().zip(mu.iter()).map(|(&yi, &mi)| yi * mi.ln() - mi - ln_gamma(yi + 1.0)).sum()
}

/// Score `Xᵀ(y − μ)` with the same clipping as [`poisson_loglik`].
pub fn poisson_score(beta: &Array1<f64>, x: &Array2<f64>, y: &Array1<f64>) -> Array1<f64> {
    let mu = x.dot(beta).mapv(|e| clip_eta(e).exp());
    x.t().dot(&(y - &mu))
}

/// Data bundle for [`PoissonRegression`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonData {
    x: Array2<f64>,
    y: Array1<f64>,
    ln_factorials: f64,
}

impl PoissonData {
    pub fn new(x: Array2<f64>, y: Array1<f64>) -> Self {
        let ln_factorials = y.iter().map(|&yi| ln_gamma(yi + 1.0)).sum();
        Self { x, y, ln_factorials }
    }
}

/// Log-linear Poisson model for the L-BFGS driver.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonRegression;

impl LogLikelihood for PoissonRegression {
    type Data = PoissonData;

    fn value(&self, theta: &Theta, data: &PoissonData) -> OptResult<f64> {
        let eta = data.x.dot(theta);
        if eta.iter().any(|e| e.is_nan()) {
            return Ok(f64::NEG_INFINITY);
        }
        let kernel: f64 = eta
            .iter()
            .zip(data.y.iter())
            .map(|(&e, &yi)| {
                let e = clip_eta(e);
                yi * e - e.exp()
            })
            .sum();
        Ok(kernel - data.ln_factorials)
    }

    fn check(&self, theta: &Theta, data: &PoissonData) -> OptResult<()> {
        validate_theta_input(theta, data.x.ncols())
    }

    fn grad(&self, theta: &Theta, data: &PoissonData) -> OptResult<Grad> {
        Ok(poisson_score(theta, &data.x, &data.y))
    }
}

/// Configuration for [`fit_poisson`].
#[derive(Debug, Clone, PartialEq)]
pub struct PoissonOptions {
    pub mle: MLEOptions,
    /// Starting coefficients in the caller's column units.
    pub theta0: Option<Array1<f64>>,
    pub scale_columns: bool,
    pub covariance: CovarianceMethod,
}

impl PoissonOptions {
    pub fn new(
        mle: MLEOptions, theta0: Option<Array1<f64>>, scale_columns: bool,
        covariance: CovarianceMethod,
    ) -> ModelResult<Self> {
        if let Some(theta) = &theta0 {
            validate_theta_input(theta, theta.len())?;
        }
        Ok(Self { mle, theta0, scale_columns, covariance })
    }
}

impl Default for PoissonOptions {
    fn default() -> Self {
        Self {
            mle: MLEOptions::default(),
            theta0: None,
            scale_columns: true,
            covariance: CovarianceMethod::Inverse,
        }
    }
}

/// Fit `Y ~ Poisson(exp(Xβ))` by maximum likelihood.
///
/// # Errors
/// - Outcome and shape validation errors from [`validate_counts`].
/// - [`ModelError::Underdetermined`] when `n < p`.
/// - [`ModelError::LengthMismatch`] for a `θ₀` of the wrong length.
/// - [`ModelError::Optimization`] for optimizer failures, including
///   non-convergence.
/// - [`ModelError::Inference`] when the finite-difference Hessian fails.
///   A singular information matrix is not an error: the fit is returned
///   with every standard error marked unstable.
pub fn fit_poisson(
    design: &DesignMatrix, y: &Array1<f64>, opts: &PoissonOptions,
) -> ModelResult<FittedModel> {
    validate_counts(y, design)?;
    if design.n_obs() < design.n_params() {
        return Err(ModelError::Underdetermined {
            n_obs: design.n_obs(),
            n_params: design.n_params(),
        });
    }

    let scales = if opts.scale_columns {
        column_scales(design.x().view())
    } else {
        Array1::ones(design.n_params())
    };
    let theta0 = match &opts.theta0 {
        Some(theta) if theta.len() != design.n_params() => {
            return Err(ModelError::LengthMismatch {
                expected: design.n_params(),
                found: theta.len(),
            });
        }
        Some(theta) => theta * &scales,
        None => default_start(design, y),
    };

    let data = PoissonData::new(scale_columns(design.x().view(), &scales), y.clone());
    let outcome = maximize(&PoissonRegression, theta0, &data, &opts.mle)?;

    let cost_grad = |theta: &Theta| -poisson_score(theta, &data.x, &data.y);
    let cov_scaled = covariance_or_unstable(
        calc_covariance(&cost_grad, &outcome.theta_hat, opts.covariance),
        design.n_params(),
        ModelKind::PoissonMle,
    )?;
    let beta = unscale_coefficients(&outcome.theta_hat, &scales);
    let covariance = unscale_covariance(&cov_scaled, &scales);
    let standard_errors = extract_standard_errors(&covariance)?;

    Ok(FittedModel::new(
        ModelKind::PoissonMle,
        design,
        beta,
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

/// Intercept-only Poisson fit `Y ~ Poisson(λ)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoissonRateFit {
    pub lambda: f64,
    pub loglik: f64,
    /// `sqrt(λ̂ / n)`, the inverse observed information at `λ̂`.
    pub std_error: f64,
    pub iterations: u64,
}

/// Fit a constant Poisson rate by a bounded Brent search over `λ`.
///
/// The bracket is `opts.bounds` when set, else `[1e-10, max(y) + 1]`.
///
/// # Errors
/// - [`ModelError::EmptyDesign`] for an empty sample.
/// - [`ModelError::InvalidOutcome`] for negative or fractional counts.
/// - [`ModelError::Optimization`] when the search fails or hits its cap.
pub fn fit_poisson_rate(y: &Array1<f64>, opts: &ScalarOptions) -> ModelResult<PoissonRateFit> {
    if y.is_empty() {
        return Err(ModelError::EmptyDesign);
    }
    if let Some((index, &value)) =
        y.iter().enumerate().find(|(_, v)| !v.is_finite() || **v < 0.0 || v.fract() != 0.0)
    {
        return Err(ModelError::InvalidOutcome {
            index,
            value,
            reason: "Count outcomes must be non-negative integers.",
        });
    }
    let max_y = y.iter().fold(0.0_f64, |acc, &v| acc.max(v));
    let bounds = opts.bounds.unwrap_or((RATE_LOWER, max_y + 1.0));

    let n = y.len();
    let objective = |lambda: f64| Ok(poisson_loglik_from_mean(y, &Array1::from_elem(n, lambda)));
    let outcome = maximize_scalar(objective, bounds, opts)?;
    let lambda = outcome.argmax;
    Ok(PoissonRateFit {
        lambda,
        loglik: outcome.value,
        std_error: (lambda / n as f64).sqrt(),
        iterations: outcome.iterations,
    })
}

// ---- Helper methods ----

/// `ln ȳ` on the intercept (when present and `ȳ > 0`), zero elsewhere.
fn default_start(design: &DesignMatrix, y: &Array1<f64>) -> Array1<f64> {
    let mut theta = Array1::zeros(design.n_params());
    let mean = y.mean().unwrap_or(0.0);
    if let Ok(idx) = design.column_index(INTERCEPT) {
        if mean > 0.0 {
            theta[idx] = mean.ln();
        }
    }
    theta
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The −∞ conventions of the evaluator and its behavior at huge |η|.
    // - λ̂ = ȳ on the Brent path and the L-BFGS intercept-only path.
    // - Input validation before any optimization.
    // -------------------------------------------------------------------------

    fn counts() -> Array1<f64> {
        array![1.0, 2.0, 3.0, 4.0, 0.0, 2.0, 5.0, 1.0]
    }

    fn intercept_only(n: usize) -> DesignMatrix {
        DesignMatrix::new(vec![INTERCEPT.into()], Array2::ones((n, 1))).expect("valid design")
    }

    #[test]
    // Purpose
    // -------
    // Zero, negative and NaN means make the likelihood −∞.
    fn loglik_from_mean_is_neg_infinity_outside_support() {
        let y = array![1.0, 2.0];
        assert_eq!(poisson_loglik_from_mean(&y, &array![0.0, 1.0]), f64::NEG_INFINITY);
        assert_eq!(poisson_loglik_from_mean(&y, &array![1.0, -2.0]), f64::NEG_INFINITY);
        assert_eq!(poisson_loglik_from_mean(&y, &array![f64::NAN, 1.0]), f64::NEG_INFINITY);
        assert!(poisson_loglik_from_mean(&y, &array![1.0, 2.0]).is_finite());
    }

    #[test]
    // Purpose
    // -------
    // Clipping keeps the evaluator finite for extreme coefficients.
    //
    // Given
    // -----
    // - β = ±1e6 on a single column of ones.
    //
    // Expect
    // ------
    // - Finite values; NaN β yields −∞.
    fn loglik_is_finite_for_huge_eta() {
        // Arrange
        let x = Array2::ones((3, 1));
        let y = array![0.0, 1.0, 2.0];

        // Act / Assert
        assert!(poisson_loglik(&array![1e6], &x, &y).is_finite());
        assert!(poisson_loglik(&array![-1e6], &x, &y).is_finite());
        assert_eq!(poisson_loglik(&array![f64::NAN], &x, &y), f64::NEG_INFINITY);
    }

    #[test]
    // Purpose
    // -------
    // The trait value matches the standalone evaluator and the analytic score
    // vanishes at the mean.
    fn regression_value_matches_evaluator() {
        // Arrange
        let y = counts();
        let x = Array2::ones((y.len(), 1));
        let data = PoissonData::new(x.clone(), y.clone());
        let beta = array![0.3];

        // Act
        let value = PoissonRegression.value(&beta, &data).expect("finite");
        let score_at_mean = poisson_score(&array![y.mean().expect("non-empty").ln()], &x, &y);

        // Assert
        assert_relative_eq!(value, poisson_loglik(&beta, &x, &y), epsilon = 1e-10);
        assert_abs_diff_eq!(score_at_mean[0], 0.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Brent rate fit returns the sample mean.
    //
    // Expect
    // ------
    // - λ̂ = 2.25 within 1e-4; SE = sqrt(λ̂ / n).
    fn fit_poisson_rate_matches_sample_mean() {
        // Arrange
        let y = counts();

        // Act
        let fit = fit_poisson_rate(&y, &ScalarOptions::default()).expect("rate fit converges");

        // Assert
        assert_abs_diff_eq!(fit.lambda, 2.25, epsilon = 1e-4);
        assert_relative_eq!(fit.std_error, (fit.lambda / 8.0).sqrt());
    }

    #[test]
    // Purpose
    // -------
    // L-BFGS intercept-only fit from θ₀ = 0 returns exp(β̂₀) = ȳ.
    fn intercept_only_mle_matches_sample_mean() {
        // Arrange
        let y = counts();
        let design = intercept_only(y.len());
        let opts = PoissonOptions { theta0: Some(array![0.0]), ..PoissonOptions::default() };

        // Act
        let fit = fit_poisson(&design, &y, &opts).expect("fit converges");

        // Assert
        assert_abs_diff_eq!(fit.beta()[0].exp(), 2.25, epsilon = 1e-4);
        let se = fit.standard_errors()[0].value().expect("stable se");
        // Var(β̂₀) = 1 / (n λ̂).
        assert_relative_eq!(se, (1.0 / (8.0 * 2.25_f64)).sqrt(), max_relative = 1e-3);
        assert_eq!(fit.kind(), ModelKind::PoissonMle);
    }

    #[test]
    // Purpose
    // -------
    // Bad inputs are rejected before the optimizer runs.
    fn fit_poisson_validates_inputs() {
        let design = intercept_only(3);
        let opts = PoissonOptions::default();

        assert!(matches!(
            fit_poisson(&design, &array![1.0, -1.0, 2.0], &opts),
            Err(ModelError::InvalidOutcome { index: 1, .. })
        ));
        assert!(matches!(
            fit_poisson(&design, &array![1.0, 2.5, 2.0], &opts),
            Err(ModelError::InvalidOutcome { index: 1, .. })
        ));
        let wrong_theta = PoissonOptions { theta0: Some(array![0.0, 1.0]), ..opts };
        assert_eq!(
            fit_poisson(&design, &array![1.0, 2.0, 2.0], &wrong_theta),
            Err(ModelError::LengthMismatch { expected: 1, found: 2 })
        );
        assert!(matches!(
            fit_poisson_rate(&Array1::zeros(0), &ScalarOptions::default()),
            Err(ModelError::EmptyDesign)
        ));
    }

    #[test]
    // Purpose
    // -------
    // A duplicated regressor leaves the information matrix singular, but the
    // converged estimates are still reported.
    //
    // Given
    // -----
    // - Design `[const, x, x_copy]` with `x_copy == x`.
    //
    // Expect
    // ------
    // - The fit succeeds with the reduced model's log-likelihood, and
    //   `β_x + β_copy` equals the reduced slope.
    // - The duplicated columns carry unstable (or unusably large) SEs.
    fn duplicated_column_keeps_estimates() {
        // Arrange
        let x: Vec<f64> = (0..12).map(|i| f64::from(i) / 4.0).collect();
        let y = array![0.0, 1.0, 1.0, 0.0, 2.0, 1.0, 3.0, 2.0, 4.0, 3.0, 5.0, 6.0];
        let reduced = DesignMatrix::new(
            vec![INTERCEPT.into(), "x".into()],
            Array2::from_shape_fn((12, 2), |(i, j)| if j == 0 { 1.0 } else { x[i] }),
        )
        .expect("valid design");
        let duplicated = DesignMatrix::new(
            vec![INTERCEPT.into(), "x".into(), "x_copy".into()],
            Array2::from_shape_fn((12, 3), |(i, j)| if j == 0 { 1.0 } else { x[i] }),
        )
        .expect("valid design");
        let opts = PoissonOptions::default();

        // Act
        let base = fit_poisson(&reduced, &y, &opts).expect("reduced fit");
        let fit = fit_poisson(&duplicated, &y, &opts).expect("singular information is not fatal");

        // Assert
        assert_abs_diff_eq!(fit.loglik(), base.loglik(), epsilon = 1e-6);
        assert_abs_diff_eq!(fit.beta()[1] + fit.beta()[2], base.beta()[1], epsilon = 1e-4);
        let base_se = base.standard_errors()[1].value().expect("regular fit");
        for se in &fit.standard_errors()[1..] {
            assert!(se.value().is_none_or(|v| v > 100.0 * base_se), "se {se:?}");
        }
    }
}
