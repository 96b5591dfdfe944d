//! models — estimators for count, continuous and binary outcomes.
//!
//! Purpose
//! -------
//! Fit the regression models used by the analyses on a named
//! [`DesignMatrix`] and an outcome vector, and derive model-based effects
//! from the fitted coefficients.
//!
//! Key behaviors
//! -------------
//! - [`poisson`]: Poisson regression by L-BFGS maximum likelihood with an
//!   analytic score, plus a Brent-search rate fit for the intercept-only
//!   case.
//! - [`glm`]: the same Poisson model fitted by IRLS; used to cross-check
//!   the hand-rolled likelihood.
//! - [`ols`]: least squares with classical standard errors and R².
//! - [`probit`]: probit MLE with average and at-means marginal effects.
//! - [`counterfactual`]: predicted-mean differences when an indicator is
//!   switched from 0 to 1 for every row.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every estimator is a pure function of `(X, Y, options)`; results are
//!   immutable once returned.
//! - Non-convergence and singular information are errors. Unusable
//!   per-coefficient variances are reported as
//!   [`StandardError::Unstable`](crate::inference::StandardError::Unstable).
//!
//! Conventions
//! -----------
//! - Coefficients, covariances and tables follow the design's column order.
//! - Errors are [`ModelError`] / [`ModelResult`].

pub mod counterfactual;
pub mod design;
pub mod errors;
pub mod fitted;
pub mod glm;
pub mod ols;
pub mod poisson;
pub mod probit;

pub use self::counterfactual::{CounterfactualEffect, counterfactual_from_designs, indicator_effect};
pub use self::design::{DesignMatrix, INTERCEPT};
pub use self::errors::{ModelError, ModelResult};
pub use self::fitted::{CoefficientRow, FitDiagnostics, FittedModel, ModelKind};
pub use self::glm::{IrlsOptions, fit_poisson_glm, poisson_deviance};
pub use self::ols::{OlsFit, fit_ols};
pub use self::poisson::{
    PoissonOptions, PoissonRateFit, fit_poisson, fit_poisson_rate, poisson_loglik,
    poisson_loglik_from_mean, poisson_score,
};
pub use self::probit::{MarginalEffect, ProbitOptions, fit_probit, marginal_effects};
