//! replication_stats — estimators and pipelines for two econometric replications.
//!
//! Purpose
//! -------
//! Reproduce the numeric results of (a) the matching-grant charitable-giving
//! experiment and (b) the patent-count and Airbnb review-count studies: load
//! a CSV table, derive features, fit t-tests, OLS, probit and Poisson models,
//! run the LLN/CLT simulations, and render a plain-text report.
//!
//! Key behaviors
//! -------------
//! - [`data`]: CSV loading into a typed column table and design-matrix
//!   assembly with missing-row accounting.
//! - [`models`]: Poisson MLE (L-BFGS) and GLM (IRLS), OLS, probit, and
//!   counterfactual predictions.
//! - [`optimization`]: the likelihood-maximization driver (argmin L-BFGS,
//!   Brent search for the one-parameter case) and numerical guards.
//! - [`inference`]: covariance from observed information and
//!   per-coefficient standard errors.
//! - [`statistical_tests`]: two-sample t-tests.
//! - [`simulation`]: seeded Monte-Carlo experiments and synthetic data.
//! - [`report`] and [`analysis`]: formatting and the end-to-end studies.
//!
//! Invariants & assumptions
//! ------------------------
//! - Computation is single-threaded and synchronous; estimators do no I/O.
//! - Non-convergence is always an error, never a silent result.
//! - Randomness is seeded explicitly, so runs are reproducible.
//!
//! Conventions
//! -----------
//! - Each subtree defines its own error enum and `Result` alias; the binary
//!   wraps them with `anyhow`.
//! - Library code logs through the `log` facade at stage boundaries only.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside the code; end-to-end pipelines are covered in
//!   `tests/`.

pub mod analysis;
pub mod data;
pub mod inference;
pub mod models;
pub mod optimization;
pub mod report;
pub mod simulation;
pub mod statistical_tests;
