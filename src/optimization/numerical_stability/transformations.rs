//! Numerical stability utilities.
//!
//! Provides guarded versions of the nonlinear maps used by the count and
//! binary-outcome likelihoods, together with the column-scaling transform
//! applied before optimization.
//!
//! # Provided items
//! - [`ETA_BOUND`] and [`clip_linear_predictor`]: keep `exp(η)` inside the
//!   representable `f64` range.
//! - [`PROB_EPS`] and [`clamp_probability`]: keep `ln p` and `ln(1 - p)`
//!   finite in the probit likelihood.
//! - [`std_normal_cdf`] / [`std_normal_pdf`]: the standard-normal link and
//!   its density, computed through `erfc` for accurate tails.
//! - [`column_scales`], [`unscale_coefficients`], [`unscale_covariance`]:
//!   diagonal reparameterization `β = D⁻¹ β̃` and the matching covariance
//!   map `Σ = D⁻¹ Σ̃ D⁻¹`.
use ndarray::{Array1, Array2, ArrayView2, Axis};
use statrs::function::erf::erfc;
use std::f64::consts::{FRAC_1_SQRT_2, PI};

/// Bound applied to the linear predictor before exponentiating.
///
/// `exp(±100)` is about `2.7e±43`, comfortably inside `f64` range.
pub const ETA_BOUND: f64 = 100.0;

/// Probability clamp for the probit likelihood: `p ∈ [PROB_EPS, 1 − PROB_EPS]`.
pub const PROB_EPS: f64 = 1e-12;

/// Eigenvalues at or below this threshold are treated as zero when
/// building pseudo-inverses.
pub const EIGEN_EPS: f64 = 1e-10;

/// Cost reported to the line search for a parameter outside the model's
/// domain (non-finite log-likelihood).
///
/// Finite so that the line-search interpolation stays well defined, and
/// far above any attainable cost so the step is always cut back.
pub const INVALID_COST: f64 = 1e150;

/// Generic comparison tolerance for "numerically zero" quantities.
pub const GENERAL_TOL: f64 = 1e-12;

/// Clip a single linear-predictor value to `[-ETA_BOUND, ETA_BOUND]`.
///
/// `NaN` is passed through unchanged so the caller can detect it.
pub fn clip_eta(eta: f64) -> f64 {
    if eta.is_nan() { eta } else { eta.clamp(-ETA_BOUND, ETA_BOUND) }
}

/// Clip every entry of `eta` in place. See [`clip_eta`].
pub fn clip_linear_predictor(eta: &mut Array1<f64>) {
    eta.mapv_inplace(clip_eta);
}

/// Clamp a probability to `[PROB_EPS, 1 − PROB_EPS]`.
pub fn clamp_probability(p: f64) -> f64 {
    p.clamp(PROB_EPS, 1.0 - PROB_EPS)
}

/// Standard-normal CDF `Φ(x) = ½ erfc(−x/√2)`.
pub fn std_normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x * FRAC_1_SQRT_2)
}

/// Standard-normal density `φ(x)`.
pub fn std_normal_pdf(x: f64) -> f64 {
    (-0.5 * x * x).exp() / (2.0 * PI).sqrt()
}

/// Per-column scale factors for optimizer conditioning.
///
/// Returns `max |x_ij|` over rows for columns that vary, and `1.0` for
/// constant or all-zero columns (the intercept keeps its units).
pub fn column_scales(x: ArrayView2<'_, f64>) -> Array1<f64> {
    x.axis_iter(Axis(1))
        .map(|col| {
            let first = col.first().copied().unwrap_or(0.0);
            let constant = col.iter().all(|&v| (v - first).abs() <= GENERAL_TOL);
            let max_abs = col.iter().fold(0.0_f64, |acc, &v| acc.max(v.abs()));
            if constant || max_abs <= GENERAL_TOL || !max_abs.is_finite() { 1.0 } else { max_abs }
        })
        .collect()
}

/// Divide each column of `x` by its scale, returning a new matrix.
pub fn scale_columns(x: ArrayView2<'_, f64>, scales: &Array1<f64>) -> Array2<f64> {
    let mut scaled = x.to_owned();
    for (mut col, &s) in scaled.axis_iter_mut(Axis(1)).zip(scales.iter()) {
        col.mapv_inplace(|v| v / s);
    }
    scaled
}

/// Map coefficients fitted on scaled columns back to original units.
///
/// With `x̃_j = x_j / s_j`, `x̃ β̃ = x β` gives `β_j = β̃_j / s_j`.
pub fn unscale_coefficients(beta_scaled: &Array1<f64>, scales: &Array1<f64>) -> Array1<f64> {
    beta_scaled / scales
}

/// Delta-method covariance for the diagonal map `β = D⁻¹ β̃`.
///
/// The Jacobian is `D⁻¹`, so `Σ_ij = Σ̃_ij / (s_i s_j)`.
pub fn unscale_covariance(cov_scaled: &Array2<f64>, scales: &Array1<f64>) -> Array2<f64> {
    let mut cov = cov_scaled.clone();
    for ((i, j), v) in cov.indexed_iter_mut() {
        *v /= scales[i] * scales[j];
    }
    cov
}
