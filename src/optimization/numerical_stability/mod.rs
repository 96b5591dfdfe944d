//! numerical_stability — guarded transforms and shared numeric tolerances.
//!
//! Purpose
//! -------
//! Collect the small numerical guards used by the likelihood evaluators and
//! the covariance code, so that every model clips, clamps and rescales the
//! same way.
//!
//! Key behaviors
//! -------------
//! - Clip the Poisson linear predictor to `[-ETA_BOUND, ETA_BOUND]` before
//!   exponentiating (`clip_eta`, `clip_linear_predictor`).
//! - Evaluate the standard-normal link and density through `erfc`
//!   (`std_normal_cdf`, `std_normal_pdf`) and clamp probabilities away from
//!   0 and 1 (`clamp_probability`).
//! - Rescale design columns before optimization and map coefficients and
//!   covariance back afterwards (`column_scales`, `scale_columns`,
//!   `unscale_coefficients`, `unscale_covariance`).
//! - Centralize tolerances (`ETA_BOUND`, `PROB_EPS`, `EIGEN_EPS`,
//!   `GENERAL_TOL`).
//!
//! Invariants & assumptions
//! ------------------------
//! - Scale factors are strictly positive and finite; constant columns keep
//!   a scale of `1.0`.
//! - `clip_eta` never turns a `NaN` into a finite number, so invalid
//!   coefficient vectors stay detectable downstream.
//!
//! Conventions
//! -----------
//! - Pure helpers; no logging, no I/O.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`transformations`] pin the clipping bounds, the normal
//!   reference values, and the scaling round-trip.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{
    EIGEN_EPS, ETA_BOUND, GENERAL_TOL, INVALID_COST, PROB_EPS, clamp_probability, clip_eta,
    clip_linear_predictor, column_scales, scale_columns, std_normal_cdf, std_normal_pdf,
    unscale_coefficients, unscale_covariance,
};

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, ETA_BOUND, GENERAL_TOL, PROB_EPS, clip_linear_predictor, std_normal_cdf,
        std_normal_pdf,
    };
}
