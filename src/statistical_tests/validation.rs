//! statistical_tests::validation — shared input guards for test statistics.
//!
//! Purpose
//! -------
//! Centralize basic input validation for statistical test routines so the
//! checks on sample size and finiteness are written once.
//!
//! Invariants & assumptions
//! ------------------------
//! - Each sample must have length at least 2 to support an unbiased
//!   variance.
//! - All data values must be finite (`!NaN`, not ±∞).
//!
//! Conventions
//! -----------
//! - This module is purely about *validation*; it performs no I/O and does
//!   not allocate beyond what is required for error construction.
//! - Callers are responsible for any further test-specific checks (zero
//!   standard error, degrees of freedom).
//!
//! Testing notes
//! -------------
//! - Unit tests in this module cover both error branches of
//!   [`validate_sample`] and a simple success path.

use crate::statistical_tests::errors::{TestError, TestResult};

/// Validate one sample of a two-sample test.
///
/// Parameters
/// ----------
/// - `data`: `&[f64]`
///   Sample values. Must have length at least 2 and be finite.
/// - `sample`: `&'static str`
///   Label used in error messages (`"first"` / `"second"`).
///
/// Errors
/// ------
/// - `TestError::InsufficientData` when `data.len() < 2`.
/// - `TestError::InvalidData` at the first non-finite value.
pub fn validate_sample(data: &[f64], sample: &'static str) -> TestResult<()> {
    if data.len() < 2 {
        return Err(TestError::InsufficientData { sample, len: data.len() });
    }
    if let Some((index, &value)) = data.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(TestError::InvalidData { sample, index, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The insufficient-data branch.
    // - The non-finite value branch (NaN and ±∞).
    // - A simple success path.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Ensure a one-element sample is rejected.
    //
    // Expect
    // ------
    // - `Err(TestError::InsufficientData { sample: "first", len: 1 })`.
    fn validate_sample_rejects_single_value() {
        // Act
        let result = validate_sample(&[1.0], "first");

        // Assert
        assert_eq!(result, Err(TestError::InsufficientData { sample: "first", len: 1 }));
    }

    #[test]
    // Purpose
    // -------
    // Ensure non-finite entries are reported with their index.
    //
    // Given
    // -----
    // - [1.0, 2.0, +∞].
    //
    // Expect
    // ------
    // - `InvalidData { index: 2, .. }`.
    fn validate_sample_reports_first_non_finite_index() {
        // Act
        let result = validate_sample(&[1.0, 2.0, f64::INFINITY], "second");

        // Assert
        match result {
            Err(TestError::InvalidData { sample, index, value }) => {
                assert_eq!(sample, "second");
                assert_eq!(index, 2);
                assert!(value.is_infinite());
            }
            other => panic!("expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Accept a short, finite sample.
    fn validate_sample_accepts_valid_input() {
        assert!(validate_sample(&[0.0, -1.5, 3.0], "first").is_ok());
    }
}
