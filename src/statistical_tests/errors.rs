//! statistical_tests::errors — shared error types for hypothesis tests.
//!
//! Purpose
//! -------
//! Provide the error enum and result alias for statistical test routines so
//! that validation and runtime failures stay local to this subtree.
//!
//! Key behaviors
//! -------------
//! - Define [`TestResult`] and [`TestError`] as the canonical result and
//!   error types for the two-sample test and its validation helpers.
//! - Attach human-readable `Display` messages to each variant so that
//!   report sections can print the failure reason verbatim.
//!
//! Conventions
//! -----------
//! - Samples are identified by the labels `"first"` and `"second"` in
//!   argument order.
//! - Error messages are phrased in terms of domain constraints ("needs at
//!   least 2 observations") rather than low-level details.
//!
//! Testing notes
//! -------------
//! - Unit tests verify that each variant's `Display` message embeds its
//!   payload.

pub type TestResult<T> = Result<T, TestError>;

/// TestError — error conditions for two-sample tests.
///
/// Variants
/// --------
/// - `InsufficientData { sample, len }`
///   A sample has fewer than two values, so its unbiased variance is
///   undefined.
/// - `InvalidData { sample, index, value }`
///   A sample element is non-finite.
/// - `ZeroStandardError { diff }`
///   The means differ but both samples are constant, so `t` is unbounded.
/// - `InvalidDegreesOfFreedom { df }`
///   The Student-t reference distribution could not be built.
/// - `InvalidLevel { level }`
///   A confidence level outside `(0, 1)`.
#[derive(Debug, Clone, PartialEq)]
pub enum TestError {
    //------ Input validation errors ------
    InsufficientData { sample: &'static str, len: usize },
    InvalidData { sample: &'static str, index: usize, value: f64 },
    InvalidLevel { level: f64 },

    //------ Computation errors ------
    ZeroStandardError { diff: f64 },
    InvalidDegreesOfFreedom { df: f64 },
}

impl std::error::Error for TestError {}

impl std::fmt::Display for TestError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TestError::InsufficientData { sample, len } => {
                write!(f, "The {sample} sample has {len} values; at least 2 are required.")
            }
            TestError::InvalidData { sample, index, value } => {
                write!(f, "Invalid value {value} at index {index} of the {sample} sample. Must be finite.")
            }
            TestError::InvalidLevel { level } => {
                write!(f, "Invalid confidence level {level}. Must lie strictly between 0 and 1.")
            }
            TestError::ZeroStandardError { diff } => write!(
                f,
                "Zero standard error with a non-zero mean difference ({diff}); both samples are constant."
            ),
            TestError::InvalidDegreesOfFreedom { df } => {
                write!(f, "Invalid degrees of freedom {df} for the Student-t distribution.")
            }
        }
    }
}
