//! statistical_tests — hypothesis tests and their shared helpers.
//!
//! Purpose
//! -------
//! Collect statistical-test routines and their shared infrastructure. This
//! subtree implements the two-sample difference-in-means t-test used by the
//! field-experiment analysis, together with input validation and error
//! handling.
//!
//! Key behaviors
//! -------------
//! - Expose the two-sample test via [`TTestOutcome`] and its constructor
//!   [`TTestOutcome::two_sample`](t_test::TTestOutcome::two_sample), with
//!   the degrees-of-freedom rule chosen through [`TTestOptions`].
//! - Centralize input guards in [`validate_sample`].
//! - Provide a dedicated error type [`TestError`] and result alias
//!   [`TestResult`].
//!
//! Invariants & assumptions
//! ------------------------
//! - Statistical tests in this subtree report failures via [`TestResult`]
//!   and never panic on user-facing invalid inputs.
//!
//! Conventions
//! -----------
//! - Model-specific error types live in their own `errors` modules under
//!   the relevant subtrees.
//! - The default degrees-of-freedom rule is `min(n₁, n₂) − 1`; the
//!   Welch–Satterthwaite rule is opt-in.
//!
//! Downstream usage
//! ----------------
//! - `analysis::charity` runs the test for balance checks (`mrm2`) and
//!   for treatment/control comparisons of `gave` and `amount`.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`errors`], [`validation`] and [`t_test`] cover message
//!   payloads, every validation branch, and the numerical identities of the
//!   test.

pub mod errors;
pub mod t_test;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::errors::{TestError, TestResult};
pub use self::t_test::{DfRule, TTestOptions, TTestOutcome};
pub use self::validation::validate_sample;

pub mod prelude {
    pub use super::errors::{TestError, TestResult};
    pub use super::t_test::{DfRule, TTestOptions, TTestOutcome};
}
