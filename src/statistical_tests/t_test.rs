//! Two-sample difference-in-means t-test.
//!
//! Purpose
//! -------
//! Compare the means of two independent samples with an unequal-variance
//! standard error and a Student-t reference distribution. This is the test
//! used for treatment/control balance checks and for comparing response
//! rates between arms.
//!
//! Key behaviors
//! -------------
//! - Computes each sample's mean and unbiased variance, the standard error
//!   `se = sqrt(v₁/n₁ + v₂/n₂)`, the statistic `t = (m₁ − m₂)/se` and a
//!   two-sided p-value.
//! - Degrees of freedom follow [`DfRule`]:
//!   - `MinSampleMinusOne` (default): `min(n₁, n₂) − 1`. This is a
//!     conservative simplification, kept so that published numbers
//!     replicate exactly.
//!   - `WelchSatterthwaite`: the usual Welch approximation.
//! - Identical means give `t = 0` and `p = 1` exactly, including the case
//!   where both samples are constant.
//!
//! Invariants & assumptions
//! ------------------------
//! - Both samples pass [`validate_sample`] (length ≥ 2, finite values).
//! - `p_value ∈ [0, 1]`.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the constant-sample identity, a hand-computed
//!   reference case, both degrees-of-freedom rules, the zero-standard-error
//!   failure, and confidence intervals.
use crate::statistical_tests::{
    errors::{TestError, TestResult},
    validation::validate_sample,
};
use statrs::distribution::{ContinuousCDF, StudentsT};

/// Degrees-of-freedom rule for the reference t distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DfRule {
    /// `min(n₁, n₂) − 1`.
    #[default]
    MinSampleMinusOne,
    /// Welch–Satterthwaite approximation.
    WelchSatterthwaite,
}

impl std::str::FromStr for DfRule {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "min" | "min-sample" => Ok(DfRule::MinSampleMinusOne),
            "welch" => Ok(DfRule::WelchSatterthwaite),
            other => Err(format!("unknown df rule '{other}' (use min or welch)")),
        }
    }
}

/// Configuration for [`TTestOutcome::two_sample`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TTestOptions {
    pub df_rule: DfRule,
}

impl TTestOptions {
    pub fn new(df_rule: DfRule) -> Self {
        Self { df_rule }
    }
}

/// TTestOutcome — summary of a two-sample t-test.
///
/// Fields
/// ------
/// - `mean_a`, `mean_b`: sample means.
/// - `var_a`, `var_b`: unbiased sample variances.
/// - `n_a`, `n_b`: sample sizes.
/// - `diff`: `mean_a − mean_b`.
/// - `se`: unequal-variance standard error of `diff`.
/// - `t_stat`, `df`, `p_value`: statistic, degrees of freedom and two-sided
///   p-value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TTestOutcome {
    pub mean_a: f64,
    pub mean_b: f64,
    pub var_a: f64,
    pub var_b: f64,
    pub n_a: usize,
    pub n_b: usize,
    pub diff: f64,
    pub se: f64,
    pub t_stat: f64,
    pub df: f64,
    pub p_value: f64,
}

impl TTestOutcome {
    /// Run the two-sample test on `a` (first) and `b` (second).
    ///
    /// Errors
    /// ------
    /// - `TestError::InsufficientData` / `TestError::InvalidData` from input
    ///   validation.
    /// - `TestError::ZeroStandardError` when the means differ but `se = 0`.
    /// - `TestError::InvalidDegreesOfFreedom` if the reference distribution
    ///   cannot be built.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// use replication_stats::statistical_tests::t_test::{TTestOptions, TTestOutcome};
    ///
    /// let a = vec![5.0; 30];
    /// let b = vec![5.0; 30];
    /// let out = TTestOutcome::two_sample(&a, &b, &TTestOptions::default()).unwrap();
    /// assert_eq!(out.t_stat, 0.0);
    /// assert_eq!(out.p_value, 1.0);
    /// ```
    pub fn two_sample(a: &[f64], b: &[f64], opts: &TTestOptions) -> TestResult<Self> {
        validate_sample(a, "first")?;
        validate_sample(b, "second")?;
        let (mean_a, var_a) = mean_and_variance(a);
        let (mean_b, var_b) = mean_and_variance(b);
        let (n_a, n_b) = (a.len(), b.len());
        let (qa, qb) = (var_a / n_a as f64, var_b / n_b as f64);
        let se = (qa + qb).sqrt();
        let diff = mean_a - mean_b;

        let df = match opts.df_rule {
            DfRule::MinSampleMinusOne => (n_a.min(n_b) - 1) as f64,
            DfRule::WelchSatterthwaite if se > 0.0 => {
                (qa + qb).powi(2) / (qa * qa / (n_a - 1) as f64 + qb * qb / (n_b - 1) as f64)
            }
            DfRule::WelchSatterthwaite => (n_a + n_b - 2) as f64,
        };

        if diff == 0.0 {
            return Ok(Self {
                mean_a, mean_b, var_a, var_b, n_a, n_b, diff, se, t_stat: 0.0, df, p_value: 1.0,
            });
        }
        if se == 0.0 {
            return Err(TestError::ZeroStandardError { diff });
        }

        let t_stat = diff / se;
        let dist = reference_distribution(df)?;
        let p_value = (2.0 * (1.0 - dist.cdf(t_stat.abs()))).clamp(0.0, 1.0);
        Ok(Self { mean_a, mean_b, var_a, var_b, n_a, n_b, diff, se, t_stat, df, p_value })
    }

    /// Two-sided confidence interval for `mean_a − mean_b` at `level`.
    ///
    /// Errors
    /// ------
    /// - `TestError::InvalidLevel` unless `0 < level < 1`.
    pub fn confidence_interval(&self, level: f64) -> TestResult<(f64, f64)> {
        if !(level > 0.0 && level < 1.0) {
            return Err(TestError::InvalidLevel { level });
        }
        let dist = reference_distribution(self.df)?;
        let crit = dist.inverse_cdf(0.5 + level / 2.0);
        Ok((self.diff - crit * self.se, self.diff + crit * self.se))
    }
}

//
// ---------- Private helpers ----------
//

/// Mean and unbiased variance of a validated sample (`len ≥ 2`).
fn mean_and_variance(data: &[f64]) -> (f64, f64) {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    let ss: f64 = data.iter().map(|x| (x - mean) * (x - mean)).sum();
    (mean, ss / (n - 1.0))
}

fn reference_distribution(df: f64) -> TestResult<StudentsT> {
    StudentsT::new(0.0, 1.0, df).map_err(|_| TestError::InvalidDegreesOfFreedom { df })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The identical-means identity (t = 0, p = 1).
    // - Hand-computed statistics for a small example.
    // - Both degrees-of-freedom rules.
    // - The zero-standard-error failure and confidence intervals.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Two constant samples with equal means give exactly t = 0, p = 1.
    //
    // Given
    // -----
    // - Both samples are thirty copies of 5.0.
    //
    // Expect
    // ------
    // - `t_stat == 0.0`, `p_value == 1.0`, `se == 0.0`, `df == 29`.
    fn constant_identical_samples_give_zero_t_and_unit_p() {
        // Arrange
        let a = vec![5.0; 30];
        let b = vec![5.0; 30];

        // Act
        let out = TTestOutcome::two_sample(&a, &b, &TTestOptions::default()).expect("valid test");

        // Assert
        assert_eq!(out.t_stat, 0.0);
        assert_eq!(out.p_value, 1.0);
        assert_eq!(out.se, 0.0);
        assert_eq!(out.df, 29.0);
    }

    #[test]
    // Purpose
    // -------
    // Check the statistic against a hand computation.
    //
    // Given
    // -----
    // - a = [1, 2, 3, 4] (mean 2.5, var 5/3), b = [2, 4, 6] (mean 4, var 4).
    //
    // Expect
    // ------
    // - diff = -1.5, se = sqrt(5/12 + 4/3), df = 2 under the default rule,
    //   0 < p < 1.
    fn two_sample_matches_hand_computation() {
        // Arrange
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [2.0, 4.0, 6.0];

        // Act
        let out = TTestOutcome::two_sample(&a, &b, &TTestOptions::default()).expect("valid test");

        // Assert
        let se = (5.0 / 12.0 + 4.0 / 3.0_f64).sqrt();
        assert_abs_diff_eq!(out.diff, -1.5, epsilon = 1e-12);
        assert_abs_diff_eq!(out.se, se, epsilon = 1e-12);
        assert_abs_diff_eq!(out.t_stat, -1.5 / se, epsilon = 1e-12);
        assert_eq!(out.df, 2.0);
        assert!(out.p_value > 0.0 && out.p_value < 1.0);
    }

    #[test]
    // Purpose
    // -------
    // Welch degrees of freedom exceed the conservative rule, giving a
    // smaller p-value for the same statistic.
    fn welch_rule_is_less_conservative() {
        // Arrange
        let a: Vec<f64> = (0..20).map(|i| i as f64 * 0.5).collect();
        let b: Vec<f64> = (0..40).map(|i| 2.0 + i as f64 * 0.3).collect();

        // Act
        let min_rule = TTestOutcome::two_sample(&a, &b, &TTestOptions::default()).expect("valid");
        let welch = TTestOutcome::two_sample(&a, &b, &TTestOptions::new(DfRule::WelchSatterthwaite))
            .expect("valid");

        // Assert
        assert_eq!(min_rule.df, 19.0);
        assert!(welch.df > min_rule.df);
        assert_abs_diff_eq!(welch.t_stat, min_rule.t_stat, epsilon = 1e-12);
        assert!(welch.p_value < min_rule.p_value);
    }

    #[test]
    // Purpose
    // -------
    // Constant samples with different means cannot produce a statistic.
    //
    // Expect
    // ------
    // - `Err(TestError::ZeroStandardError { diff: -1.0 })`.
    fn constant_samples_with_different_means_fail() {
        // Act
        let result = TTestOutcome::two_sample(&[1.0, 1.0], &[2.0, 2.0, 2.0], &TTestOptions::default());

        // Assert
        assert_eq!(result, Err(TestError::ZeroStandardError { diff: -1.0 }));
    }

    #[test]
    // Purpose
    // -------
    // The confidence interval is centred on the difference and rejects
    // invalid levels.
    fn confidence_interval_is_symmetric_about_difference() {
        // Arrange
        let out = TTestOutcome::two_sample(
            &[1.0, 2.0, 3.0, 4.0, 5.0],
            &[2.0, 3.0, 5.0, 7.0],
            &TTestOptions::default(),
        )
        .expect("valid");

        // Act
        let (lo, hi) = out.confidence_interval(0.95).expect("valid level");

        // Assert
        assert_abs_diff_eq!((lo + hi) / 2.0, out.diff, epsilon = 1e-10);
        assert!(lo < out.diff && out.diff < hi);
        assert_eq!(out.confidence_interval(1.0), Err(TestError::InvalidLevel { level: 1.0 }));
    }
}
