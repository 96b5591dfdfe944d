//! models::ols — ordinary least squares with classical standard errors.
//!
//! Coefficients come from an SVD solve (nalgebra), which stays accurate for
//! ill-conditioned but full-rank designs. Standard errors are
//! `sqrt(diag(σ̂²(XᵀX)⁻¹))` with `σ̂² = RSS/(n − p)`; t statistics use
//! Student-t p-values on `n − p` degrees of freedom.
use nalgebra::{DMatrix, DVector};
use ndarray::{Array1, Array2};
use statrs::distribution::{ContinuousCDF, StudentsT};

use crate::{
    inference::{
        hessian::{CovarianceMethod, covariance_from_information},
        standard_errors::{StandardError, extract_standard_errors},
    },
    models::{
        design::{DesignMatrix, validate_outcome},
        errors::{ModelError, ModelResult},
        fitted::CoefficientRow,
    },
    optimization::numerical_stability::GENERAL_TOL,
};

/// Result of an OLS fit.
#[derive(Debug, Clone, PartialEq)]
pub struct OlsFit {
    names: Vec<String>,
    beta: Array1<f64>,
    covariance: Array2<f64>,
    standard_errors: Vec<StandardError>,
    fitted: Array1<f64>,
    sigma2: f64,
    r_squared: f64,
    adj_r_squared: f64,
    df_resid: usize,
}

impl OlsFit {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn beta(&self) -> &Array1<f64> {
        &self.beta
    }

    pub fn covariance(&self) -> &Array2<f64> {
        &self.covariance
    }

    pub fn standard_errors(&self) -> &[StandardError] {
        &self.standard_errors
    }

    pub fn fitted_values(&self) -> &Array1<f64> {
        &self.fitted
    }

    /// Residual variance `RSS/(n − p)`.
    pub fn sigma2(&self) -> f64 {
        self.sigma2
    }

    /// `1 − RSS/TSS`; `NaN` when the outcome is constant.
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    pub fn adj_r_squared(&self) -> f64 {
        self.adj_r_squared
    }

    pub fn df_resid(&self) -> usize {
        self.df_resid
    }

    /// Coefficient for `name`.
    pub fn coefficient(&self, name: &str) -> ModelResult<f64> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|i| self.beta[i])
            .ok_or_else(|| ModelError::UnknownColumn { column: name.to_string() })
    }

    /// Coefficient table with t statistics and Student-t p-values.
    pub fn coefficient_table(&self) -> Vec<CoefficientRow> {
        let dist = StudentsT::new(0.0, 1.0, self.df_resid as f64).ok();
        self.names
            .iter()
            .zip(self.beta.iter())
            .zip(&self.standard_errors)
            .map(|((name, &estimate), se)| {
                let statistic = se.value().filter(|s| *s > 0.0).map(|s| estimate / s);
                let p_value = statistic
                    .zip(dist.as_ref())
                    .map(|(t, d)| 2.0 * (1.0 - d.cdf(t.abs())));
                CoefficientRow { name: name.clone(), estimate, std_error: *se, statistic, p_value }
            })
            .collect()
    }
}

/// Fit `y = Xβ + ε` by least squares.
///
/// # Errors
/// - [`ModelError::LengthMismatch`] / [`ModelError::InvalidOutcome`] for a
///   bad outcome vector.
/// - [`ModelError::Underdetermined`] unless `n > p`.
/// - [`ModelError::SingularDesign`] for a rank-deficient design.
pub fn fit_ols(design: &DesignMatrix, y: &Array1<f64>) -> ModelResult<OlsFit> {
    validate_outcome(y, design)?;
    let (n, p) = (design.n_obs(), design.n_params());
    if n <= p {
        return Err(ModelError::Underdetermined { n_obs: n, n_params: p });
    }
    let x = design.x();

    let a = DMatrix::from_fn(n, p, |i, j| x[[i, j]]);
    let b = DVector::from_iterator(n, y.iter().copied());
    let svd = a.svd(true, true);
    let max_sv = svd.singular_values.max();
    let min_sv = svd.singular_values.min();
    if max_sv <= 0.0 || min_sv <= max_sv * f64::EPSILON * (n.max(p) as f64) {
        return Err(ModelError::SingularDesign);
    }
    let sol = svd.solve(&b, GENERAL_TOL * max_sv).map_err(|_| ModelError::SingularDesign)?;
    let beta = Array1::from_iter(sol.iter().copied());

    let fitted = x.dot(&beta);
    let resid = y - &fitted;
    let rss = resid.dot(&resid);
    let df_resid = n - p;
    let sigma2 = rss / df_resid as f64;

    let xtx = x.t().dot(x);
    let covariance = covariance_from_information(&xtx, CovarianceMethod::Inverse)
        .map_err(|_| ModelError::SingularDesign)?
        * sigma2;
    let standard_errors = extract_standard_errors(&covariance)?;

    let mean = y.mean().unwrap_or(0.0);
    let tss = y.iter().map(|v| (v - mean).powi(2)).sum::<f64>();
    let (r_squared, adj_r_squared) = if tss <= GENERAL_TOL {
        (f64::NAN, f64::NAN)
    } else {
        let r2 = 1.0 - rss / tss;
        (r2, 1.0 - (1.0 - r2) * (n as f64 - 1.0) / df_resid as f64)
    };

    Ok(OlsFit {
        names: design.names().to_vec(),
        beta,
        covariance,
        standard_errors,
        fitted,
        sigma2,
        r_squared,
        adj_r_squared,
        df_resid,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::design::INTERCEPT;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use ndarray::array;

    fn design(xs: &[f64]) -> DesignMatrix {
        let x = Array2::from_shape_fn((xs.len(), 2), |(i, j)| if j == 0 { 1.0 } else { xs[i] });
        DesignMatrix::new(vec![INTERCEPT.into(), "x".into()], x).expect("valid design")
    }

    #[test]
    // Purpose
    // -------
    // Exact linear data is recovered with R² = 1.
    //
    // Given
    // -----
    // - y = 2 + 3x on five points.
    //
    // Expect
    // ------
    // - β = (2, 3), R² = 1, zero residual variance.
    fn ols_recovers_exact_linear_data() {
        // Arrange
        let xs = [0.0, 1.0, 2.0, 3.0, 4.0];
        let y = Array1::from_iter(xs.iter().map(|x| 2.0 + 3.0 * x));

        // Act
        let fit = fit_ols(&design(&xs), &y).expect("full-rank design");

        // Assert
        assert_abs_diff_eq!(fit.beta()[0], 2.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.beta()[1], 3.0, epsilon = 1e-10);
        assert_abs_diff_eq!(fit.r_squared(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(fit.sigma2(), 0.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Classical SEs and t statistics on noisy data.
    //
    // Given
    // -----
    // - x = 0..4, y = (1, 3, 2, 5, 4): β̂ = (1.4, 0.8), RSS = 3.6.
    //
    // Expect
    // ------
    // - σ̂² = 1.2, se(β̂₁) = sqrt(1.2/10), R² = 6.4/10.
    fn ols_classical_standard_errors() {
        // Arrange
        let y = array![1.0, 3.0, 2.0, 5.0, 4.0];

        // Act
        let fit = fit_ols(&design(&[0.0, 1.0, 2.0, 3.0, 4.0]), &y).expect("full-rank design");
        let table = fit.coefficient_table();

        // Assert
        assert_relative_eq!(fit.beta()[1], 0.8, epsilon = 1e-10);
        assert_relative_eq!(fit.sigma2(), 1.2, epsilon = 1e-10);
        let se = fit.standard_errors()[1].value().expect("stable");
        assert_relative_eq!(se, (0.12_f64).sqrt(), epsilon = 1e-10);
        assert_relative_eq!(fit.r_squared(), 0.64, epsilon = 1e-10);
        let p = table[1].p_value.expect("positive se");
        assert!(p > 0.05 && p < 0.2);
    }

    #[test]
    // Purpose
    // -------
    // Collinear columns and too few rows are rejected.
    fn ols_rejects_degenerate_designs() {
        let x = array![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0]];
        let d = DesignMatrix::new(vec!["a".into(), "b".into()], x).expect("valid");
        assert_eq!(fit_ols(&d, &array![1.0, 2.0, 3.0]), Err(ModelError::SingularDesign));

        let small = design(&[0.0, 1.0]);
        assert!(matches!(
            fit_ols(&small, &array![1.0, 2.0]),
            Err(ModelError::Underdetermined { n_obs: 2, n_params: 2 })
        ));
    }
}
