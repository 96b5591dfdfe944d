//! analysis::patents — patent counts and software-customer status.
//!
//! Purpose
//! -------
//! Relate firms' patent counts to customer status while controlling for age
//! and region, using the Poisson likelihood directly and through the GLM
//! solver, and translate the customer coefficient into a predicted-count
//! difference.
//!
//! Key behaviors
//! -------------
//! - Descriptive comparison: t-test of patent counts and firm age by
//!   customer status, plus region counts per group.
//! - Intercept-only rate fit by Brent search and by L-BFGS; both must equal
//!   the sample mean.
//! - Full model `[const, age, age_sq, region dummies, iscustomer]` fitted by
//!   MLE and by IRLS; the report shows the largest coefficient gap.
//! - Counterfactual: every firm as non-customer vs as customer.
//!
//! Conventions
//! -----------
//! - Region dummies drop the first level in sorted order.
//! - Required columns: `patents`, `age`, `region`, `iscustomer`.
use log::info;
use ndarray::{Array1, Array2, array};

use crate::{
    analysis::{
        AnalysisOptions, AnalysisReport, max_abs_difference,
        charity::group_values,
        errors::{AnalysisError, AnalysisResult},
    },
    data::{
        features::{DesignSpec, ModelFrame, Term, build_model_frame},
        table::Table,
    },
    models::{
        counterfactual::{CounterfactualEffect, indicator_effect},
        design::{DesignMatrix, INTERCEPT},
        fitted::FittedModel,
        glm::fit_poisson_glm,
        poisson::{PoissonOptions, PoissonRateFit, fit_poisson, fit_poisson_rate},
    },
    report::{
        export::CoefficientTable,
        format::{format_counterfactual, format_fitted_model, format_rate_fit, format_ttest},
    },
    statistical_tests::t_test::{TTestOptions, TTestOutcome},
};

pub const REQUIRED_COLUMNS: [&str; 4] = ["patents", "age", "region", "iscustomer"];
/// Name of the customer indicator.
pub const CUSTOMER: &str = "iscustomer";

/// Customer vs non-customer descriptive comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerProfile {
    pub patents: TTestOutcome,
    pub age: TTestOutcome,
    /// `(region, customers, non-customers)` in sorted region order.
    pub region_counts: Vec<(String, usize, usize)>,
}

/// Intercept-only fits on both solver paths.
#[derive(Debug, Clone, PartialEq)]
pub struct RateFits {
    pub sample_mean: f64,
    pub brent: PoissonRateFit,
    /// `exp(β̂₀)` from the L-BFGS intercept-only fit.
    pub lbfgs_rate: f64,
}

/// MLE and GLM fits of the same count model.
#[derive(Debug, Clone, PartialEq)]
pub struct CountModelFits {
    pub outcome: String,
    pub frame: ModelFrame,
    pub mle: FittedModel,
    pub glm: FittedModel,
}

impl CountModelFits {
    /// Largest absolute coefficient difference between the two solvers.
    pub fn max_coefficient_gap(&self) -> f64 {
        max_abs_difference(self.mle.beta(), self.glm.beta())
    }

    /// Coefficient tables of both fits, labeled `{solver} for {outcome}`.
    pub fn coefficient_tables(&self) -> Vec<CoefficientTable> {
        let outcome = &self.outcome;
        vec![
            CoefficientTable::from_fit(&format!("Poisson MLE for {outcome}"), &self.mle),
            CoefficientTable::from_fit(&format!("Poisson GLM for {outcome}"), &self.glm),
        ]
    }
}

/// Descriptive comparison by customer status.
pub fn customer_profile(table: &Table, opts: &TTestOptions) -> AnalysisResult<CustomerProfile> {
    let test = |column: &str| -> AnalysisResult<TTestOutcome> {
        let customers = group_values(table, column, CUSTOMER, "1")?;
        let others = group_values(table, column, CUSTOMER, "0")?;
        TTestOutcome::two_sample(&customers, &others, opts)
            .map_err(|e| AnalysisError::test(&format!("{column}: customers vs non-customers"), e))
    };
    let patents = test("patents")?;
    let age = test("age")?;

    let regions = table.level_column("region")?;
    let flags = table.numeric_column(CUSTOMER)?;
    let region_counts = table
        .levels("region")?
        .into_iter()
        .map(|level| {
            let mut counts = (0, 0);
            for (r, f) in regions.iter().zip(&flags) {
                match (r.as_deref(), f) {
                    (Some(r), Some(f)) if r == level && *f == 1.0 => counts.0 += 1,
                    (Some(r), Some(_)) if r == level => counts.1 += 1,
                    _ => {}
                }
            }
            (level, counts.0, counts.1)
        })
        .collect();
    Ok(CustomerProfile { patents, age, region_counts })
}

/// Intercept-only Poisson fits by Brent search and by L-BFGS.
pub fn rate_fits(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<RateFits> {
    let (complete, _) = table.drop_missing(&["patents"])?;
    let y = Array1::from(complete.required_numeric("patents")?);
    let sample_mean = y.mean().unwrap_or(f64::NAN);
    let brent = fit_poisson_rate(&y, &opts.scalar)
        .map_err(|e| AnalysisError::model_fit("Poisson rate (Brent)", e))?;

    let design = DesignMatrix::new(vec![INTERCEPT.to_string()], Array2::ones((y.len(), 1)))
        .map_err(|e| AnalysisError::model_fit("Poisson rate (L-BFGS)", e))?;
    let lbfgs_opts = PoissonOptions { theta0: Some(array![0.0]), ..opts.poisson.clone() };
    let fit = fit_poisson(&design, &y, &lbfgs_opts)
        .map_err(|e| AnalysisError::model_fit("Poisson rate (L-BFGS)", e))?;
    Ok(RateFits { sample_mean, brent, lbfgs_rate: fit.beta()[0].exp() })
}

/// Design of the full patent-count model.
pub fn design_spec() -> DesignSpec {
    DesignSpec::with_intercept(vec![
        Term::numeric("age"),
        Term::square("age"),
        Term::one_hot("region", None),
        Term::numeric(CUSTOMER),
    ])
}

/// Fit `spec` for `outcome` by MLE and by IRLS.
pub(crate) fn fit_count_models(
    table: &Table, outcome: &str, spec: &DesignSpec, opts: &AnalysisOptions,
) -> AnalysisResult<CountModelFits> {
    let frame = build_model_frame(table, outcome, spec)?;
    let mle_name = format!("Poisson MLE for {outcome}");
    let mle = fit_poisson(&frame.design, &frame.y, &opts.poisson)
        .map_err(|e| AnalysisError::model_fit(&mle_name, e))?;
    info!("{mle_name}: converged in {} iterations", mle.diagnostics().iterations);
    let glm_name = format!("Poisson GLM for {outcome}");
    let glm = fit_poisson_glm(&frame.design, &frame.y, &opts.irls)
        .map_err(|e| AnalysisError::model_fit(&glm_name, e))?;
    info!("{glm_name}: converged in {} iterations", glm.diagnostics().iterations);
    Ok(CountModelFits { outcome: outcome.to_string(), frame, mle, glm })
}

/// Full patent-count model on both solvers.
pub fn count_models(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<CountModelFits> {
    fit_count_models(table, "patents", &design_spec(), opts)
}

/// Average predicted-count difference from switching every firm to customer.
pub fn customer_effect(fits: &CountModelFits) -> AnalysisResult<CounterfactualEffect> {
    indicator_effect(&fits.mle, &fits.frame.design, CUSTOMER)
        .map_err(|e| AnalysisError::model_fit("customer counterfactual", e))
}

/// Full patents report.
///
/// # Errors
/// [`AnalysisError::Data`] when a required column is missing.
pub fn run_patents(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<AnalysisReport> {
    table.require_columns(&REQUIRED_COLUMNS)?;
    info!("patents: {} rows", table.n_rows());
    let mut report = AnalysisReport::new("Patent counts and customer status");

    report.push(
        "Customers vs non-customers",
        customer_profile(table, &opts.ttest).map(|p| {
            let mut out = format_ttest("patents", &p.patents);
            out.push_str(&format_ttest("age", &p.age));
            out.push_str(&format!("{:<16} {:>10} {:>14}\n", "region", "customers", "non-customers"));
            for (region, c, n) in &p.region_counts {
                out.push_str(&format!("{region:<16} {c:>10} {n:>14}\n"));
            }
            out
        }),
    );
    report.push(
        "Intercept-only rate",
        rate_fits(table, opts).map(|r| {
            format!(
                "sample mean = {:.6}\n{}L-BFGS: exp(b0) = {:.6}\n",
                r.sample_mean,
                format_rate_fit("Brent", &r.brent),
                r.lbfgs_rate
            )
        }),
    );
    let fits = count_models(table, opts);
    if let Ok(f) = &fits {
        report.coefficients.extend(f.coefficient_tables());
    }
    let effect = fits.as_ref().map_err(Clone::clone).and_then(customer_effect);
    report.push("Poisson regression", fits.map(|f| format_count_models(&f)));
    report.push(
        "Customer counterfactual",
        effect.map(|e| format_counterfactual("iscustomer 0 -> 1", &e)),
    );
    Ok(report)
}

pub(crate) fn format_count_models(fits: &CountModelFits) -> String {
    format!(
        "rows dropped for missing values: {}\n{}\n{}\nmax |b_MLE - b_GLM| = {:.3e}\n",
        fits.frame.rows_dropped,
        format_fitted_model(&fits.mle),
        format_fitted_model(&fits.glm),
        fits.max_coefficient_gap()
    )
}
