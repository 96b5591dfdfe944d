//! analysis::charity — matching-grant fundraising experiment.
//!
//! Purpose
//! -------
//! Replicate the headline comparisons of the matching-grant letter
//! experiment: randomization balance, response rates, match-ratio effects,
//! donation amounts, and the LLN/CLT simulations built on the observed
//! response rates.
//!
//! Key behaviors
//! -------------
//! - Treatment effects are reported both as two-sample t-tests and as the
//!   equivalent OLS regressions on a treatment dummy.
//! - The probit of `gave` on `treatment` reports marginal effects on the
//!   probability of giving.
//! - Match-ratio comparisons use the treatment subset only, with the 1:1
//!   ratio as baseline.
//! - The amount regression conditional on giving runs on the subset
//!   `gave == 1`, built with [`Table::filter_by`].
//!
//! Conventions
//! -----------
//! - Group order in t-tests is (treatment, control), so `diff` is the
//!   treatment effect.
//! - Required columns: `treatment`, `ratio`, `gave`, `amount`, `mrm2`.
//!   `female` and `couple` join the balance checks when present.
use log::info;

use crate::{
    analysis::{
        AnalysisOptions, AnalysisReport,
        errors::{AnalysisError, AnalysisResult},
    },
    data::{
        errors::DataResult,
        features::{DesignSpec, Term, build_model_frame},
        table::{Cell, Table},
    },
    models::{
        fitted::FittedModel,
        ols::{OlsFit, fit_ols},
        probit::{MarginalEffect, fit_probit, marginal_effects},
    },
    report::format::{
        format_clt_panels, format_fitted_model, format_marginal_effects, format_ols,
        format_series_summary, format_ttest,
    },
    simulation::{
        SimulationOptions,
        monte_carlo::{CltPanel, Population, clt_experiment, cumulative_average_differences},
    },
    statistical_tests::t_test::{TTestOptions, TTestOutcome},
};

/// Columns every charity analysis needs.
pub const REQUIRED_COLUMNS: [&str; 5] = ["treatment", "ratio", "gave", "amount", "mrm2"];
/// Covariates checked for balance when present.
pub const OPTIONAL_BALANCE_COLUMNS: [&str; 2] = ["female", "couple"];
/// Response rate of the control letters.
pub const CONTROL_RESPONSE_RATE: f64 = 0.018;
/// Response rate of the matching-grant letters.
pub const TREATMENT_RESPONSE_RATE: f64 = 0.022;
/// Checkpoints printed for the running-average series.
pub const SERIES_CHECKPOINTS: [usize; 5] = [10, 100, 1_000, 5_000, 10_000];

/// t-test and OLS of one outcome on the treatment dummy.
#[derive(Debug, Clone, PartialEq)]
pub struct TreatmentComparison {
    pub column: String,
    pub ttest: TTestOutcome,
    pub ols: OlsFit,
}

/// Pairwise match-ratio comparisons plus the ratio-dummy regression.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRatioResults {
    /// `("2:1 vs 1:1", test)` and so on.
    pub pairwise: Vec<(String, TTestOutcome)>,
    pub regression: OlsFit,
}

/// Values of `column` for rows whose `group` level equals `level`,
/// skipping missing values.
pub fn group_values(table: &Table, column: &str, group: &str, level: &str) -> DataResult<Vec<f64>> {
    let values = table.numeric_column(column)?;
    let groups = table.level_column(group)?;
    Ok(values
        .into_iter()
        .zip(groups)
        .filter_map(|(v, g)| match (v, g) {
            (Some(v), Some(g)) if g == level => Some(v),
            _ => None,
        })
        .collect())
}

/// Treatment vs control on `column`: t-test and `column ~ const + treatment`.
///
/// # Errors
/// [`AnalysisError::Data`] for missing columns, [`AnalysisError::Test`] and
/// [`AnalysisError::ModelFit`] for estimation failures.
pub fn treatment_comparison(
    table: &Table, column: &str, opts: &TTestOptions,
) -> AnalysisResult<TreatmentComparison> {
    let treated = group_values(table, column, "treatment", "1")?;
    let control = group_values(table, column, "treatment", "0")?;
    let ttest = TTestOutcome::two_sample(&treated, &control, opts)
        .map_err(|e| AnalysisError::test(&format!("{column}: treatment vs control"), e))?;
    let ols = ols_on(table, column, vec![Term::numeric("treatment")])?;
    Ok(TreatmentComparison { column: column.to_string(), ttest, ols })
}

/// Balance checks on `mrm2` and any optional demographics present.
pub fn balance_tests(table: &Table, opts: &TTestOptions) -> AnalysisResult<Vec<TreatmentComparison>> {
    std::iter::once("mrm2")
        .chain(OPTIONAL_BALANCE_COLUMNS.into_iter().filter(|c| table.has_column(c)))
        .map(|column| treatment_comparison(table, column, opts))
        .collect()
}

/// Probit of `gave` on `treatment` and its marginal effects.
pub fn response_probit(
    table: &Table, opts: &AnalysisOptions,
) -> AnalysisResult<(FittedModel, Vec<MarginalEffect>)> {
    let spec = DesignSpec::with_intercept(vec![Term::numeric("treatment")]);
    let frame = build_model_frame(table, "gave", &spec)?;
    let name = "probit gave ~ treatment";
    let fit = fit_probit(&frame.design, &frame.y, &opts.probit)
        .map_err(|e| AnalysisError::model_fit(name, e))?;
    info!("{name}: fitted on {} rows in {} iterations", fit.n_obs(), fit.diagnostics().iterations);
    let effects =
        marginal_effects(&fit, &frame.design).map_err(|e| AnalysisError::model_fit(name, e))?;
    Ok((fit, effects))
}

/// Match-ratio comparisons within the treatment group.
pub fn match_ratio_effects(table: &Table, opts: &TTestOptions) -> AnalysisResult<MatchRatioResults> {
    let treated = table.filter_by("treatment", |c| c.as_f64() == Some(1.0))?;
    let pairs = [("2", "1"), ("3", "1"), ("3", "2")];
    let pairwise = pairs
        .iter()
        .map(|(hi, lo)| {
            let label = format!("{hi}:1 vs {lo}:1");
            let a = group_values(&treated, "gave", "ratio", hi)?;
            let b = group_values(&treated, "gave", "ratio", lo)?;
            let test = TTestOutcome::two_sample(&a, &b, opts)
                .map_err(|e| AnalysisError::test(&label, e))?;
            Ok((label, test))
        })
        .collect::<AnalysisResult<Vec<_>>>()?;
    let regression = ols_on(&treated, "gave", vec![Term::one_hot("ratio", Some("1"))])?;
    Ok(MatchRatioResults { pairwise, regression })
}

/// `amount ~ treatment` on all rows and on donors only.
pub fn amount_regressions(table: &Table) -> AnalysisResult<(OlsFit, OlsFit)> {
    let all = ols_on(table, "amount", vec![Term::numeric("treatment")])?;
    let donors = table.filter_by("gave", |c: &Cell| c.as_f64() == Some(1.0))?;
    let conditional = ols_on(&donors, "amount", vec![Term::numeric("treatment")])?;
    Ok((all, conditional))
}

/// Running average and CLT panels for control minus treatment draws.
pub fn response_simulations(
    opts: &SimulationOptions,
) -> AnalysisResult<(Vec<f64>, Vec<CltPanel>)> {
    let control = Population::Bernoulli(CONTROL_RESPONSE_RATE);
    let treatment = Population::Bernoulli(TREATMENT_RESPONSE_RATE);
    let series = cumulative_average_differences(&control, &treatment, opts.draws, opts.seed)?;
    let panels = clt_experiment(&control, &treatment, &opts.sample_sizes, opts.reps, opts.seed)?;
    Ok((series, panels))
}

/// Full charity report.
///
/// # Errors
/// [`AnalysisError::Data`] when a required column is missing; every later
/// failure is confined to its section.
pub fn run_charity(table: &Table, opts: &AnalysisOptions) -> AnalysisResult<AnalysisReport> {
    table.require_columns(&REQUIRED_COLUMNS)?;
    info!("charity: {} rows", table.n_rows());
    let mut report = AnalysisReport::new("Matching grants and charitable giving");

    report.push(
        "Balance tests",
        balance_tests(table, &opts.ttest).map(|rows| rows.iter().map(format_comparison).collect()),
    );
    report.push(
        "Response rate",
        treatment_comparison(table, "gave", &opts.ttest).map(|c| format_comparison(&c)),
    );
    report.push(
        "Probit of giving",
        response_probit(table, opts).map(|(fit, effects)| {
            format!("{}\n{}", format_fitted_model(&fit), format_marginal_effects(&effects))
        }),
    );
    report.push(
        "Match ratios",
        match_ratio_effects(table, &opts.ttest).map(|r| {
            let mut out: String =
                r.pairwise.iter().map(|(label, t)| format_ttest(label, t)).collect();
            out.push_str(&format_ols(&r.regression));
            out
        }),
    );
    report.push(
        "Donation amounts",
        amount_regressions(table).map(|(all, donors)| {
            format!("All letters:\n{}\nDonors only:\n{}", format_ols(&all), format_ols(&donors))
        }),
    );
    report.push(
        "Simulations",
        response_simulations(&opts.simulation).map(|(series, panels)| {
            format!(
                "{}\n{}",
                format_series_summary(
                    "Cumulative average of control - treatment",
                    &series,
                    &SERIES_CHECKPOINTS
                ),
                format_clt_panels(&panels)
            )
        }),
    );
    Ok(report)
}

// ---- Helper methods ----

fn ols_on(table: &Table, outcome: &str, terms: Vec<Term>) -> AnalysisResult<OlsFit> {
    let frame = build_model_frame(table, outcome, &DesignSpec::with_intercept(terms))?;
    let name = format!("OLS {outcome} ~ {}", frame.design.names()[1..].join(" + "));
    let fit = fit_ols(&frame.design, &frame.y).map_err(|e| AnalysisError::model_fit(&name, e))?;
    info!("{name}: fitted on {} rows", frame.y.len());
    Ok(fit)
}

fn format_comparison(c: &TreatmentComparison) -> String {
    format!("{}{}", format_ttest(&c.column, &c.ttest), format_ols(&c.ols))
}
