//! report::format — plain-text rendering of fits, tests and simulations.
//!
//! Formatting lives here so estimators stay free of presentation concerns.
//! Every function returns a `String`; printing is left to the caller.
use crate::{
    models::{
        counterfactual::CounterfactualEffect,
        fitted::{CoefficientRow, FittedModel},
        ols::OlsFit,
        poisson::PoissonRateFit,
        probit::MarginalEffect,
    },
    simulation::monte_carlo::{CltPanel, mean_and_std},
    statistical_tests::t_test::TTestOutcome,
};

/// Section heading with an underline.
pub fn heading(title: &str) -> String {
    format!("\n{title}\n{}\n", "=".repeat(title.chars().count()))
}

/// Coefficient table in design-column order.
pub fn format_coefficient_table(rows: &[CoefficientRow], statistic_label: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<24} {:>12} {:>12} {:>10} {:>10}\n",
        "term", "estimate", "std.err", statistic_label, "p-value"
    ));
    for row in rows {
        let se = match row.std_error.value() {
            Some(v) => format!("{v:.6}"),
            None => "unstable".to_string(),
        };
        out.push_str(&format!(
            "{:<24} {:>12.6} {:>12} {:>10} {:>10}\n",
            row.name,
            row.estimate,
            se,
            fmt_opt(row.statistic, 3),
            fmt_opt(row.p_value, 4),
        ));
    }
    out
}

/// Likelihood fit: header, diagnostics and coefficient table.
pub fn format_fitted_model(fit: &FittedModel) -> String {
    let diag = fit.diagnostics();
    let mut out = String::new();
    out.push_str(&format!("{}\n", fit.kind().label()));
    out.push_str(&format!(
        "n = {} | log-likelihood = {:.4} | AIC = {:.4} | iterations = {} | status: {}\n",
        fit.n_obs(),
        fit.loglik(),
        fit.aic(),
        diag.iterations,
        diag.status,
    ));
    out.push_str(&format_coefficient_table(&fit.coefficient_table(), "z"));
    out
}

/// OLS fit: header, R² and coefficient table.
pub fn format_ols(fit: &OlsFit) -> String {
    let mut out = String::new();
    out.push_str("OLS regression\n");
    out.push_str(&format!(
        "df(resid) = {} | sigma^2 = {:.6} | R^2 = {:.4} | adj. R^2 = {:.4}\n",
        fit.df_resid(),
        fit.sigma2(),
        fit.r_squared(),
        fit.adj_r_squared(),
    ));
    out.push_str(&format_coefficient_table(&fit.coefficient_table(), "t"));
    out
}

/// One-line summary of a two-sample t-test.
pub fn format_ttest(label: &str, outcome: &TTestOutcome) -> String {
    format!(
        "{label}: mean_a = {:.6} (n = {}) | mean_b = {:.6} (n = {}) | diff = {:.6} | se = {:.6} | t = {:.4} | df = {:.1} | p = {:.4}\n",
        outcome.mean_a,
        outcome.n_a,
        outcome.mean_b,
        outcome.n_b,
        outcome.diff,
        outcome.se,
        outcome.t_stat,
        outcome.df,
        outcome.p_value,
    )
}

/// Probit marginal effects.
pub fn format_marginal_effects(effects: &[MarginalEffect]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>12} {:>12} {:>12}\n", "term", "AME", "std.err", "at means"));
    for e in effects {
        let se = e.std_error.value().map_or_else(|| "unstable".to_string(), |v| format!("{v:.6}"));
        out.push_str(&format!(
            "{:<24} {:>12.6} {:>12} {:>12.6}\n",
            e.name, e.average, se, e.at_means
        ));
    }
    out
}

/// Intercept-only rate fit.
pub fn format_rate_fit(label: &str, fit: &PoissonRateFit) -> String {
    format!(
        "{label}: lambda = {:.6} (se {:.6}) | log-likelihood = {:.4} | iterations = {}\n",
        fit.lambda, fit.std_error, fit.loglik, fit.iterations
    )
}

/// Counterfactual effect summary.
pub fn format_counterfactual(label: &str, effect: &CounterfactualEffect) -> String {
    format!(
        "{label}: average difference in predicted counts = {:.6} over {} rows\n",
        effect.average,
        effect.differences.len()
    )
}

/// Running-average series at the given checkpoints (1-based positions).
pub fn format_series_summary(label: &str, series: &[f64], checkpoints: &[usize]) -> String {
    let mut out = format!("{label} ({} draws)\n", series.len());
    for &k in checkpoints.iter().filter(|&&k| k >= 1 && k <= series.len()) {
        out.push_str(&format!("  after {k:>6} draws: {:.6}\n", series[k - 1]));
    }
    let (mean, sd) = mean_and_std(series);
    out.push_str(&format!("  series mean = {mean:.6} | series sd = {sd:.6}\n"));
    out
}

/// CLT panels: sample size, mean and spread of the mean differences.
pub fn format_clt_panels(panels: &[CltPanel]) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:>8} {:>8} {:>12} {:>12}\n", "n", "reps", "mean", "sd"));
    for p in panels {
        out.push_str(&format!(
            "{:>8} {:>8} {:>12.6} {:>12.6}\n",
            p.sample_size,
            p.differences.len(),
            p.mean,
            p.std_dev
        ));
    }
    out
}

/// Section failure notice.
pub fn format_failure(section: &str, reason: &str) -> String {
    format!("{section}: FAILED ({reason})\n")
}

fn fmt_opt(value: Option<f64>, digits: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.digits$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::standard_errors::StandardError;

    #[test]
    // Purpose
    // -------
    // Unstable SEs render as a marker, never as a number.
    fn coefficient_table_marks_unstable_rows() {
        // Arrange
        let rows = vec![
            CoefficientRow {
                name: "const".into(),
                estimate: 1.5,
                std_error: StandardError::Estimated(0.5),
                statistic: Some(3.0),
                p_value: Some(0.0027),
            },
            CoefficientRow {
                name: "age".into(),
                estimate: 0.1,
                std_error: StandardError::Unstable { index: 1, variance: -2.0 },
                statistic: None,
                p_value: None,
            },
        ];

        // Act
        let text = format_coefficient_table(&rows, "z");

        // Assert
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("const"));
        assert!(lines[1].contains("0.500000"));
        assert!(lines[2].contains("unstable"));
    }

    #[test]
    fn series_summary_skips_out_of_range_checkpoints() {
        let text = format_series_summary("diff", &[1.0, 0.5, 0.0], &[1, 3, 10]);
        assert!(text.contains("after      1 draws: 1.000000"));
        assert!(text.contains("after      3 draws: 0.000000"));
        assert!(!text.contains("after     10"));
    }
}
