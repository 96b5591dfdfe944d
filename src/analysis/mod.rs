//! analysis — end-to-end replication pipelines.
//!
//! Purpose
//! -------
//! Wire loading, feature building, estimation and formatting together for
//! the three studies: the matching-grant experiment ([`charity`]), the
//! patent-count study ([`patents`]) and the Airbnb review-count study
//! ([`airbnb`]).
//!
//! Key behaviors
//! -------------
//! - Each study exposes typed section functions (usable from tests) and a
//!   `run_*` function assembling an [`AnalysisReport`].
//! - A failing section is recorded as a failure naming the model or test
//!   and its reason; the remaining sections still run. No coefficients are
//!   reported for a failed fit.
//! - Section failures are logged at `warn` level, completed fits at `info`.
//! - Coefficient tables of successful likelihood fits are kept on the
//!   report ([`AnalysisReport::coefficients`]) for CSV export.
//!
//! Conventions
//! -----------
//! - Filtered subsets are new tables passed explicitly to the next stage.
//! - All estimator settings come from one [`AnalysisOptions`] value.
use log::warn;

use crate::{
    models::{glm::IrlsOptions, poisson::PoissonOptions, probit::ProbitOptions},
    optimization::loglik_optimizer::{MLEOptions, ScalarOptions},
    report::{
        export::CoefficientTable,
        format::{format_failure, heading},
    },
    simulation::SimulationOptions,
    statistical_tests::t_test::TTestOptions,
};

pub mod airbnb;
pub mod charity;
pub mod errors;
pub mod patents;

pub use self::errors::{AnalysisError, AnalysisResult};

/// Estimator settings shared by every analysis.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AnalysisOptions {
    pub poisson: PoissonOptions,
    pub probit: ProbitOptions,
    pub irls: IrlsOptions,
    pub scalar: ScalarOptions,
    pub ttest: TTestOptions,
    pub simulation: SimulationOptions,
}

impl AnalysisOptions {
    /// Defaults with one L-BFGS configuration for every likelihood fit.
    pub fn with_mle(mle: MLEOptions) -> Self {
        let mut opts = Self::default();
        opts.poisson.mle = mle.clone();
        opts.probit.mle = mle;
        opts
    }
}

/// One titled block of a report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSection {
    pub title: String,
    pub outcome: AnalysisResult<String>,
}

/// Ordered sections of one analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub title: String,
    pub sections: Vec<ReportSection>,
    /// Coefficients of every fit that succeeded, in fitting order.
    pub coefficients: Vec<CoefficientTable>,
}

impl AnalysisReport {
    pub fn new(title: &str) -> Self {
        Self { title: title.to_string(), sections: Vec::new(), coefficients: Vec::new() }
    }

    /// Record a section; failures are logged.
    pub fn push(&mut self, title: &str, outcome: AnalysisResult<String>) {
        if let Err(err) = &outcome {
            warn!("{}: section '{title}' failed: {err}", self.title);
        }
        self.sections.push(ReportSection { title: title.to_string(), outcome });
    }

    pub fn failures(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections.iter().filter(|s| s.outcome.is_err())
    }

    pub fn section(&self, title: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.title == title)
    }

    /// Plain-text report.
    pub fn render(&self) -> String {
        let mut out = heading(&self.title);
        for section in &self.sections {
            out.push_str(&format!("\n-- {} --\n", section.title));
            match &section.outcome {
                Ok(body) => out.push_str(body),
                Err(err) => out.push_str(&format_failure(&section.title, &err.to_string())),
            }
        }
        out
    }
}

/// Largest absolute elementwise difference of two coefficient vectors.
pub(crate) fn max_abs_difference(a: &ndarray::Array1<f64>, b: &ndarray::Array1<f64>) -> f64 {
    a.iter().zip(b.iter()).fold(0.0_f64, |acc, (x, y)| acc.max((x - y).abs()))
}
