//! analysis::errors — error surface of the end-to-end pipelines.
//!
//! Each variant names the stage that failed; fit and test failures also
//! carry the model or test name so a report section can say what broke.
use crate::{
    data::errors::DataError, models::errors::ModelError, simulation::errors::SimulationError,
    statistical_tests::errors::TestError,
};

pub type AnalysisResult<T> = Result<T, AnalysisError>;

#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// Loading, selecting or encoding the table failed.
    Data(DataError),

    /// A model could not be fitted.
    ModelFit { model: String, source: ModelError },

    /// A statistical test could not be computed.
    Test { test: String, source: TestError },

    /// A Monte-Carlo experiment was misconfigured.
    Simulation(SimulationError),
}

impl AnalysisError {
    pub fn model_fit(model: &str, source: ModelError) -> Self {
        AnalysisError::ModelFit { model: model.to_string(), source }
    }

    pub fn test(test: &str, source: TestError) -> Self {
        AnalysisError::Test { test: test.to_string(), source }
    }
}

impl std::error::Error for AnalysisError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnalysisError::Data(err) => Some(err),
            AnalysisError::ModelFit { source, .. } => Some(source),
            AnalysisError::Test { source, .. } => Some(source),
            AnalysisError::Simulation(err) => Some(err),
        }
    }
}

impl std::fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalysisError::Data(err) => write!(f, "Data error: {err}"),
            AnalysisError::ModelFit { model, source } => {
                write!(f, "Fitting {model} failed: {source}")
            }
            AnalysisError::Test { test, source } => write!(f, "Test '{test}' failed: {source}"),
            AnalysisError::Simulation(err) => write!(f, "Simulation error: {err}"),
        }
    }
}

impl From<DataError> for AnalysisError {
    fn from(err: DataError) -> Self {
        AnalysisError::Data(err)
    }
}

impl From<SimulationError> for AnalysisError {
    fn from(err: SimulationError) -> Self {
        AnalysisError::Simulation(err)
    }
}
