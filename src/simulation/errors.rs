//! simulation::errors — error surface for Monte-Carlo and synthetic data.
use crate::models::errors::ModelError;

pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// Bernoulli probability outside `[0, 1]` or non-finite.
    InvalidProbability { p: f64 },

    /// Empirical population with no values.
    EmptyPopulation,

    /// Empirical population values must be finite.
    NonFiniteValue { index: usize, value: f64 },

    /// Sample size must be positive.
    ZeroSampleSize,

    /// Number of draws or repetitions must be positive.
    ZeroRepetitions,

    /// Poisson mean must be positive and finite.
    InvalidRate { index: usize, rate: f64 },

    /// Coefficient vector does not match the design.
    Model(ModelError),
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Model(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::InvalidProbability { p } => {
                write!(f, "Invalid Bernoulli probability {p}: must lie in [0, 1]")
            }
            SimulationError::EmptyPopulation => write!(f, "Empirical population is empty"),
            SimulationError::NonFiniteValue { index, value } => {
                write!(f, "Population value {value} at index {index} is not finite")
            }
            SimulationError::ZeroSampleSize => write!(f, "Sample size must be positive"),
            SimulationError::ZeroRepetitions => {
                write!(f, "Number of draws or repetitions must be positive")
            }
            SimulationError::InvalidRate { index, rate } => {
                write!(f, "Invalid Poisson mean {rate} at row {index}")
            }
            SimulationError::Model(err) => write!(f, "{err}"),
        }
    }
}

impl From<ModelError> for SimulationError {
    fn from(err: ModelError) -> Self {
        SimulationError::Model(err)
    }
}
