//! simulation — seeded Monte-Carlo experiments and synthetic data.
//!
//! - [`monte_carlo`]: mean-difference experiments for the LLN and CLT
//!   figures of the charity report.
//! - [`synthetic`]: Poisson data with known coefficients for recovery
//!   checks.
//!
//! All randomness flows through `StdRng::seed_from_u64`, so every result is
//! a deterministic function of its inputs and seed.

pub mod errors;
pub mod monte_carlo;
pub mod synthetic;

pub use self::errors::{SimulationError, SimulationResult};
pub use self::monte_carlo::{
    CltPanel, Population, clt_experiment, cumulative_average_differences, mean_and_std,
    simulate_mean_differences,
};
pub use self::synthetic::{SyntheticPoisson, patents_like, simulate_poisson_counts};

use crate::simulation::monte_carlo::{
    DEFAULT_DRAWS, DEFAULT_REPS, DEFAULT_SAMPLE_SIZES, DEFAULT_SEED,
};

/// Settings shared by the command-line simulation runs.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationOptions {
    pub seed: u64,
    /// Length of the running-average series.
    pub draws: usize,
    /// Repetitions per CLT panel.
    pub reps: usize,
    pub sample_sizes: Vec<usize>,
}

impl SimulationOptions {
    pub fn new(
        seed: u64, draws: usize, reps: usize, sample_sizes: Vec<usize>,
    ) -> SimulationResult<Self> {
        if draws == 0 || reps == 0 {
            return Err(SimulationError::ZeroRepetitions);
        }
        if sample_sizes.is_empty() || sample_sizes.contains(&0) {
            return Err(SimulationError::ZeroSampleSize);
        }
        Ok(Self { seed, draws, reps, sample_sizes })
    }
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            draws: DEFAULT_DRAWS,
            reps: DEFAULT_REPS,
            sample_sizes: DEFAULT_SAMPLE_SIZES.to_vec(),
        }
    }
}
