//! simulation::monte_carlo — sampling experiments behind the LLN/CLT figures.
//!
//! Purpose
//! -------
//! Draw repeated samples from two populations and record differences of
//! sample means: a running average (law of large numbers) and the sampling
//! distribution at several sample sizes (central limit theorem).
//!
//! Key behaviors
//! -------------
//! - Populations are Bernoulli(p) or an empirical set of values drawn with
//!   replacement ([`Population`]).
//! - Every experiment owns a `StdRng::seed_from_u64(seed)`; identical seeds
//!   and inputs give bit-identical output.
//! - [`clt_experiment`] seeds panel `k` with `seed + k`, so each panel is
//!   reproducible on its own.
//!
//! Invariants & assumptions
//! ------------------------
//! - Populations are validated before the first draw.
//! - Sample sizes, draws and repetitions are strictly positive.
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::simulation::errors::{SimulationError, SimulationResult};

/// Default seed for the command-line experiments.
pub const DEFAULT_SEED: u64 = 42;
/// Default length of the running-average series.
pub const DEFAULT_DRAWS: usize = 10_000;
/// Default repetitions per CLT panel.
pub const DEFAULT_REPS: usize = 1_000;
/// Default CLT sample sizes.
pub const DEFAULT_SAMPLE_SIZES: [usize; 4] = [50, 200, 500, 1000];

/// Population sampled with replacement.
#[derive(Debug, Clone, PartialEq)]
pub enum Population {
    Bernoulli(f64),
    Empirical(Vec<f64>),
}

impl Population {
    /// Check the population can be sampled.
    ///
    /// # Errors
    /// [`SimulationError::InvalidProbability`], [`SimulationError::EmptyPopulation`]
    /// or [`SimulationError::NonFiniteValue`].
    pub fn validate(&self) -> SimulationResult<()> {
        match self {
            Population::Bernoulli(p) => {
                if !p.is_finite() || !(0.0..=1.0).contains(p) {
                    return Err(SimulationError::InvalidProbability { p: *p });
                }
            }
            Population::Empirical(values) => {
                if values.is_empty() {
                    return Err(SimulationError::EmptyPopulation);
                }
                if let Some((index, &value)) =
                    values.iter().enumerate().find(|(_, v)| !v.is_finite())
                {
                    return Err(SimulationError::NonFiniteValue { index, value });
                }
            }
        }
        Ok(())
    }

    /// Population mean.
    pub fn mean(&self) -> f64 {
        match self {
            Population::Bernoulli(p) => *p,
            Population::Empirical(values) => values.iter().sum::<f64>() / values.len() as f64,
        }
    }

    fn draw<R: Rng>(&self, rng: &mut R) -> f64 {
        match self {
            Population::Bernoulli(p) => {
                if rng.gen_bool(*p) {
                    1.0
                } else {
                    0.0
                }
            }
            Population::Empirical(values) => values[rng.gen_range(0..values.len())],
        }
    }

    fn sample_mean<R: Rng>(&self, n: usize, rng: &mut R) -> f64 {
        (0..n).map(|_| self.draw(rng)).sum::<f64>() / n as f64
    }
}

/// Sampling distribution of the mean difference at one sample size.
#[derive(Debug, Clone, PartialEq)]
pub struct CltPanel {
    pub sample_size: usize,
    pub differences: Vec<f64>,
    pub mean: f64,
    /// Sample standard deviation (`n − 1` denominator).
    pub std_dev: f64,
}

/// `reps` independent differences `mean(a₁..aₙ) − mean(b₁..bₙ)`.
///
/// # Errors
/// Invalid populations, `n == 0`, or `reps == 0`.
pub fn simulate_mean_differences(
    a: &Population, b: &Population, n: usize, reps: usize, seed: u64,
) -> SimulationResult<Vec<f64>> {
    validate_inputs(a, b, n, reps)?;
    let mut rng = StdRng::seed_from_u64(seed);
    Ok((0..reps).map(|_| a.sample_mean(n, &mut rng) - b.sample_mean(n, &mut rng)).collect())
}

/// Running average of the first `k` pairwise differences `aᵢ − bᵢ`, for
/// `k = 1..=draws`.
///
/// # Errors
/// Invalid populations or `draws == 0`.
pub fn cumulative_average_differences(
    a: &Population, b: &Population, draws: usize, seed: u64,
) -> SimulationResult<Vec<f64>> {
    validate_inputs(a, b, 1, draws)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut total = 0.0;
    Ok((1..=draws)
        .map(|k| {
            total += a.draw(&mut rng) - b.draw(&mut rng);
            total / k as f64
        })
        .collect())
}

/// Mean-difference distributions for each of `sizes`.
///
/// # Errors
/// Invalid populations, an empty or zero entry in `sizes`, or `reps == 0`.
pub fn clt_experiment(
    a: &Population, b: &Population, sizes: &[usize], reps: usize, seed: u64,
) -> SimulationResult<Vec<CltPanel>> {
    if sizes.is_empty() {
        return Err(SimulationError::ZeroSampleSize);
    }
    sizes
        .iter()
        .enumerate()
        .map(|(k, &n)| {
            let differences =
                simulate_mean_differences(a, b, n, reps, seed.wrapping_add(k as u64))?;
            let (mean, std_dev) = mean_and_std(&differences);
            Ok(CltPanel { sample_size: n, differences, mean, std_dev })
        })
        .collect()
}

/// Mean and sample standard deviation; `std_dev` is `0` for one value.
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n == 1 {
        return (mean, 0.0);
    }
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, var.sqrt())
}

// ---- Helper methods ----

fn validate_inputs(a: &Population, b: &Population, n: usize, reps: usize) -> SimulationResult<()> {
    a.validate()?;
    b.validate()?;
    if n == 0 {
        return Err(SimulationError::ZeroSampleSize);
    }
    if reps == 0 {
        return Err(SimulationError::ZeroRepetitions);
    }
    Ok(())
}
