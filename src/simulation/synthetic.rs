//! simulation::synthetic — Poisson data with known coefficients.
//!
//! Used to check that the estimators recover a known `β` and that the error
//! shrinks as `n` grows. The generated design mirrors the patent-count
//! model: `[const, age, age_sq, iscustomer]`.
use ndarray::{Array1, Array2};
use rand::{Rng, SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Poisson};

use crate::{
    models::{
        design::{DesignMatrix, INTERCEPT},
        errors::ModelError,
    },
    optimization::numerical_stability::clip_eta,
    simulation::errors::{SimulationError, SimulationResult},
};

/// Age range of the synthetic firms.
pub const AGE_RANGE: (f64, f64) = (10.0, 50.0);
/// Share of synthetic firms flagged as customers.
pub const CUSTOMER_SHARE: f64 = 0.4;

/// Synthetic design and counts.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticPoisson {
    pub design: DesignMatrix,
    pub y: Array1<f64>,
}

/// Draw `yᵢ ~ Poisson(exp(xᵢβ))` for every row of `design`.
///
/// # Errors
/// - [`SimulationError::Model`] when `beta` does not match the columns.
/// - [`SimulationError::InvalidRate`] if a mean cannot parameterize a
///   Poisson draw.
pub fn simulate_poisson_counts(
    design: &DesignMatrix, beta: &Array1<f64>, seed: u64,
) -> SimulationResult<Array1<f64>> {
    if beta.len() != design.n_params() {
        return Err(ModelError::LengthMismatch { expected: design.n_params(), found: beta.len() }
            .into());
    }
    let mut rng = StdRng::seed_from_u64(seed);
    design
        .x()
        .dot(beta)
        .iter()
        .enumerate()
        .map(|(index, &eta)| {
            let rate = clip_eta(eta).exp();
            let dist =
                Poisson::new(rate).map_err(|_| SimulationError::InvalidRate { index, rate })?;
            Ok(dist.sample(&mut rng))
        })
        .collect()
}

/// Firms with uniform ages in [`AGE_RANGE`] and a customer flag drawn with
/// probability [`CUSTOMER_SHARE`], and counts drawn from `β`.
///
/// # Errors
/// [`SimulationError::ZeroSampleSize`] for `n == 0`, otherwise as
/// [`simulate_poisson_counts`].
pub fn patents_like(n: usize, beta: &Array1<f64>, seed: u64) -> SimulationResult<SyntheticPoisson> {
    if n == 0 {
        return Err(SimulationError::ZeroSampleSize);
    }
    let mut rng = StdRng::seed_from_u64(seed);
    let mut x = Array2::<f64>::zeros((n, 4));
    for mut row in x.rows_mut() {
        let age = rng.gen_range(AGE_RANGE.0..AGE_RANGE.1);
        row[0] = 1.0;
        row[1] = age;
        row[2] = age * age;
        row[3] = if rng.gen_bool(CUSTOMER_SHARE) { 1.0 } else { 0.0 };
    }
    let names = [INTERCEPT, "age", "age_sq", "iscustomer"].map(String::from).to_vec();
    let design = DesignMatrix::new(names, x)?;
    let y = simulate_poisson_counts(&design, beta, seed.wrapping_add(1))?;
    Ok(SyntheticPoisson { design, y })
}
