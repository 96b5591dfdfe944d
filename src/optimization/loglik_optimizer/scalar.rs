//! loglik_optimizer::scalar — bounded one-dimensional maximization.
//!
//! Single-parameter likelihoods (an intercept-only Poisson rate, say) are
//! maximized with Brent's method over a closed bracket instead of L-BFGS.
//! The objective is negated internally exactly as in the multivariate path.
use argmin::{
    core::{CostFunction, Error, Executor, State, TerminationReason, TerminationStatus},
    solver::brent::BrentOpt,
};

use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::validation::verify_bounds,
};

/// Default absolute tolerance on the location of the maximizer.
pub const DEFAULT_SCALAR_TOL: f64 = 1e-10;

/// Default iteration cap for Brent's method.
pub const DEFAULT_SCALAR_MAX_ITER: u64 = 200;

/// Configuration for [`maximize_scalar`].
///
/// `bounds` overrides whatever bracket the caller would otherwise derive
/// from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOptions {
    pub bounds: Option<(f64, f64)>,
    pub tol: f64,
    pub max_iter: u64,
}

impl ScalarOptions {
    pub fn new(bounds: Option<(f64, f64)>, tol: f64, max_iter: u64) -> OptResult<Self> {
        if let Some((lower, upper)) = bounds {
            verify_bounds(lower, upper)?;
        }
        if !tol.is_finite() || tol <= 0.0 {
            return Err(OptError::InvalidTolCost {
                tol,
                reason: "Scalar search tolerance must be positive and finite.",
            });
        }
        if max_iter == 0 {
            return Err(OptError::InvalidMaxIter {
                max_iter: 0,
                reason: "Maximum iterations must be greater than zero.",
            });
        }
        Ok(Self { bounds, tol, max_iter })
    }
}

impl Default for ScalarOptions {
    fn default() -> Self {
        Self { bounds: None, tol: DEFAULT_SCALAR_TOL, max_iter: DEFAULT_SCALAR_MAX_ITER }
    }
}

/// Result of a bounded scalar maximization.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarOutcome {
    pub argmax: f64,
    pub value: f64,
    pub iterations: u64,
}

struct NegatedScalar<G> {
    f: G,
}

impl<G: Fn(f64) -> OptResult<f64>> CostFunction for NegatedScalar<G> {
    type Param = f64;
    type Output = f64;

    fn cost(&self, x: &f64) -> Result<f64, Error> {
        let value = (self.f)(*x)?;
        if !value.is_finite() {
            return Err((OptError::NonFiniteCost { value }).into());
        }
        Ok(-value)
    }
}

/// Maximize `f` over `[lower, upper]` with Brent's method.
///
/// # Errors
/// - [`OptError::InvalidBounds`] for an empty or non-finite bracket.
/// - Any error raised by `f`, and [`OptError::NonFiniteCost`] when it
///   returns a non-finite value inside the bracket.
/// - [`OptError::NotConverged`] when the iteration cap is reached first.
pub fn maximize_scalar<G>(f: G, bounds: (f64, f64), opts: &ScalarOptions) -> OptResult<ScalarOutcome>
where
    G: Fn(f64) -> OptResult<f64>,
{
    let (lower, upper) = bounds;
    verify_bounds(lower, upper)?;
    let solver = BrentOpt::new(lower, upper).set_tolerance(f64::EPSILON.sqrt(), opts.tol);
    let problem = NegatedScalar { f };
    let max_iter = opts.max_iter;
    let result = Executor::new(problem, solver)
        .configure(|state| state.max_iters(max_iter))
        .run()?;
    let state = result.state();
    let iterations = state.get_iter();
    let termination = state.get_termination_status().clone();
    if !matches!(termination, TerminationStatus::Terminated(TerminationReason::SolverConverged)) {
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            TerminationStatus::Terminated(reason) => format!("{reason:?}"),
        };
        return Err(OptError::NotConverged { status, iterations: iterations as usize });
    }
    let argmax = *state.get_best_param().ok_or(OptError::MissingThetaHat)?;
    Ok(ScalarOutcome { argmax, value: -state.get_best_cost(), iterations })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    // Purpose
    // -------
    // Locate the maximizer of a concave parabola inside the bracket.
    //
    // Given
    // -----
    // - f(x) = -(x - 2.5)² on [0, 10].
    //
    // Expect
    // ------
    // - argmax ≈ 2.5 and value ≈ 0.
    fn maximize_scalar_finds_parabola_peak() {
        // Act
        let out = maximize_scalar(|x| Ok(-(x - 2.5) * (x - 2.5)), (0.0, 10.0), &ScalarOptions::default())
            .expect("Brent should converge");

        // Assert
        assert_abs_diff_eq!(out.argmax, 2.5, epsilon = 1e-6);
        assert_abs_diff_eq!(out.value, 0.0, epsilon = 1e-10);
    }

    #[test]
    // Purpose
    // -------
    // Reject malformed brackets and options.
    //
    // Expect
    // ------
    // - `InvalidBounds` for reversed bounds; option constructor errors for
    //   zero tolerance and zero iterations.
    fn maximize_scalar_validates_inputs() {
        let f = |x: f64| Ok(-x * x);
        assert!(matches!(
            maximize_scalar(f, (1.0, -1.0), &ScalarOptions::default()),
            Err(OptError::InvalidBounds { .. })
        ));
        assert!(matches!(ScalarOptions::new(None, 0.0, 10), Err(OptError::InvalidTolCost { .. })));
        assert!(matches!(ScalarOptions::new(None, 1e-8, 0), Err(OptError::InvalidMaxIter { .. })));
    }

    #[test]
    // Purpose
    // -------
    // An exhausted iteration budget is surfaced as non-convergence.
    //
    // Given
    // -----
    // - A wide bracket, a very tight tolerance and `max_iter = 2`.
    //
    // Expect
    // ------
    // - `Err(OptError::NotConverged { .. })`.
    fn maximize_scalar_reports_iteration_cap() {
        // Arrange
        let opts = ScalarOptions::new(None, 1e-14, 2).expect("valid options");

        // Act
        let result = maximize_scalar(|x| Ok(-(x - 123.456).powi(2)), (-1e3, 1e3), &opts);

        // Assert
        assert!(matches!(result, Err(OptError::NotConverged { .. })));
    }
}
