//! High-level entry point for maximizing a user-provided `LogLikelihood`.
//!
//! This selects an L-BFGS solver with either Hager–Zhang or More–Thuente line
//! search, wraps the model in an `ArgMinAdapter` (which *minimizes* `-ℓ(θ)`),
//! delegates the run to `run_lbfgs`, and refuses to hand back a run that did
//! not meet a convergence criterion.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        OptimOutcome, Theta,
        adapter::ArgMinAdapter,
        builders::{build_optimizer_hager_zhang, build_optimizer_more_thuente},
        run::run_lbfgs,
        traits::{LineSearcher, LogLikelihood, MLEOptions},
        validation::validate_value,
    },
};

/// Maximize a log-likelihood `ℓ(θ)` using L-BFGS with the chosen line search.
///
/// # Behavior
/// - Validates the initial guess via `f.check(theta0, data)` and requires a
///   finite `ℓ(θ₀)`. Later trial points with a non-finite `ℓ` only shorten
///   the line-search step.
/// - Wraps `(f, data)` in an `ArgMinAdapter` that exposes a *minimization*
///   problem `c(θ) = -ℓ(θ)` to `argmin`.
/// - Builds an L-BFGS solver with either **Hager–Zhang** or **More–Thuente**
///   line search based on `opts.line_searcher`.
/// - Calls `run_lbfgs`, which configures the executor (initial params,
///   max iters, optional observers) and returns an `OptimOutcome`.
/// - Converts a run that stopped for any reason other than a convergence
///   criterion (iteration cap included) into [`OptError::NotConverged`].
///
/// # Errors
/// - Propagates any error from `f.check`.
/// - [`OptError::NonFiniteCost`] when `ℓ(θ₀)` is not finite.
/// - Propagates builder errors from `build_optimizer_*`.
/// - Propagates runtime errors from `run_lbfgs` (e.g., line search failures).
/// - [`OptError::NotConverged`] when the iteration budget ran out.
///
/// # Example
/// ```no_run
/// use ndarray::array;
/// use replication_stats::optimization::errors::OptResult;
/// use replication_stats::optimization::loglik_optimizer::{
///     maximize, LogLikelihood, MLEOptions, Theta,
/// };
///
/// struct Bowl;
/// impl LogLikelihood for Bowl {
///     type Data = ();
///     fn value(&self, theta: &Theta, _: &()) -> OptResult<f64> {
///         Ok(-theta.dot(theta))
///     }
///     fn check(&self, _: &Theta, _: &()) -> OptResult<()> {
///         Ok(())
///     }
/// }
///
/// let out = maximize(&Bowl, array![0.1, -0.2, 0.3], &(), &MLEOptions::default())?;
/// println!("θ̂ = {:?}", out.theta_hat);
/// # Ok::<(), replication_stats::optimization::errors::OptError>(())
/// ```
///
/// [`OptError::NotConverged`]: crate::optimization::errors::OptError::NotConverged
/// [`OptError::NonFiniteCost`]: crate::optimization::errors::OptError::NonFiniteCost
pub fn maximize<F: LogLikelihood>(
    f: &F, theta0: Theta, data: &F::Data, opts: &MLEOptions,
) -> OptResult<OptimOutcome> {
    f.check(&theta0, data)?;
    validate_value(f.value(&theta0, data)?)?;
    let problem = ArgMinAdapter::new(f, data);
    let outcome = match opts.line_searcher {
        LineSearcher::MoreThuente => {
            let solver = build_optimizer_more_thuente(opts)?;
            run_lbfgs(theta0, opts, problem, solver)?
        }
        LineSearcher::HagerZhang => {
            let solver = build_optimizer_hager_zhang(opts)?;
            run_lbfgs(theta0, opts, problem, solver)?
        }
    };
    outcome.ensure_converged()
}
