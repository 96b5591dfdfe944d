//! Execution helper that runs an `argmin` solver on a log-likelihood problem and
//! returns a crate-friendly [`OptimOutcome`].
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{Grad, MLEOptions, OptimOutcome, Theta, adapter::ArgMinAdapter},
    loglik_optimizer::traits::LogLikelihood,
};
#[cfg(feature = "obs_slog")]
use argmin::core::{CostFunction, Gradient};
use argmin::core::{Executor, State};
#[cfg(feature = "obs_slog")]
use argmin_math::ArgminL2Norm;
use log::{debug, info};

/// Run an `argmin` L-BFGS solver for a log-likelihood problem.
///
/// Shared by both line-search variants. Sets `theta0` as the initial state,
/// applies [`Tolerances::iteration_cap`](super::Tolerances::iteration_cap)
/// (never unbounded), attaches the slog observer when the
/// `obs_slog` feature is on and `opts.verbose` is set, then converts the
/// final state into an [`OptimOutcome`] (value reported as `ℓ(θ̂)`).
///
/// The run summary is logged at `info` when `opts.verbose` is set and at
/// `debug` otherwise.
///
/// # Errors
/// Any `argmin` runtime error (including errors raised by the model's cost
/// or gradient) converted to [`OptError`](crate::optimization::errors::OptError),
/// and validation errors from [`OptimOutcome::new`].
pub fn run_lbfgs<'a, F, S>(
    theta0: Theta, opts: &MLEOptions, problem: ArgMinAdapter<'a, F>, solver: S,
) -> OptResult<OptimOutcome>
where
    F: LogLikelihood,
    S: argmin::core::Solver<
            ArgMinAdapter<'a, F>,
            argmin::core::IterState<Theta, Grad, (), (), (), f64>,
        > + 'static,
{
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        log_initial_state(&theta0, &problem)?;
    }
    let mut optimizer = Executor::new(problem, solver);
    optimizer = optimizer.configure(|state| state.param(theta0));
    #[cfg(feature = "obs_slog")]
    if opts.verbose {
        let observer = argmin_observer_slog::SlogLogger::term_noblock();
        optimizer = optimizer.add_observer(observer, argmin::core::observers::ObserverMode::Always);
    }
    let max_iters = opts.tols.iteration_cap();
    optimizer = optimizer.configure(|state| state.max_iters(max_iters));

    let mut result = optimizer.run()?.state().clone();
    let iterations = result.get_iter();
    let function_counts = result.get_func_counts().clone();
    let termination = result.get_termination_status().clone();
    let grad = result.take_gradient();
    let summary = format!(
        "L-BFGS stopped after {iterations} iterations ({termination:?}), ell = {:.6}",
        -result.get_best_cost()
    );
    if opts.verbose {
        info!("{summary}");
    } else {
        debug!("{summary}");
    }
    OptimOutcome::new(
        result.take_best_param(),
        -result.get_best_cost(),
        termination,
        iterations,
        function_counts,
        grad,
    )
}

// ---- Helper Methods ----

#[cfg(feature = "obs_slog")]
fn log_initial_state<F>(theta0: &Theta, problem: &ArgMinAdapter<'_, F>) -> OptResult<()>
where
    F: LogLikelihood,
{
    let ll0 = -problem.cost(theta0)?;
    let g0n = problem.gradient(theta0).ok().map(|g| g.l2_norm());

    eprintln!(
        "init: ell(theta0) = {:.6}{}",
        ll0,
        g0n.map(|n| format!(", ||grad|| = {:.6}", n)).unwrap_or_default()
    );
    Ok(())
}
