//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! log-likelihood optimizer so the rest of the optimization code can stay
//! agnostic to `ndarray` and Argmin generics.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors whose length equals the number
//!   of regression coefficients (design-matrix columns).
//! - `Hessian` is a dense `p × p` matrix when used.
//! - `Cost` is the scalar `c(θ) = -ℓ(θ)`; sign flips between cost and
//!   log-likelihood happen in the adapter and runner only.
//! - `DEFAULT_LBFGS_MEM`, `DEFAULT_MAX_ITER`, `DEFAULT_TOL_GRAD` and
//!   `DEFAULT_TOL_COST` document the default optimizer configuration so
//!   runs are reproducible without reading solver source.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter (coefficient) vector `β` for log-likelihood optimization.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix, `p × p` for `p = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer: `c(θ) = -ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps human-readable counter names (e.g., `"cost_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default iteration cap for L-BFGS runs.
pub const DEFAULT_MAX_ITER: usize = 500;

/// Default gradient-norm stopping tolerance.
pub const DEFAULT_TOL_GRAD: f64 = 1e-6;

/// Default absolute cost-change stopping tolerance.
pub const DEFAULT_TOL_COST: f64 = 1e-12;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

/// L-BFGS solver wired to the More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
