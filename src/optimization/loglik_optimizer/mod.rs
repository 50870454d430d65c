//! loglik_optimizer — argmin-backed minimization of negative
//! log-likelihoods.
//!
//! Purpose
//! -------
//! Fit θ by minimizing `nll(θ)` with L-BFGS. Callers implement
//! [`Objective`] and call [`minimize`]; every
//! [`NegLogLik`](crate::models::NegLogLik) model already is an
//! [`Objective`] through [`models::fit`](crate::models::fit).
//!
//! Key behaviors
//! -------------
//! - [`adapter::ArgMinAdapter`] hands `nll(θ)` to argmin as the cost and
//!   supplies a finite-difference gradient when the objective has none.
//! - [`builders`] constructs L-BFGS with a More–Thuente or Hager–Zhang line
//!   search; [`run::run_lbfgs`] executes it and normalizes the final state
//!   into an [`OptimOutcome`].
//! - [`OptimOutcome::converged`] is set only for genuine convergence; a
//!   line-search exit or an iteration cap still returns the best point.
//! - [`finite_diff`] supplies gradient and Hessian fallbacks and
//!   [`validation`] the shared input/output checks.
//!
//! Conventions
//! -----------
//! - θ is unconstrained; constrained quantities are produced by the model.
//! - Every value crossing this module is on the nll scale.
//! - Failures are [`OptError`](crate::optimization::errors::OptError)
//!   values, never panics.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod run;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::minimize;
pub use self::traits::{MLEOptions, Objective, OptimOutcome, Tolerances};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Theta};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_nll_models::optimization::loglik_optimizer::prelude::*;
//
// to import the main optimizer surface in a single line.

pub mod prelude {
    pub use super::api::minimize;
    pub use super::traits::{MLEOptions, Objective, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Theta};
}
