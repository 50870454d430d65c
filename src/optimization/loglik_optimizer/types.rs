//! loglik_optimizer::types — numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Name the `ndarray` containers and argmin solver types used across the
//! optimizer, derivative and inference code, so those modules never spell
//! out the generics themselves.
//!
//! Conventions
//! -----------
//! - `Theta`, `Grad` are length-`n` vectors for `n` free parameters;
//!   `Hessian` is `n × n`.
//! - `Cost` is the scalar argmin minimizes: the negative log-likelihood
//!   itself, with no sign change on the way in or out.
use argmin::solver::{
    linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
    quasinewton::LBFGS,
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Unconstrained parameter vector θ.
pub type Theta = Array1<f64>;

/// Gradient vector, same shape as [`Theta`].
pub type Grad = Array1<f64>;

/// Dense symmetric second-derivative matrix.
pub type Hessian = Array2<f64>;

/// Scalar objective value.
pub type Cost = f64;

/// argmin function-evaluation counters (e.g. `"cost_count"`).
pub type FnEvalMap = HashMap<String, u64>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

pub type LbfgsHagerZhang = LBFGS<HagerZhangLS, Theta, Grad, Cost>;

pub type LbfgsMoreThuente = LBFGS<MoreThuenteLS, Theta, Grad, Cost>;
