//! optimization — L-BFGS fitting stack, parameter transforms and the
//! shared error surface.
//!
//! - [`loglik_optimizer`]: minimize a negative log-likelihood with argmin's L-BFGS.
//! - [`numerical_stability`]: smooth maps from unconstrained θ to
//!   constrained model quantities, generic over the AD scalar.
//! - [`errors`]: [`OptError`](errors::OptError) / [`OptResult`](errors::OptResult),
//!   which also absorb argmin and model errors.
//!
//! Front-ends can import everything through [`prelude`].

pub mod errors;
pub mod loglik_optimizer;
pub mod numerical_stability;

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_nll_models::optimization::prelude::*;
//
// to import the main optimization surface in a single line.

pub mod prelude {
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
    pub use super::numerical_stability::prelude::*;
}
