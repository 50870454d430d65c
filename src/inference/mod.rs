//! inference — uncertainty at an estimate θ̂.
//!
//! Purpose
//! -------
//! Turn the curvature of a model's negative log-likelihood into standard
//! errors for the free parameters and, through the delta method, for every
//! quantity the model reports.
//!
//! Key behaviors
//! -------------
//! - [`objective_hessian`] evaluates `∇²nll(θ̂)` exactly or by finite
//!   differences of the exact gradient ([`HessianMethod`]).
//! - [`pseudo_inverse`] gives the eigen-truncated covariance `H⁺` and a
//!   positive-definiteness flag.
//! - [`sdreport`] combines both with the report Jacobian into an
//!   [`SdReport`].
//!
//! Conventions
//! -----------
//! - θ lives in the unconstrained optimizer space; constrained quantities
//!   get their uncertainty only through the report.
//! - Failures are [`OptError`](crate::optimization::errors::OptError)
//!   values; a singular Hessian is a flag, not an error.

pub mod hessian;
pub mod sdreport;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::hessian::{
    Covariance, HessianMethod, objective_hessian, pseudo_inverse, standard_errors,
};
pub use self::sdreport::{SdReport, SdReportEntry, sdreport};

// ---- Optional convenience prelude for downstream crates ------------------

pub mod prelude {
    pub use super::hessian::HessianMethod;
    pub use super::sdreport::{SdReport, SdReportEntry, sdreport};
}
