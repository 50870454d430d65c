//! models — negative log-likelihood models over a flat parameter vector.
//!
//! Purpose
//! -------
//! Define the three likelihood models, the [`NegLogLik`] interface they
//! share, and the fitting and simulation helpers built on it.
//!
//! Key behaviors
//! -------------
//! - [`AR1RegressionModel`]: linear regression with stationary AR(1)
//!   residuals, θ = `[b0, b1, phi_raw, log_sd]`.
//! - [`HierarchicalMeanModel`]: site means around a global mean,
//!   θ = `[site_mean[0..n_site], global_mean, log_sd_global]`.
//! - [`MissingDataStateSpaceModel`]: Gaussian random walk observed with
//!   noise, θ = `[log_sd_process, log_sd_obs, estimate[0..n]]`; missing
//!   observations are `None`.
//! - [`fit::fit_model`] minimizes `nll` with L-BFGS; [`simulate`] draws
//!   synthetic data from known parameters.
//!
//! Conventions
//! -----------
//! - Objectives are written once against [`Scalar`](crate::ad::Scalar);
//!   derivatives come from [`crate::ad`].
//! - Data bundles are validated at construction and immutable afterwards.

pub mod ar1_regression;
pub mod density;
pub mod errors;
pub mod fit;
pub mod hierarchical;
pub mod simulate;
pub mod state_space;
pub mod traits;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::ar1_regression::{AR1Data, AR1RegressionModel};
pub use self::errors::{ModelError, ModelResult};
pub use self::fit::{FitResult, fit_model};
pub use self::hierarchical::{HierarchicalData, HierarchicalMeanModel};
pub use self::simulate::{
    HierarchicalSim, StateSpaceSim, simulate_ar1, simulate_hierarchical, simulate_state_space,
};
pub use self::state_space::{MissingDataStateSpaceModel, StateSpaceData};
pub use self::traits::{NegLogLik, Report, ReportEntry};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::{
        AR1Data, AR1RegressionModel, FitResult, HierarchicalData, HierarchicalMeanModel,
        MissingDataStateSpaceModel, NegLogLik, Report, StateSpaceData, fit_model,
    };
}
