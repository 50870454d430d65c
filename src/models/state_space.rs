//! models::state_space — random-walk state-space model with missing data.
//!
//! Purpose
//! -------
//! Negative log-likelihood of a Gaussian random-walk latent path observed
//! with Gaussian noise, where some observations are missing.
//!
//! Key behaviors
//! -------------
//! - θ layout: `[log_sd_process, log_sd_obs, estimate_0 .. estimate_{n-1}]`.
//! - Process terms `-ln N(estimate_t; estimate_{t-1}, sd_process)` for
//!   `t ≥ 1`; observation terms `-ln N(obs_t; estimate_t, sd_obs)` for every
//!   present observation.
//! - Reports `sd_process`, `sd_obs`, `estimate` (vector).
//!
//! Invariants & assumptions
//! ------------------------
//! - Missing observations are `None` and contribute no term. A NaN-coded
//!   series is converted once by [`StateSpaceData::from_nan_coded`]; the
//!   objective never sees a sentinel value.
//! - `n ≥ 1`.
//!
//! Testing notes
//! -------------
//! - With every observation missing the objective is independent of
//!   `log_sd_obs`.
use crate::{
    ad::scalar::Scalar,
    models::{
        density::normal_nll,
        errors::{ModelError, ModelResult},
        traits::{NegLogLik, Report},
    },
};

/// Observation series with explicit missingness.
#[derive(Debug, Clone, PartialEq)]
pub struct StateSpaceData {
    pub observations: Vec<Option<f64>>,
}

impl StateSpaceData {
    /// # Errors
    /// - [`ModelError::EmptySeries`] if `observations` is empty.
    pub fn new(observations: Vec<Option<f64>>) -> ModelResult<Self> {
        if observations.is_empty() {
            return Err(ModelError::EmptySeries { what: "observations" });
        }
        Ok(Self { observations })
    }

    /// Build from a NaN-coded series: NaN becomes `None`.
    pub fn from_nan_coded(values: &[f64]) -> ModelResult<Self> {
        Self::new(values.iter().map(|&v| if v.is_nan() { None } else { Some(v) }).collect())
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn n_missing(&self) -> usize {
        self.observations.iter().filter(|o| o.is_none()).count()
    }
}

/// Gaussian random walk observed with noise, skipping missing observations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MissingDataStateSpaceModel;

impl NegLogLik for MissingDataStateSpaceModel {
    type Data = StateSpaceData;

    fn n_params(&self, data: &StateSpaceData) -> usize {
        data.len() + 2
    }

    fn param_names(&self, data: &StateSpaceData) -> Vec<String> {
        let mut names = vec!["log_sd_process".to_string(), "log_sd_obs".to_string()];
        names.extend((0..data.len()).map(|t| format!("estimate[{t}]")));
        names
    }

    fn nll<T: Scalar>(&self, theta: &[T], data: &StateSpaceData) -> ModelResult<T> {
        self.check_theta(theta.len(), data)?;
        let sd_process = theta[0].exp();
        let sd_obs = theta[1].exp();
        let estimate = &theta[2..];

        let mut nll = T::zero();
        if let Some(obs) = data.observations[0] {
            nll += normal_nll(T::constant(obs), estimate[0], sd_obs);
        }
        for pair in estimate.windows(2) {
            nll += normal_nll(pair[1], pair[0], sd_process);
        }
        for (obs, &state) in data.observations.iter().zip(estimate).skip(1) {
            if let Some(y) = *obs {
                nll += normal_nll(T::constant(y), state, sd_obs);
            }
        }
        Ok(nll)
    }

    fn report<T: Scalar>(&self, theta: &[T], data: &StateSpaceData) -> ModelResult<Report<T>> {
        self.check_theta(theta.len(), data)?;
        let mut report = Report::new();
        report.push_scalar("sd_process", theta[0].exp());
        report.push_scalar("sd_obs", theta[1].exp());
        report.push_vector("estimate", theta[2..].to_vec());
        Ok(report)
    }
}
