//! models::ar1_regression — linear regression with AR(1) residuals.
//!
//! Purpose
//! -------
//! Negative log-likelihood of `y_t = b0 + b1·x_t + e_t`, where `e` is a
//! zero-mean stationary AR(1) process with marginal standard deviation
//! `sd` and lag-1 correlation `phi`.
//!
//! Key behaviors
//! -------------
//! - θ layout: `[b0, b1, phi_raw, log_sd]`.
//! - `phi = bounded_unit(phi_raw) ∈ (-1, 1)`, `sd = exp(log_sd)`.
//! - The innovation scale `sd·sqrt(1 - phi²)` is taken from
//!   `bounded_unit_parts(phi_raw)`, so the objective stays finite where
//!   `phi` itself has rounded to ±1.
//! - Reports `fit` (vector), `b0`, `b1`, `phi_raw`, `log_sd`.
//!
//! Invariants & assumptions
//! ------------------------
//! - [`AR1Data`] holds `x` and `y` of equal, non-zero length; this is
//!   checked once in [`AR1Data::new`].
//! - Non-finite data or θ entries propagate into a non-finite objective.
//!
//! Conventions
//! -----------
//! - The first residual uses the marginal density, so no observation is
//!   conditioned away.
//! - [`AR1RegressionModel::initial_theta`] provides a moment-based starting
//!   point for fitting (OLS coefficients, lag-1 residual correlation and
//!   residual scale).
use crate::{
    ad::scalar::Scalar,
    models::{
        density::ar1_nll,
        errors::{ModelError, ModelResult},
        traits::{NegLogLik, Report},
    },
    optimization::{
        loglik_optimizer::Theta,
        numerical_stability::{bounded_unit_inv, bounded_unit_parts},
    },
};

/// Largest |phi| used for starting values.
const PHI_START_CAP: f64 = 0.95;

/// Regressor and response series for [`AR1RegressionModel`].
#[derive(Debug, Clone, PartialEq)]
pub struct AR1Data {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl AR1Data {
    /// Validate and bundle `x` and `y`.
    ///
    /// # Errors
    /// - [`ModelError::EmptySeries`] if `y` is empty.
    /// - [`ModelError::LengthMismatch`] if `x.len() != y.len()`.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> ModelResult<Self> {
        if y.is_empty() {
            return Err(ModelError::EmptySeries { what: "y" });
        }
        if x.len() != y.len() {
            return Err(ModelError::LengthMismatch {
                what: "x",
                expected: y.len(),
                actual: x.len(),
            });
        }
        Ok(Self { x, y })
    }

    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

/// Linear regression with stationary AR(1) errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AR1RegressionModel;

impl AR1RegressionModel {
    pub const N_PARAMS: usize = 4;

    /// Moment-based starting point `[b0, b1, phi_raw, log_sd]`.
    ///
    /// Ordinary least squares for `(b0, b1)`, the lag-1 autocorrelation of
    /// the OLS residuals (capped at ±0.95) for `phi`, and their root mean
    /// square for `sd`. Degenerate inputs fall back to `b1 = 0` and
    /// `sd = 1`.
    pub fn initial_theta(&self, data: &AR1Data) -> Theta {
        let n = data.len() as f64;
        let x_bar = data.x.iter().sum::<f64>() / n;
        let y_bar = data.y.iter().sum::<f64>() / n;
        let (mut sxy, mut sxx) = (0.0, 0.0);
        for (&x, &y) in data.x.iter().zip(&data.y) {
            sxy += (x - x_bar) * (y - y_bar);
            sxx += (x - x_bar) * (x - x_bar);
        }
        let b1 = if sxx > 0.0 { sxy / sxx } else { 0.0 };
        let b0 = y_bar - b1 * x_bar;

        let resid: Vec<f64> =
            data.x.iter().zip(&data.y).map(|(&x, &y)| y - b0 - b1 * x).collect();
        let ss: f64 = resid.iter().map(|r| r * r).sum();
        let lag: f64 = resid.windows(2).map(|w| w[0] * w[1]).sum();
        let rho = if ss > 0.0 { (lag / ss).clamp(-PHI_START_CAP, PHI_START_CAP) } else { 0.0 };
        let sd = (ss / n).sqrt();
        let sd = if sd.is_finite() && sd > 0.0 { sd } else { 1.0 };

        Theta::from(vec![b0, b1, bounded_unit_inv(rho), sd.ln()])
    }

    fn fitted<T: Scalar>(b0: T, b1: T, data: &AR1Data) -> Vec<T> {
        data.x.iter().map(|&x| b0 + b1 * x).collect()
    }
}

impl NegLogLik for AR1RegressionModel {
    type Data = AR1Data;

    fn n_params(&self, _data: &AR1Data) -> usize {
        Self::N_PARAMS
    }

    fn param_names(&self, _data: &AR1Data) -> Vec<String> {
        ["b0", "b1", "phi_raw", "log_sd"].iter().map(|s| s.to_string()).collect()
    }

    fn nll<T: Scalar>(&self, theta: &[T], data: &AR1Data) -> ModelResult<T> {
        self.check_theta(theta.len(), data)?;
        let (b0, b1, phi_raw, log_sd) = (theta[0], theta[1], theta[2], theta[3]);
        let (phi, innov) = bounded_unit_parts(phi_raw);
        let sd = log_sd.exp();
        let residuals: Vec<T> = Self::fitted(b0, b1, data)
            .into_iter()
            .zip(&data.y)
            .map(|(fit, &y)| T::constant(y) - fit)
            .collect();
        Ok(ar1_nll(&residuals, phi, sd, sd * innov))
    }

    fn report<T: Scalar>(&self, theta: &[T], data: &AR1Data) -> ModelResult<Report<T>> {
        self.check_theta(theta.len(), data)?;
        let mut report = Report::new();
        report.push_vector("fit", Self::fitted(theta[0], theta[1], data));
        report.push_scalar("b0", theta[0]);
        report.push_scalar("b1", theta[1]);
        report.push_scalar("phi_raw", theta[2]);
        report.push_scalar("log_sd", theta[3]);
        Ok(report)
    }
}
