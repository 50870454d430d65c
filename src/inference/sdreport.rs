//! inference::sdreport — standard errors for parameters and reported
//! quantities.
//!
//! Purpose
//! -------
//! Summarize uncertainty at an estimate θ̂: the covariance `Σ = H⁺` of the
//! free parameters from the objective Hessian, and delta-method standard
//! errors `sqrt(diag(J Σ Jᵀ))` for every quantity the model reports, where
//! `J` is the exact Jacobian of the report with respect to θ.
//!
//! Conventions
//! -----------
//! - θ̂ is taken as given; no optimality check is made. A Hessian that is
//!   not positive definite is reported through [`SdReport::pd_hessian`],
//!   not as an error.
//! - Reported entries keep the model's order and names.
use crate::{
    ad::derivatives::report_jacobian,
    inference::hessian::{HessianMethod, objective_hessian, pseudo_inverse, standard_errors},
    models::{fit::params, traits::NegLogLik},
    optimization::{errors::OptResult, loglik_optimizer::Theta},
};
use ndarray::{Array1, Array2};

/// One reported quantity with its delta-method standard errors.
#[derive(Debug, Clone, PartialEq)]
pub struct SdReportEntry {
    pub name: &'static str,
    pub values: Vec<f64>,
    pub std_errors: Vec<f64>,
}

/// Uncertainty summary at θ̂.
#[derive(Debug, Clone, PartialEq)]
pub struct SdReport {
    pub theta_hat: Theta,
    pub param_names: Vec<String>,
    pub param_std_errors: Array1<f64>,
    pub covariance: Array2<f64>,
    pub reported: Vec<SdReportEntry>,
    /// `true` when the objective Hessian at θ̂ is positive definite.
    pub pd_hessian: bool,
}

impl SdReport {
    /// Reported quantity by name.
    pub fn get(&self, name: &str) -> Option<&SdReportEntry> {
        self.reported.iter().find(|e| e.name == name)
    }

    /// `(estimate, std_error)` of a free parameter by name.
    pub fn param(&self, name: &str) -> Option<(f64, f64)> {
        let i = self.param_names.iter().position(|p| p == name)?;
        Some((self.theta_hat[i], self.param_std_errors[i]))
    }
}

/// Standard errors for θ̂ and every reported quantity.
///
/// # Errors
/// - `ThetaLengthMismatch` / `InvalidThetaInput` for a bad θ̂.
/// - Model errors and non-finite Hessians from [`objective_hessian`].
pub fn sdreport<M: NegLogLik>(
    model: &M, theta_hat: &Theta, data: &M::Data, method: HessianMethod,
) -> OptResult<SdReport> {
    let hess = objective_hessian(model, theta_hat, data, method)?;
    let cov = pseudo_inverse(&hess);
    let param_std_errors = standard_errors(&cov.matrix);

    let reported = report_jacobian(model, params(theta_hat)?, data)?
        .into_iter()
        .map(|entry| {
            let std_errors = delta_method_se(&entry.jacobian, &cov.matrix);
            SdReportEntry { name: entry.name, values: entry.values, std_errors }
        })
        .collect();

    Ok(SdReport {
        theta_hat: theta_hat.clone(),
        param_names: model.param_names(data),
        param_std_errors,
        covariance: cov.matrix,
        reported,
        pd_hessian: cov.pd_hessian,
    })
}

/// `sqrt(diag(J Σ Jᵀ))`, one entry per row of `jac`.
fn delta_method_se(jac: &Array2<f64>, cov: &Array2<f64>) -> Vec<f64> {
    jac.rows().into_iter().map(|row| row.dot(&cov.dot(&row)).max(0.0).sqrt()).collect()
}
