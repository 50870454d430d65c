//! models::fit — maximum-likelihood fitting for any [`NegLogLik`] model.
//!
//! Every model is an [`Objective`] through the blanket impl below, with
//! the exact dual-number gradient, so [`minimize`] never falls back to
//! finite differences for these models.
use crate::{
    ad::derivatives::gradient,
    models::traits::{NegLogLik, Report},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Cost, Grad, MLEOptions, Objective, OptimOutcome, Theta, minimize,
            validation::validate_theta,
        },
    },
};

impl<M> Objective for M
where
    M: NegLogLik,
    M::Data: 'static,
{
    type Data = <M as NegLogLik>::Data;

    fn value(&self, theta: &Theta, data: &<M as NegLogLik>::Data) -> OptResult<Cost> {
        Ok(self.nll(params(theta)?, data)?)
    }

    /// Rejects a θ of the wrong length or with non-finite entries.
    fn check(&self, theta: &Theta, data: &<M as NegLogLik>::Data) -> OptResult<()> {
        validate_theta(theta, self.n_params(data))
    }

    fn grad(&self, theta: &Theta, data: &<M as NegLogLik>::Data) -> OptResult<Grad> {
        Ok(gradient(self, params(theta)?, data)?)
    }
}

/// Outcome of [`fit_model`].
#[derive(Debug, Clone, PartialEq)]
pub struct FitResult {
    pub outcome: OptimOutcome,
    /// Reported quantities at `outcome.theta_hat`.
    pub report: Report<f64>,
}

impl FitResult {
    pub fn theta_hat(&self) -> &Theta {
        &self.outcome.theta_hat
    }

    /// Objective value at θ̂.
    pub fn nll(&self) -> f64 {
        self.outcome.nll
    }

    pub fn converged(&self) -> bool {
        self.outcome.converged
    }
}

/// Minimize `model.nll` from `theta0` with L-BFGS and evaluate the report at
/// the best point found.
///
/// A run that stops short of convergence is still returned; check
/// [`FitResult::converged`].
///
/// # Errors
/// - `ThetaLengthMismatch` / `InvalidThetaInput` for a bad `theta0`.
/// - Any optimizer failure from [`minimize`].
/// - Model errors from the final report, as `OptError`.
pub fn fit_model<M>(
    model: &M, theta0: Theta, data: &M::Data, opts: &MLEOptions,
) -> OptResult<FitResult>
where
    M: NegLogLik,
    M::Data: 'static,
{
    let outcome = minimize(model, theta0, data, opts)?;
    let report = model.report(params(&outcome.theta_hat)?, data)?;
    Ok(FitResult { outcome, report })
}

/// Borrow θ as a slice for the generic model code.
pub(crate) fn params(theta: &Theta) -> OptResult<&[f64]> {
    theta.as_slice().ok_or(OptError::NonContiguousTheta)
}
