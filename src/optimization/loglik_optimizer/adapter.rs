//! loglik_optimizer::adapter — an [`Objective`] as an argmin problem.
//!
//! The argmin cost is the objective's nll and the gradient is its `∇nll`,
//! or a finite-difference gradient of the same cost when the objective has
//! none.
use std::cell::RefCell;

use crate::optimization::{
    errors::OptError,
    loglik_optimizer::{
        finite_diff::run_fd_diff,
        traits::Objective,
        types::{Cost, Grad, Theta},
        validation::{validate_grad, validate_value},
    },
};
use argmin::core::{CostFunction, Error, Gradient};
use finitediff::FiniteDiff;

/// An objective borrowed together with its data.
#[derive(Debug, Clone)]
pub struct ArgMinAdapter<'a, F: Objective> {
    pub f: &'a F,
    pub data: &'a F::Data,
}

impl<'a, F: Objective> ArgMinAdapter<'a, F> {
    pub fn new(f: &'a F, data: &'a F::Data) -> Self {
        Self { f, data }
    }

    /// Central-difference gradient of the cost, retried with forward
    /// differences if a cost evaluation failed or the result is not finite.
    fn fd_gradient(&self, theta: &Theta) -> Result<Grad, Error> {
        let closure_err: RefCell<Option<Error>> = RefCell::new(None);
        let cost_func = |theta: &Theta| -> f64 {
            match self.cost(theta) {
                Ok(val) => val,
                Err(e) => {
                    let mut slot = closure_err.borrow_mut();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                    f64::NAN
                }
            }
        };
        let fd_grad = theta.central_diff(&cost_func);
        if closure_err.borrow().is_none() && validate_grad(&fd_grad, theta.len()).is_ok() {
            return Ok(fd_grad);
        }
        Ok(run_fd_diff(theta, &cost_func, &closure_err)?)
    }
}

impl<'a, F: Objective> CostFunction for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Output = Cost;

    /// `nll(θ)`, or [`OptError::NonFiniteCost`] if it is not finite.
    fn cost(&self, theta: &Self::Param) -> Result<Self::Output, Error> {
        let nll = self.f.value(theta, self.data)?;
        validate_value(nll)?;
        Ok(nll)
    }
}

impl<'a, F: Objective> Gradient for ArgMinAdapter<'a, F> {
    type Param = Theta;
    type Gradient = Grad;

    /// # Errors
    /// - Objective errors other than [`OptError::GradientNotImplemented`].
    /// - A gradient of the wrong length or with non-finite entries.
    fn gradient(&self, theta: &Self::Param) -> Result<Self::Gradient, Error> {
        match self.f.grad(theta, self.data) {
            Ok(g) => {
                validate_grad(&g, theta.len())?;
                Ok(g)
            }
            Err(OptError::GradientNotImplemented) => self.fd_gradient(theta),
            Err(e) => Err(e.into()),
        }
    }
}
