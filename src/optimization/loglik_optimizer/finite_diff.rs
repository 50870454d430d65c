//! loglik_optimizer::finite_diff — numerical derivative fallbacks.
//!
//! Purpose
//! -------
//! Wrap the `finitediff` routines used when a derivative is not available
//! from dual-number evaluation: a forward-difference cost gradient for the
//! optimizer adapter and a finite-difference Hessian of a gradient map for
//! the inference layer.
//!
//! Conventions
//! -----------
//! - Objective closures report failures through a shared
//!   `RefCell<Option<Error>>` and return `NaN`; the first captured error
//!   wins and is surfaced as an [`OptError`](crate::optimization::errors::OptError).
//! - Every returned gradient or Hessian has passed [`validate_grad`] or
//!   [`validate_hessian`]; Hessians are symmetrized before they are returned.
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        Grad, Theta,
        types::Hessian,
        validation::{validate_grad, validate_hessian},
    },
};
use argmin::core::Error;
use finitediff::FiniteDiff;
use std::cell::RefCell;

/// Forward-difference gradient of `func` at `theta`.
///
/// `closure_err` is cleared on entry; if `func` stored an error in it during
/// differencing, that error is returned instead of the gradient.
///
/// # Errors
/// - The captured closure error, converted to `OptError`.
/// - `GradientDimMismatch` / `InvalidGradient` from [`validate_grad`].
pub fn run_fd_diff<G: Fn(&Theta) -> f64>(
    theta: &Theta, func: &G, closure_err: &RefCell<Option<Error>>,
) -> OptResult<Grad> {
    closure_err.replace(None);
    let fd_grad = theta.forward_diff(func);
    let dim = theta.len();
    if let Some(err) = closure_err.take() {
        return Err(err.into());
    }
    validate_grad(&fd_grad, dim)?;
    Ok(fd_grad)
}

/// Hessian of a gradient map `f` at `theta`.
///
/// Central differences are tried first. If that matrix fails validation the
/// forward-difference matrix is used, and only its validation error is
/// reported.
///
/// # Errors
/// - `HessianDimMismatch` / `InvalidHessian` from the forward-difference
///   fallback.
pub fn compute_hessian<F: Fn(&Theta) -> Grad>(f: &F, theta: &Theta) -> OptResult<Hessian> {
    let dim = theta.len();
    let mut cent_hess = theta.central_hessian(f);
    match validate_hessian(&cent_hess, dim) {
        Ok(_) => {
            symmetrize_hess(&mut cent_hess);
            Ok(cent_hess)
        }
        Err(_) => {
            let mut forward_hess = theta.forward_hessian(f);
            validate_hessian(&forward_hess, dim)?;
            symmetrize_hess(&mut forward_hess);
            Ok(forward_hess)
        }
    }
}

// ---- Helper methods ----

/// Average each off-diagonal pair in place. `hess` must be square.
pub(crate) fn symmetrize_hess(hess: &mut Hessian) {
    for i in 0..hess.nrows() {
        for j in 0..i {
            let avg = 0.5 * (hess[[i, j]] + hess[[j, i]]);
            hess[[i, j]] = avg;
            hess[[j, i]] = avg;
        }
    }
}
