//! Validation helpers shared by the optimizer and inference layers.
//!
//! - Tolerances: [`verify_tol_grad`], [`verify_tol_cost`].
//! - Inputs: [`validate_theta`] for starting points handed to a model.
//! - Solver output: [`validate_grad`], [`validate_hessian`],
//!   [`validate_theta_hat`], [`validate_value`].
//!
//! Each check reports the first offending element as an [`OptError`].
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{Grad, Theta, types::Hessian},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate a parameter vector handed to a model: length `dim`, all finite.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    match theta.iter().position(|v| !v.is_finite()) {
        Some(index) => Err(OptError::InvalidThetaInput { index, value: theta[index] }),
        None => Ok(()),
    }
}

/// Validate a gradient vector against dimension and finiteness.
///
/// Checks:
/// - `grad.len() == dim`
/// - every element is finite (`NaN` or `±∞` are rejected)
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Unwrap the solver's best parameter, requiring finite entries.
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that an objective value is finite.
///
/// The sign is free: an nll can be negative for continuous data.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate that a Hessian is `dim × dim` with finite entries.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite, with offending
///   row/col indices and value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Input θ checks (length, finiteness).
    // - Gradient, Hessian and θ̂ validation reporting the first offender.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // `validate_theta` checks length before finiteness.
    //
    // Given
    // -----
    // - A length-3 θ against dim 4, a θ with NaN at index 1, a valid θ.
    //
    // Expect
    // ------
    // - ThetaLengthMismatch, InvalidThetaInput { index: 1 }, Ok.
    fn validate_theta_reports_length_then_first_non_finite() {
        assert_eq!(
            validate_theta(&array![0.0, 0.0, 0.0], 4),
            Err(OptError::ThetaLengthMismatch { expected: 4, actual: 3 })
        );
        assert!(matches!(
            validate_theta(&array![0.0, f64::NAN, f64::INFINITY], 3),
            Err(OptError::InvalidThetaInput { index: 1, .. })
        ));
        assert!(validate_theta(&array![0.0, -1.0, 2.5], 3).is_ok());
    }

    #[test]
    // Purpose
    // -------
    // Derivative and estimate checks name the first offending element.
    //
    // Given
    // -----
    // - A gradient with ∞ at index 2, a Hessian with NaN at (1, 0), a 2×3
    //   Hessian, and a missing θ̂.
    //
    // Expect
    // ------
    // - InvalidGradient { index: 2 }, InvalidHessian { row: 1, col: 0 },
    //   HessianDimMismatch and MissingThetaHat.
    fn derivative_checks_report_first_offender() {
        assert!(matches!(
            validate_grad(&array![1.0, 2.0, f64::INFINITY], 3),
            Err(OptError::InvalidGradient { index: 2, .. })
        ));
        assert!(matches!(
            validate_hessian(&array![[1.0, 0.0], [f64::NAN, 1.0]], 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
        assert_eq!(
            validate_hessian(&Hessian::zeros((2, 3)), 2),
            Err(OptError::HessianDimMismatch { expected: 2, found: (2, 3) })
        );
        assert_eq!(validate_theta_hat(None), Err(OptError::MissingThetaHat));
        assert_eq!(validate_value(f64::NEG_INFINITY), Err(OptError::NonFiniteCost { value: f64::NEG_INFINITY }));
    }
}
