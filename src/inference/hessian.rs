//! inference::hessian — objective curvature and its pseudoinverse.
//!
//! Purpose
//! -------
//! Evaluate the Hessian of a model's negative log-likelihood at θ̂ and turn
//! it into a parameter covariance matrix and standard errors.
//!
//! Key behaviors
//! -------------
//! - [`objective_hessian`] computes `∇²nll(θ̂)` exactly with hyper-dual
//!   numbers, or by central differences of the dual-number gradient
//!   ([`HessianMethod`]).
//! - [`pseudo_inverse`] forms `Σ = H⁺` from a symmetric eigendecomposition,
//!   dropping eigenvalues `≤ EIGEN_EPS`, and reports whether every
//!   eigenvalue survived (a positive-definite Hessian).
//! - [`standard_errors`] reads `sqrt(diag(Σ))`.
//!
//! Conventions
//! -----------
//! - Hessians are on the summed negative log-likelihood scale, so `H⁺` is
//!   directly the asymptotic covariance of θ̂.
//! - No explicit inverse is formed; weakly identified directions get zero
//!   variance contribution rather than a blow-up.
use std::{cell::RefCell, str::FromStr};

use crate::{
    ad::derivatives::{gradient, hessian},
    models::{errors::ModelError, fit::params, traits::NegLogLik},
    optimization::{
        errors::{OptError, OptResult},
        loglik_optimizer::{
            Grad, Theta,
            finite_diff::compute_hessian,
            types::Hessian,
            validation::{validate_hessian, validate_theta},
        },
        numerical_stability::transformations::EIGEN_EPS,
    },
};
use nalgebra::DMatrix;
use ndarray::{Array1, Array2};

/// How the objective Hessian is evaluated.
///
/// Parsing accepts `"exact"`, `"finitedifference"` and `"fd"`, ignoring
/// case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HessianMethod {
    /// Hyper-dual evaluation of every upper-triangle entry.
    #[default]
    Exact,
    /// Central differences of the exact gradient.
    FiniteDifference,
}

impl FromStr for HessianMethod {
    type Err = OptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "exact" => Ok(HessianMethod::Exact),
            "finitedifference" | "fd" => Ok(HessianMethod::FiniteDifference),
            _ => Err(OptError::InvalidHessianMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'Exact', 'FiniteDifference' or 'FD'.",
            }),
        }
    }
}

/// Eigen-truncated inverse of a Hessian.
#[derive(Debug, Clone, PartialEq)]
pub struct Covariance {
    pub matrix: Array2<f64>,
    /// `true` when every eigenvalue exceeded [`EIGEN_EPS`].
    pub pd_hessian: bool,
}

/// Hessian of `model.nll` at `theta`, validated and symmetric.
///
/// # Errors
/// - `ThetaLengthMismatch` / `InvalidThetaInput` for a bad θ.
/// - Model errors raised while evaluating the objective or its gradient.
/// - `HessianDimMismatch` / `InvalidHessian` if the result is not finite.
pub fn objective_hessian<M: NegLogLik>(
    model: &M, theta: &Theta, data: &M::Data, method: HessianMethod,
) -> OptResult<Hessian> {
    let n = model.n_params(data);
    validate_theta(theta, n)?;
    match method {
        HessianMethod::Exact => {
            let hess = hessian(model, params(theta)?, data)?;
            validate_hessian(&hess, n)?;
            Ok(hess)
        }
        HessianMethod::FiniteDifference => {
            let closure_err: RefCell<Option<ModelError>> = RefCell::new(None);
            let grad_fn = |t: &Theta| -> Grad {
                let result = params(t).map_err(|_| ModelError::ThetaLengthMismatch {
                    expected: n,
                    actual: t.len(),
                });
                match result.and_then(|p| gradient(model, p, data)) {
                    Ok(g) => g,
                    Err(e) => {
                        let mut slot = closure_err.borrow_mut();
                        if slot.is_none() {
                            *slot = Some(e);
                        }
                        Grad::from_elem(n, f64::NAN)
                    }
                }
            };
            let hess = compute_hessian(&grad_fn, theta);
            if let Some(err) = closure_err.take() {
                return Err(err.into());
            }
            hess
        }
    }
}

/// `H⁺ = Σ_{λ_k > EIGEN_EPS} q_k q_kᵀ / λ_k` for a symmetric `hess`.
pub fn pseudo_inverse(hess: &Hessian) -> Covariance {
    let n = hess.nrows();
    let mut hess_nalg = DMatrix::<f64>::zeros(n, n);
    fill_dmatrix(hess, &mut hess_nalg);
    let eigen_decomp = hess_nalg.symmetric_eigen();
    let q = eigen_decomp.eigenvectors;
    let eigenvals = eigen_decomp.eigenvalues;

    let mut matrix = Array2::<f64>::zeros((n, n));
    for (k, &lambda) in eigenvals.iter().enumerate() {
        if lambda > EIGEN_EPS {
            for i in 0..n {
                let coeff = q[(i, k)] / lambda;
                for j in 0..n {
                    matrix[[i, j]] += coeff * q[(j, k)];
                }
            }
        }
    }
    let pd_hessian = eigenvals.iter().all(|&lambda| lambda > EIGEN_EPS);
    Covariance { matrix, pd_hessian }
}

/// `sqrt(diag(cov))`, with tiny negative round-off clamped to zero.
pub fn standard_errors(cov: &Array2<f64>) -> Array1<f64> {
    cov.diag().mapv(|v| v.max(0.0).sqrt())
}

// ---- Helper methods ----

/// Copy a square `ndarray` matrix into a preallocated `DMatrix`.
fn fill_dmatrix(src: &Array2<f64>, dst: &mut DMatrix<f64>) {
    for ((i, j), &v) in src.indexed_iter() {
        dst[(i, j)] = v;
    }
}
