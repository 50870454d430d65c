//! ad::derivatives — value, gradient, Hessian and report Jacobian drivers.
//!
//! Purpose
//! -------
//! Turn any [`NegLogLik`] model into exact first and second derivatives by
//! re-evaluating its generic objective at seeded dual numbers.
//!
//! Key behaviors
//! -------------
//! - [`gradient`]: one [`Dual`] pass per coordinate (`n` passes).
//! - [`hessian`]: one [`HyperDual`] pass per upper-triangle entry
//!   (`n(n+1)/2` passes), mirrored into a symmetric matrix.
//! - [`report_jacobian`]: `n` [`Dual`] passes over `report`, giving the
//!   Jacobian of every reported quantity with respect to θ.
//!
//! Invariants & assumptions
//! ------------------------
//! - Derivatives are of the **negative** log-likelihood.
//! - Results carry no truncation error; they are exact up to floating-point
//!   rounding of the chain rule.
//!
//! Performance
//! -----------
//! - Cost is `O(n)` (gradient) and `O(n²)` (Hessian) objective evaluations.
//!   This is adequate for the small models in this crate; the state-space
//!   model with long series is the expensive case.
use crate::{
    ad::{dual::Dual, hyperdual::HyperDual, scalar::Scalar},
    models::{errors::ModelResult, traits::NegLogLik},
};
use ndarray::{Array1, Array2};

/// Jacobian of one named reported quantity.
///
/// `jacobian` has shape `values.len() × θ.len()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportJacobian {
    pub name: &'static str,
    pub values: Vec<f64>,
    pub jacobian: Array2<f64>,
}

/// Objective value at θ.
pub fn value<M: NegLogLik>(model: &M, theta: &[f64], data: &M::Data) -> ModelResult<f64> {
    model.nll(theta, data)
}

/// Gradient of the objective at θ.
pub fn gradient<M: NegLogLik>(
    model: &M, theta: &[f64], data: &M::Data,
) -> ModelResult<Array1<f64>> {
    model.check_theta(theta.len(), data)?;
    let n = theta.len();
    let mut grad = Array1::<f64>::zeros(n);
    let mut seeded: Vec<Dual> = theta.iter().map(|&v| Dual::constant(v)).collect();
    for i in 0..n {
        seeded[i].eps = 1.0;
        grad[i] = model.nll(&seeded, data)?.eps;
        seeded[i].eps = 0.0;
    }
    Ok(grad)
}

/// Hessian of the objective at θ.
pub fn hessian<M: NegLogLik>(
    model: &M, theta: &[f64], data: &M::Data,
) -> ModelResult<Array2<f64>> {
    model.check_theta(theta.len(), data)?;
    let n = theta.len();
    let mut hess = Array2::<f64>::zeros((n, n));
    let mut seeded: Vec<HyperDual> = theta.iter().map(|&v| HyperDual::constant(v)).collect();
    for i in 0..n {
        seeded[i].e1 = 1.0;
        for j in i..n {
            seeded[j].e2 = 1.0;
            let h = model.nll(&seeded, data)?.e12;
            hess[[i, j]] = h;
            hess[[j, i]] = h;
            seeded[j].e2 = 0.0;
        }
        seeded[i].e1 = 0.0;
    }
    Ok(hess)
}

/// Reported quantities at θ together with their Jacobians.
pub fn report_jacobian<M: NegLogLik>(
    model: &M, theta: &[f64], data: &M::Data,
) -> ModelResult<Vec<ReportJacobian>> {
    let base = model.report(theta, data)?;
    let n = theta.len();
    let mut out: Vec<ReportJacobian> = base
        .iter()
        .map(|e| ReportJacobian {
            name: e.name,
            values: e.values.clone(),
            jacobian: Array2::zeros((e.values.len(), n)),
        })
        .collect();

    let mut seeded: Vec<Dual> = theta.iter().map(|&v| Dual::constant(v)).collect();
    for i in 0..n {
        seeded[i].eps = 1.0;
        let report = model.report(&seeded, data)?;
        for (slot, entry) in out.iter_mut().zip(report.iter()) {
            for (row, v) in entry.values.iter().enumerate() {
                slot.jacobian[[row, i]] = v.eps;
            }
        }
        seeded[i].eps = 0.0;
    }
    Ok(out)
}
