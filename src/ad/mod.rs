//! ad — forward-mode sensitivities for generic model objectives.
//!
//! Purpose
//! -------
//! Evaluate one generic objective body at plain values, at dual numbers
//! (first derivatives) and at hyper-dual numbers (second derivatives), so
//! models never hand-code a gradient or Hessian.
//!
//! Key behaviors
//! -------------
//! - [`Scalar`] is the numeric interface model code is written against.
//! - [`Dual`] carries one tangent; [`HyperDual`] carries two tangents and
//!   their cross term.
//! - [`gradient`], [`hessian`] and [`report_jacobian`] drive the seeded
//!   evaluations for any [`NegLogLik`](crate::models::traits::NegLogLik).
//!
//! Conventions
//! -----------
//! - Only the operations the models use are provided: field arithmetic,
//!   `exp`, `ln` and `sqrt`.
//! - Derivative drivers return `ndarray` containers to match the optimizer
//!   and inference layers.

pub mod derivatives;
pub mod dual;
pub mod hyperdual;
pub mod scalar;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::derivatives::{ReportJacobian, gradient, hessian, report_jacobian, value};
pub use self::dual::Dual;
pub use self::hyperdual::HyperDual;
pub use self::scalar::Scalar;
