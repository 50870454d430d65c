//! Numerical stability utilities.
//!
//! Parameter transforms between the unconstrained optimizer space and the
//! constrained model space, plus the shared numerical cutoffs used by the
//! inference layer.
//!
//! # Provided items
//! - [`EIGEN_EPS`]: eigenvalues at or below this threshold are treated as
//!   zero when forming pseudoinverses of a Hessian.
//! - [`bounded_unit(x)`]: `tanh(x)` built from `exp(-|x|)`,
//!   mapping ℝ → (-1, 1); generic over [`Scalar`] so it differentiates.
//! - [`bounded_unit_parts(x)`]: the same bound together with
//!   `sqrt(1 - phi²)`, computed from `x` rather than from `phi`.
//! - [`bounded_unit_inv(phi)`]: inverse of `bounded_unit` on (-1, 1).
//!
//! # Notes
//! `bounded_unit` equals `tanh(x)` analytically. In `f64` it rounds to
//! exactly ±1 once `|x|` exceeds roughly 18.4, so `1 - phi²` must not be
//! formed from the rounded value. [`bounded_unit_parts`] returns the
//! complement as `sech(x) = 2·e^{-|x|} / (1 + e^{-2|x|})`, which stays
//! positive until `e^{-|x|}` underflows near `|x| ≈ 745`.
use crate::ad::scalar::Scalar;

/// Eigenvalue cutoff for pseudoinverse construction.
///
/// Eigenvalues `λ ≤ EIGEN_EPS` of a symmetric Hessian are treated as
/// numerically zero (or negative) and their directions are dropped.
pub const EIGEN_EPS: f64 = 1e-10;

/// `tanh(x)` as a bound into (-1, 1), evaluated through `exp(-|x|)`.
///
/// `bounded_unit(0) == 0` exactly, the map is odd and strictly increasing,
/// and it approaches ±1 as `x → ±∞`.
#[inline]
pub fn bounded_unit<T: Scalar>(x: T) -> T {
    bounded_unit_parts(x).0
}

/// `(phi, sqrt(1 - phi²))` for `phi = bounded_unit(x)`.
///
/// Both parts are built from `e = exp(-|x|)`: `phi = ±(1 - e²)/(1 + e²)`
/// and `sqrt(1 - phi²) = 2e/(1 + e²)`. The second never cancels, so it is
/// strictly positive wherever `phi` has saturated to ±1.
#[inline]
pub fn bounded_unit_parts<T: Scalar>(x: T) -> (T, T) {
    let positive = x.value() >= 0.0;
    let s = if positive { x } else { -x };
    let e = (-s).exp();
    let u = e * e;
    let denom = u + 1.0;
    let mag = (T::constant(1.0) - u) / denom;
    let phi = if positive { mag } else { -mag };
    (phi, e * 2.0 / denom)
}

/// Inverse of [`bounded_unit`]: `atanh(phi)` for `phi ∈ (-1, 1)`.
///
/// Returns ±∞ at the endpoints and NaN outside the interval.
#[inline]
pub fn bounded_unit_inv(phi: f64) -> f64 {
    0.5 * ((1.0 + phi) / (1.0 - phi)).ln()
}
