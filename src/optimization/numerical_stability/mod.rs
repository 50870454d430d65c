//! numerical_stability — parameter transforms and numerical cutoffs.
//!
//! Purpose
//! -------
//! Collect the small numerical helpers shared by the model and inference
//! layers: the bounded map used for autocorrelation parameters and the
//! eigenvalue cutoff used when inverting Hessians.
//!
//! Conventions
//! -----------
//! - Transforms used inside an objective are generic over
//!   [`Scalar`](crate::ad::scalar::Scalar) so they carry derivatives.
//! - Inverse transforms are plain `f64` helpers for building starting
//!   values.

pub mod transformations;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::transformations::{EIGEN_EPS, bounded_unit, bounded_unit_inv, bounded_unit_parts};

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::transformations::{
        EIGEN_EPS, bounded_unit, bounded_unit_inv, bounded_unit_parts,
    };
}
