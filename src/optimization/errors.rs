//! optimization::errors — error surface for fitting and inference.
//!
//! [`OptError`] covers bad optimizer settings, non-finite objective values
//! or derivatives, malformed solver output and θ rejected before a run.
//! Errors from the two layers underneath are wrapped rather than
//! flattened: argmin failures keep their kind and message, and model
//! errors keep the original [`ModelError`].
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

use argmin::core::{ArgminError, Error};

use crate::models::errors::ModelError;

pub type OptResult<T> = Result<T, OptError>;

#[derive(Debug, Clone, PartialEq)]
pub enum OptError {
    // ---- Gradient ----
    /// The objective has no analytic gradient; finite differences are used.
    GradientNotImplemented,
    GradientDimMismatch { expected: usize, found: usize },
    InvalidGradient { index: usize, value: f64, reason: &'static str },

    // ---- Settings ----
    InvalidTolGrad { tol: f64, reason: &'static str },
    InvalidTolCost { tol: f64, reason: &'static str },
    InvalidMaxIter { max_iter: usize, reason: &'static str },
    NoTolerancesProvided,
    InvalidLineSearch { name: String, reason: &'static str },
    InvalidLBFGSMem { mem: usize, reason: &'static str },
    InvalidHessianMethod { name: String, reason: &'static str },

    // ---- Objective ----
    /// The objective evaluated to NaN or ±∞.
    NonFiniteCost { value: f64 },

    // ---- Solver output ----
    InvalidThetaHat { index: usize, value: f64, reason: &'static str },
    MissingThetaHat,

    // ---- Hessian ----
    HessianDimMismatch { expected: usize, found: (usize, usize) },
    InvalidHessian { row: usize, col: usize, value: f64 },

    // ---- θ ----
    ThetaLengthMismatch { expected: usize, actual: usize },
    InvalidThetaInput { index: usize, value: f64 },
    /// θ is a strided view the model code cannot borrow as a slice.
    NonContiguousTheta,

    // ---- Wrapped ----
    /// An argmin error; `kind` names the [`ArgminError`] variant.
    Argmin { kind: &'static str, text: String },
    /// Any other error that travelled through argmin.
    Backend { text: String },
    /// A model error raised while the objective or report was evaluated.
    Model(ModelError),
}

impl std::error::Error for OptError {}

impl std::fmt::Display for OptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OptError::GradientNotImplemented => write!(f, "No analytic gradient available"),
            OptError::GradientDimMismatch { expected, found } => {
                write!(f, "Gradient has length {found}, expected {expected}")
            }
            OptError::InvalidGradient { index, value, reason } => {
                write!(f, "Gradient entry {index} is {value}: {reason}")
            }

            OptError::InvalidTolGrad { tol, reason } => {
                write!(f, "Invalid gradient tolerance {tol}: {reason}")
            }
            OptError::InvalidTolCost { tol, reason } => {
                write!(f, "Invalid nll change tolerance {tol}: {reason}")
            }
            OptError::InvalidMaxIter { max_iter, reason } => {
                write!(f, "Invalid maximum iterations {max_iter}: {reason}")
            }
            OptError::NoTolerancesProvided => write!(f, "No stopping rule provided"),
            OptError::InvalidLineSearch { name, reason } => {
                write!(f, "Invalid line searcher '{name}': {reason}")
            }
            OptError::InvalidLBFGSMem { mem, reason } => {
                write!(f, "Invalid L-BFGS memory {mem}: {reason}")
            }
            OptError::InvalidHessianMethod { name, reason } => {
                write!(f, "Invalid Hessian method '{name}': {reason}")
            }

            OptError::NonFiniteCost { value } => write!(f, "Objective is not finite: {value}"),

            OptError::InvalidThetaHat { index, value, reason } => {
                write!(f, "Estimate {index} is {value}: {reason}")
            }
            OptError::MissingThetaHat => write!(f, "Solver returned no estimate"),

            OptError::HessianDimMismatch { expected, found } => {
                write!(f, "Hessian has shape {found:?}, expected ({expected}, {expected})")
            }
            OptError::InvalidHessian { row, col, value } => {
                write!(f, "Hessian entry ({row}, {col}) is {value}, must be finite")
            }

            OptError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }
            OptError::InvalidThetaInput { index, value } => {
                write!(f, "Theta entry {index} is {value}, must be finite")
            }
            OptError::NonContiguousTheta => write!(f, "Theta must be contiguous in memory"),

            OptError::Argmin { kind, text } => write!(f, "argmin {kind}: {text}"),
            OptError::Backend { text } => write!(f, "Solver error: {text}"),
            OptError::Model(err) => write!(f, "Model error: {err}"),
        }
    }
}

impl From<Error> for OptError {
    fn from(err: Error) -> Self {
        // Our own errors come back boxed from the cost and gradient callbacks.
        let err = match err.downcast::<OptError>() {
            Ok(opt_err) => return opt_err,
            Err(err) => err,
        };
        let argmin_err = match err.downcast::<ArgminError>() {
            Ok(argmin_err) => argmin_err,
            Err(err) => return OptError::Backend { text: err.to_string() },
        };
        let kind = match &argmin_err {
            ArgminError::InvalidParameter { .. } => "invalid parameter",
            ArgminError::NotImplemented { .. } => "not implemented",
            ArgminError::NotInitialized { .. } => "not initialized",
            ArgminError::ConditionViolated { .. } => "condition violated",
            ArgminError::CheckpointNotFound { .. } => "checkpoint not found",
            ArgminError::PotentialBug { .. } => "potential bug",
            ArgminError::ImpossibleError { .. } => "impossible error",
            _ => "error",
        };
        OptError::Argmin { kind, text: argmin_err.to_string() }
    }
}

impl From<ModelError> for OptError {
    fn from(err: ModelError) -> Self {
        match err {
            ModelError::ThetaLengthMismatch { expected, actual } => {
                OptError::ThetaLengthMismatch { expected, actual }
            }
            other => OptError::Model(other),
        }
    }
}

#[cfg(feature = "python-bindings")]
impl From<OptError> for PyErr {
    fn from(err: OptError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Errors raised inside argmin callbacks come back as the original
    // `OptError`, and argmin's own errors keep their kind.
    //
    // Given
    // -----
    // - An `OptError::NonFiniteCost` and an `ArgminError::NotImplemented`,
    //   both boxed into `argmin::core::Error`.
    //
    // Expect
    // ------
    // - The first round-trips unchanged; the second becomes
    //   `OptError::Argmin` with kind "not implemented" and argmin's message.
    fn from_argmin_error_recovers_inner_errors() {
        // Arrange
        let boxed_opt: Error = OptError::NonFiniteCost { value: f64::INFINITY }.into();
        let boxed_argmin: Error = ArgminError::NotImplemented { text: "x".to_string() }.into();

        // Act
        let a = OptError::from(boxed_opt);
        let b = OptError::from(boxed_argmin);

        // Assert
        assert_eq!(a, OptError::NonFiniteCost { value: f64::INFINITY });
        match b {
            OptError::Argmin { kind, text } => {
                assert_eq!(kind, "not implemented");
                assert!(text.contains('x'), "{text}");
            }
            other => panic!("Expected Argmin, got {other:?}"),
        }
    }

    #[test]
    // Purpose
    // -------
    // Model errors keep θ-length information and are otherwise wrapped
    // unchanged.
    //
    // Given
    // -----
    // - `ModelError::ThetaLengthMismatch` and `ModelError::EmptySeries`.
    //
    // Expect
    // ------
    // - `OptError::ThetaLengthMismatch`, then `OptError::Model` holding the
    //   same `EmptySeries`.
    fn from_model_error_maps_variants() {
        assert_eq!(
            OptError::from(ModelError::ThetaLengthMismatch { expected: 4, actual: 2 }),
            OptError::ThetaLengthMismatch { expected: 4, actual: 2 }
        );
        let wrapped = OptError::from(ModelError::EmptySeries { what: "y" });
        assert_eq!(wrapped, OptError::Model(ModelError::EmptySeries { what: "y" }));
        assert!(wrapped.to_string().contains("'y'"));
    }
}
