//! Errors for the likelihood models (data validation, parameter layout,
//! and simulation settings).
//!
//! ## Conventions
//! - **Indices are 0-based**.
//! - Validation happens once, when a data bundle is constructed; the
//!   objective functions assume validated data.
//! - Non-finite *values* in data or parameters are not errors here: they
//!   propagate into a non-finite objective that the optimizer rejects.
#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*};

/// Result alias for model construction and evaluation.
pub type ModelResult<T> = Result<T, ModelError>;

/// Unified error type for the model layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    // ---- Data validation ----
    /// A required series is empty.
    EmptySeries { what: &'static str },

    /// Two series that must align have different lengths.
    LengthMismatch { what: &'static str, expected: usize, actual: usize },

    /// The hierarchical model needs at least one site.
    InvalidSiteCount { n_site: usize },

    /// An observation refers to a site that does not exist.
    SiteIndexOutOfRange { index: usize, site: usize, n_site: usize },

    // ---- Parameter layout ----
    /// θ does not have the length the model declares.
    ThetaLengthMismatch { expected: usize, actual: usize },

    // ---- Simulation ----
    /// A simulation setting is outside its admissible range.
    InvalidSimulationParam { name: &'static str, value: f64, reason: &'static str },

    /// A statrs distribution rejected its parameters.
    Distribution { text: String },
}

impl std::error::Error for ModelError {}

impl std::fmt::Display for ModelError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data validation ----
            ModelError::EmptySeries { what } => {
                write!(f, "Input series '{what}' is empty.")
            }
            ModelError::LengthMismatch { what, expected, actual } => {
                write!(f, "Length mismatch for '{what}': expected {expected}, got {actual}")
            }
            ModelError::InvalidSiteCount { n_site } => {
                write!(f, "Number of sites must be at least 1; got: {n_site}")
            }
            ModelError::SiteIndexOutOfRange { index, site, n_site } => {
                write!(
                    f,
                    "Site index at position {index} is {site}, outside the valid range [0, {n_site})"
                )
            }

            // ---- Parameter layout ----
            ModelError::ThetaLengthMismatch { expected, actual } => {
                write!(f, "Theta length mismatch: expected {expected}, actual {actual}")
            }

            // ---- Simulation ----
            ModelError::InvalidSimulationParam { name, value, reason } => {
                write!(f, "Invalid simulation parameter '{name}' = {value}: {reason}")
            }
            ModelError::Distribution { text } => {
                write!(f, "Invalid distribution parameters: {text}")
            }
        }
    }
}

impl From<statrs::StatsError> for ModelError {
    fn from(err: statrs::StatsError) -> Self {
        ModelError::Distribution { text: err.to_string() }
    }
}

#[cfg(feature = "python-bindings")]
impl From<ModelError> for PyErr {
    fn from(err: ModelError) -> PyErr {
        PyValueError::new_err(err.to_string())
    }
}
