//! models::traits — the interface every likelihood model implements.
//!
//! Purpose
//! -------
//! Describe a model as a negative log-likelihood over a flat parameter
//! vector θ and a validated data bundle, written once against the generic
//! [`Scalar`] so the same body yields values, gradients and Hessians.
//!
//! Key behaviors
//! -------------
//! - [`NegLogLik::nll`] evaluates the objective at θ.
//! - [`NegLogLik::report`] returns the named derived quantities at θ as a
//!   [`Report`], in declaration order.
//! - [`NegLogLik::check_theta`] rejects a θ whose length does not match
//!   the declared layout.
//!
//! Invariants & assumptions
//! ------------------------
//! - Implementations are pure functions of `(θ, data)` and hold no
//!   scratch state; repeated evaluation is bit-identical.
//! - `param_names(data).len() == n_params(data)`.
use crate::{
    ad::scalar::Scalar,
    models::errors::{ModelError, ModelResult},
};

/// A negative log-likelihood over an unconstrained parameter vector.
pub trait NegLogLik {
    /// Validated data bundle the objective is evaluated on.
    type Data;

    /// Number of free parameters for this data set.
    fn n_params(&self, data: &Self::Data) -> usize;

    /// Parameter names in θ order.
    fn param_names(&self, data: &Self::Data) -> Vec<String>;

    /// Negative log-likelihood at θ.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] if `theta.len() != n_params(data)`.
    fn nll<T: Scalar>(&self, theta: &[T], data: &Self::Data) -> ModelResult<T>;

    /// Named derived quantities at θ.
    ///
    /// # Errors
    /// - [`ModelError::ThetaLengthMismatch`] if `theta.len() != n_params(data)`.
    fn report<T: Scalar>(&self, theta: &[T], data: &Self::Data) -> ModelResult<Report<T>>;

    fn check_theta(&self, len: usize, data: &Self::Data) -> ModelResult<()> {
        let expected = self.n_params(data);
        if len != expected {
            return Err(ModelError::ThetaLengthMismatch { expected, actual: len });
        }
        Ok(())
    }
}

/// One named reported quantity; scalars are stored as length-1 vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry<T> {
    pub name: &'static str,
    pub values: Vec<T>,
}

/// Ordered collection of reported quantities.
#[derive(Debug, Clone, PartialEq)]
pub struct Report<T> {
    entries: Vec<ReportEntry<T>>,
}

impl<T: Scalar> Report<T> {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    pub fn push_scalar(&mut self, name: &'static str, value: T) {
        self.entries.push(ReportEntry { name, values: vec![value] });
    }

    pub fn push_vector(&mut self, name: &'static str, values: Vec<T>) {
        self.entries.push(ReportEntry { name, values });
    }

    /// Look up a quantity by name.
    pub fn get(&self, name: &str) -> Option<&[T]> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.values.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &ReportEntry<T>> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Primal values of every entry, dropping derivative information.
    pub fn values(&self) -> Report<f64> {
        Report {
            entries: self
                .entries
                .iter()
                .map(|e| ReportEntry {
                    name: e.name,
                    values: e.values.iter().map(Scalar::value).collect(),
                })
                .collect(),
        }
    }
}

impl<T: Scalar> Default for Report<T> {
    fn default() -> Self {
        Self::new()
    }
}
