//! utils — conversion helpers for the Python bindings.
//!
//! Everything here sits behind the `python-bindings` feature: array
//! extraction from NumPy / pandas / sequences, option parsing, and the
//! plain-container shapes results are handed back to Python in.
#[cfg(feature = "python-bindings")]
use ndarray::Array2;

#[cfg(feature = "python-bindings")]
use pyo3::{exceptions::PyValueError, prelude::*, types::PyAny};

#[cfg(feature = "python-bindings")]
use crate::{
    inference::hessian::HessianMethod,
    models::{state_space::StateSpaceData, traits::Report},
    optimization::loglik_optimizer::{
        Theta,
        traits::{LineSearcher, MLEOptions, Tolerances},
    },
};

#[cfg(feature = "python-bindings")]
use numpy::{
    IntoPyArray,    // Vec → PyArray
    PyArrayMethods, // .readonly()
    PyReadonlyArray1,
};

/// Borrow a 1-D float64 view of a NumPy array, pandas Series or sequence,
/// copying only when the input is not already contiguous float64.
#[cfg(feature = "python-bindings")]
#[inline]
pub fn extract_f64_array<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<PyReadonlyArray1<'py, f64>> {
    if let Ok(arr_ro) = raw_data.extract::<PyReadonlyArray1<f64>>() {
        if arr_ro.as_slice().is_ok() {
            return Ok(arr_ro);
        }
    }

    if let Ok(obj) = raw_data.call_method("to_numpy", (false,), None) {
        if let Ok(series_ro) = obj.extract::<PyReadonlyArray1<f64>>() {
            if series_ro.as_slice().is_ok() {
                return Ok(series_ro);
            }
        }
    }

    let vec: Vec<f64> = raw_data.extract().map_err(|_| {
        pyo3::exceptions::PyTypeError::new_err(
            "expected a 1-D numpy.ndarray, pandas.Series, or sequence of float64",
        )
    })?;
    Ok(vec.into_pyarray(py).readonly())
}

/// Owned copy of a 1-D float input; `what` names the argument in errors.
#[cfg(feature = "python-bindings")]
pub fn extract_f64_vec<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>, what: &str,
) -> PyResult<Vec<f64>> {
    let arr = extract_f64_array(py, raw_data)?;
    let slice = arr.as_slice().map_err(|_| {
        PyValueError::new_err(format!("{what} must be a 1-D contiguous float64 array or sequence"))
    })?;
    Ok(slice.to_vec())
}

#[cfg(feature = "python-bindings")]
pub fn extract_theta<'py>(py: Python<'py>, raw_theta: &Bound<'py, PyAny>) -> PyResult<Theta> {
    Ok(Theta::from(extract_f64_vec(py, raw_theta, "theta")?))
}

/// Observations with gaps: a sequence holding `None`, or a float array where
/// `NaN` marks a missing value. `None` is folded into the NaN coding so
/// [`StateSpaceData::from_nan_coded`] is the only place gaps are decided.
#[cfg(feature = "python-bindings")]
pub fn extract_observations<'py>(
    py: Python<'py>, raw_data: &Bound<'py, PyAny>,
) -> PyResult<StateSpaceData> {
    let values: Vec<f64> = match raw_data.extract::<Vec<Option<f64>>>() {
        Ok(v) => v.into_iter().map(|o| o.unwrap_or(f64::NAN)).collect(),
        Err(_) => extract_f64_vec(py, raw_data, "observations")?,
    };
    Ok(StateSpaceData::from_nan_coded(&values)?)
}

/// Build validated [`MLEOptions`]; unset arguments take the crate defaults.
#[cfg(feature = "python-bindings")]
pub fn extract_mle_opts(
    tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    line_searcher: Option<&str>, lbfgs_mem: Option<usize>, verbose: Option<bool>,
) -> PyResult<MLEOptions> {
    let defaults = MLEOptions::default();
    let tols = if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
        defaults.tols
    } else {
        Tolerances::new(tol_grad, tol_cost, max_iter)?
    };
    let ls = match line_searcher {
        Some(name) => name.parse::<LineSearcher>()?,
        None => defaults.line_searcher,
    };
    Ok(MLEOptions::new(tols, ls, verbose.unwrap_or(defaults.verbose), lbfgs_mem)?)
}

#[cfg(feature = "python-bindings")]
pub fn extract_hessian_method(method: Option<&str>) -> PyResult<HessianMethod> {
    match method {
        Some(name) => Ok(name.parse::<HessianMethod>()?),
        None => Ok(HessianMethod::default()),
    }
}

/// Row-major nested lists for Python.
#[cfg(feature = "python-bindings")]
pub fn matrix_to_rows(m: &Array2<f64>) -> Vec<Vec<f64>> {
    m.rows().into_iter().map(|row| row.to_vec()).collect()
}

/// Ordered `(name, values)` pairs for Python.
#[cfg(feature = "python-bindings")]
pub fn report_to_pairs(report: &Report<f64>) -> Vec<(String, Vec<f64>)> {
    report.iter().map(|e| (e.name.to_string(), e.values.clone())).collect()
}
