//! PyO3 bindings for Python integration

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::error::TransformError;

mod fft_bindings;
mod cqt_bindings;

impl From<TransformError> for PyErr {
    fn from(err: TransformError) -> Self {
        match err {
            TransformError::Uninitialized
            | TransformError::AlreadyInitialized
            | TransformError::Allocation => PyRuntimeError::new_err(err.to_string()),
            _ => PyValueError::new_err(err.to_string()),
        }
    }
}

/// Python module definition
#[pymodule]
fn spectral_cqt(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<fft_bindings::PyFftEngine>()?;
    m.add_class::<cqt_bindings::PyCqtEngine>()?;
    m.add_class::<cqt_bindings::PyConstantQAnalyzer>()?;

    Ok(())
}
