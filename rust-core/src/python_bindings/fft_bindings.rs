//! Python bindings for the FFT engine

use numpy::{PyArray1, PyReadwriteArray1};
use pyo3::prelude::*;

use crate::spectrum::FftEngine;

/// FFT engine exposed to Python
#[pyclass(name = "FftEngine")]
pub struct PyFftEngine {
    pub(crate) engine: FftEngine,
}

#[pymethods]
impl PyFftEngine {
    /// Create a new FFT engine
    ///
    /// Args:
    ///     fft_size: Transform length (power of two)
    #[new]
    fn new(fft_size: usize) -> PyResult<Self> {
        Ok(Self {
            engine: FftEngine::new(fft_size)?,
        })
    }

    /// Forward transform in place
    ///
    /// Args:
    ///     real: float32 numpy array of length fft_size
    ///     imag: float32 numpy array of length fft_size
    fn forward(&self, mut real: PyReadwriteArray1<f32>, mut imag: PyReadwriteArray1<f32>) -> PyResult<()> {
        self.engine.forward(real.as_slice_mut()?, imag.as_slice_mut()?)?;
        Ok(())
    }

    /// Inverse transform in place (scaled by 1/fft_size)
    fn inverse(&self, mut real: PyReadwriteArray1<f32>, mut imag: PyReadwriteArray1<f32>) -> PyResult<()> {
        self.engine.inverse(real.as_slice_mut()?, imag.as_slice_mut()?)?;
        Ok(())
    }

    /// Get twiddle factors as (real, imag) arrays
    fn twiddles<'py>(&self, py: Python<'py>) -> (&'py PyArray1<f32>, &'py PyArray1<f32>) {
        let (re, im) = self.engine.twiddles();
        (PyArray1::from_slice(py, re), PyArray1::from_slice(py, im))
    }

    /// Release the tables
    fn free(&mut self) {
        self.engine.free();
    }

    fn is_initialized(&self) -> bool {
        self.engine.is_initialized()
    }

    /// Get FFT size
    fn size(&self) -> usize {
        self.engine.fft_size()
    }
}
