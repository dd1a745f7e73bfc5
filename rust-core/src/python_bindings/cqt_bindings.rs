//! Python bindings for constant-Q analysis

use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use super::fft_bindings::PyFftEngine;
use crate::cqt::{CqtConfig, CqtEngine};
use crate::spectrum::{AnalyzerConfig, ConstantQAnalyzer};

/// CQT engine exposed to Python
#[pyclass(name = "CqtEngine")]
pub struct PyCqtEngine {
    engine: CqtEngine,
}

#[pymethods]
impl PyCqtEngine {
    /// Build the kernel bank
    ///
    /// Args:
    ///     fft: Initialized FftEngine; its size fixes the kernel length
    ///     bins_per_octave: Bins per octave
    ///     octaves: Number of octaves
    ///     sample_rate: Sample rate in Hz
    ///     min_freq: Centre frequency of the first bin in Hz
    #[new]
    #[pyo3(signature = (fft, bins_per_octave=12, octaves=7, sample_rate=44100.0, min_freq=32.70))]
    fn new(
        fft: PyRef<PyFftEngine>,
        bins_per_octave: usize,
        octaves: usize,
        sample_rate: f32,
        min_freq: f32,
    ) -> PyResult<Self> {
        let config = CqtConfig::new(
            bins_per_octave,
            octaves,
            fft.engine.fft_size(),
            sample_rate,
            min_freq,
        );

        Ok(Self {
            engine: CqtEngine::new(&config, &fft.engine)?,
        })
    }

    /// Apply the kernel bank to a spectrum
    ///
    /// Args:
    ///     real: Spectrum real part (float32, length fft_size)
    ///     imag: Spectrum imaginary part
    ///     bins_per_octave: Defaults to the constructed value
    ///     octaves: Defaults to the constructed value
    ///
    /// Returns:
    ///     (real, imag) coefficient arrays
    #[pyo3(signature = (real, imag, bins_per_octave=None, octaves=None))]
    fn apply<'py>(
        &self,
        py: Python<'py>,
        real: PyReadonlyArray1<f32>,
        imag: PyReadonlyArray1<f32>,
        bins_per_octave: Option<usize>,
        octaves: Option<usize>,
    ) -> PyResult<(&'py PyArray1<f32>, &'py PyArray1<f32>)> {
        let bins_per_octave = bins_per_octave.unwrap_or(self.engine.config().bins_per_octave);
        let octaves = octaves.unwrap_or(self.engine.config().octaves);
        let total = bins_per_octave.saturating_mul(octaves).min(self.engine.total_bins());

        let mut out_re = vec![0.0f32; total];
        let mut out_im = vec![0.0f32; total];
        self.engine.apply(
            real.as_slice()?,
            imag.as_slice()?,
            &mut out_re,
            &mut out_im,
            bins_per_octave,
            octaves,
        )?;

        Ok((PyArray1::from_vec(py, out_re), PyArray1::from_vec(py, out_im)))
    }

    /// Bin centre frequencies in Hz
    fn frequencies<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        PyArray1::from_vec(py, self.engine.frequencies())
    }

    /// Release the kernel bank
    fn free(&mut self) {
        self.engine.free();
    }

    fn total_bins(&self) -> usize {
        self.engine.total_bins()
    }
}

/// Signal-level constant-Q analyzer exposed to Python
#[pyclass(name = "ConstantQAnalyzer")]
pub struct PyConstantQAnalyzer {
    analyzer: ConstantQAnalyzer,
}

#[pymethods]
impl PyConstantQAnalyzer {
    #[new]
    #[pyo3(signature = (fft_size=8192, bins_per_octave=12, octaves=7, sample_rate=44100.0, min_freq=32.70, window_input=false))]
    fn new(
        fft_size: usize,
        bins_per_octave: usize,
        octaves: usize,
        sample_rate: f32,
        min_freq: f32,
        window_input: bool,
    ) -> PyResult<Self> {
        let config = AnalyzerConfig {
            cqt: CqtConfig::new(bins_per_octave, octaves, fft_size, sample_rate, min_freq),
            window_input,
        };

        Ok(Self {
            analyzer: ConstantQAnalyzer::new(config)?,
        })
    }

    /// Analyze signal and return per-bin magnitudes
    fn analyze<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f32>,
    ) -> PyResult<&'py PyArray1<f32>> {
        let spectrum = self.analyzer.analyze(signal.as_slice()?)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Analyze signal and return magnitudes in dB
    #[pyo3(signature = (signal, reference=1.0))]
    fn analyze_db<'py>(
        &mut self,
        py: Python<'py>,
        signal: PyReadonlyArray1<f32>,
        reference: f32,
    ) -> PyResult<&'py PyArray1<f32>> {
        let spectrum = self.analyzer.analyze_db(signal.as_slice()?, reference)?;
        Ok(PyArray1::from_vec(py, spectrum))
    }

    /// Bin centre frequencies in Hz
    fn frequencies<'py>(&self, py: Python<'py>) -> &'py PyArray1<f32> {
        PyArray1::from_vec(py, self.analyzer.frequencies())
    }

    fn num_bins(&self) -> usize {
        self.analyzer.num_bins()
    }
}
