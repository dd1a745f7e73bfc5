//! CQT engine: applies a kernel bank to frequency-domain input

use super::config::CqtConfig;
use super::kernel::KernelBank;
use crate::error::{Result, TransformError};
use crate::spectrum::FftEngine;
use ndarray::ArrayView1;
use num_complex::Complex32;

/// Constant-Q transform over spectra of a fixed length
#[derive(Debug, Clone)]
pub struct CqtEngine {
    config: CqtConfig,
    bank: Option<KernelBank>,
}

impl CqtEngine {
    /// Build the kernel bank
    ///
    /// # Arguments
    /// * `config` - Bank parameters; `fft_size` must match `fft`
    /// * `fft` - Initialized FFT engine used to transform the kernels
    pub fn new(config: &CqtConfig, fft: &FftEngine) -> Result<Self> {
        config.validate()?;
        if !fft.is_initialized() {
            return Err(TransformError::Uninitialized);
        }

        let bank = KernelBank::build(config, fft)?;

        Ok(Self {
            config: config.clone(),
            bank: Some(bank),
        })
    }

    /// Correlate an input spectrum against the first B*octaves kernels
    ///
    /// # Arguments
    /// * `in_re`, `in_im` - Input spectrum (e.g. output of `FftEngine::forward`), length n
    /// * `out_re`, `out_im` - Per-bin coefficients, length `bins_per_octave * octaves`
    ///
    /// Each coefficient is scaled by 1/n. Outputs are untouched on error.
    pub fn apply(
        &self,
        in_re: &[f32],
        in_im: &[f32],
        out_re: &mut [f32],
        out_im: &mut [f32],
        bins_per_octave: usize,
        octaves: usize,
    ) -> Result<()> {
        let bank = self.bank()?;
        let requested = self.check_request(bins_per_octave, octaves)?;
        self.check_input(bank, in_re, in_im)?;
        for len in [out_re.len(), out_im.len()] {
            if len != requested {
                return Err(TransformError::LengthMismatch {
                    expected: requested,
                    found: len,
                });
            }
        }

        let inv_n = 1.0 / bank.fft_size() as f32;
        for k in 0..requested {
            let sum = bank.correlate(k, in_re, in_im) * inv_n;
            out_re[k] = sum.re;
            out_im[k] = sum.im;
        }

        Ok(())
    }

    /// Correlate against every bin and return complex coefficients
    pub fn apply_all(&self, in_re: &[f32], in_im: &[f32]) -> Result<Vec<Complex32>> {
        let bank = self.bank()?;
        self.check_input(bank, in_re, in_im)?;

        let inv_n = 1.0 / bank.fft_size() as f32;
        Ok((0..bank.total_bins())
            .map(|k| bank.correlate(k, in_re, in_im) * inv_n)
            .collect())
    }

    /// Drop the kernel bank; later calls report `Uninitialized`
    pub fn free(&mut self) {
        self.bank = None;
    }

    pub fn is_initialized(&self) -> bool {
        self.bank.is_some()
    }

    pub fn config(&self) -> &CqtConfig {
        &self.config
    }

    /// Number of bins in the constructed bank (0 once freed)
    pub fn total_bins(&self) -> usize {
        self.bank.as_ref().map_or(0, KernelBank::total_bins)
    }

    pub fn fft_size(&self) -> usize {
        self.config.fft_size
    }

    /// Centre frequency of every bin in Hz
    pub fn frequencies(&self) -> Vec<f32> {
        (0..self.config.total_bins())
            .map(|k| self.config.center_frequency(k))
            .collect()
    }

    pub fn kernel(&self, k: usize) -> Option<(ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        self.bank.as_ref()?.kernel(k)
    }

    fn bank(&self) -> Result<&KernelBank> {
        self.bank.as_ref().ok_or(TransformError::Uninitialized)
    }

    fn check_request(&self, bins_per_octave: usize, octaves: usize) -> Result<usize> {
        if bins_per_octave == 0 {
            return Err(TransformError::InvalidParameter {
                name: "bins_per_octave",
                value: 0.0,
            });
        }
        if octaves == 0 {
            return Err(TransformError::InvalidParameter {
                name: "octaves",
                value: 0.0,
            });
        }

        let requested = bins_per_octave.saturating_mul(octaves);
        let available = self.total_bins();
        if requested > available {
            return Err(TransformError::BankTooSmall { requested, available });
        }
        Ok(requested)
    }

    fn check_input(&self, bank: &KernelBank, in_re: &[f32], in_im: &[f32]) -> Result<()> {
        for len in [in_re.len(), in_im.len()] {
            if len != bank.fft_size() {
                return Err(TransformError::LengthMismatch {
                    expected: bank.fft_size(),
                    found: len,
                });
            }
        }
        Ok(())
    }
}
