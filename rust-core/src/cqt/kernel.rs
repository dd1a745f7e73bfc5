//! Frequency-domain CQT kernel bank
//!
//! Each bin's kernel is the FFT of a Hann-windowed complex exponential at the
//! bin's centre frequency, phase-centred on the window.

use super::config::CqtConfig;
use crate::error::{try_zeroed, Result, TransformError};
use crate::spectrum::windowing::hann;
use crate::spectrum::FftEngine;
use ndarray::{aview1, Array2, ArrayView1};
use num_complex::Complex32;
use std::f32::consts::PI;

/// Per-bin kernels stored as (total_bins x n) real and imaginary planes
#[derive(Debug, Clone)]
pub struct KernelBank {
    real: Array2<f32>,
    imag: Array2<f32>,
}

impl KernelBank {
    /// Build kernels for every bin in `config` using `fft`
    ///
    /// Bins at or above Nyquist keep all-zero kernels.
    pub fn build(config: &CqtConfig, fft: &FftEngine) -> Result<Self> {
        let n = config.fft_size;
        if fft.fft_size() != n {
            return Err(TransformError::LengthMismatch {
                expected: fft.fft_size(),
                found: n,
            });
        }

        let total_bins = config.total_bins();
        let mut bank = Self {
            real: zeroed_plane(total_bins, n)?,
            imag: zeroed_plane(total_bins, n)?,
        };

        let mut scratch_re = try_zeroed::<f32>(n)?;
        let mut scratch_im = try_zeroed::<f32>(n)?;
        let mut skipped = 0;

        for k in 0..total_bins {
            let Some(filter_len) = config.filter_length(k) else {
                log::trace!("CQT bin {} at {:.2} Hz skipped", k, config.center_frequency(k));
                skipped += 1;
                continue;
            };
            let freq = config.center_frequency(k);

            scratch_re.fill(0.0);
            scratch_im.fill(0.0);
            let center = (filter_len as f32 - 1.0) / 2.0;
            for i in 0..filter_len {
                let t = i as f32 - center;
                let window = hann(i, filter_len);
                let phase = 2.0 * PI * freq * t / config.sample_rate;
                scratch_re[i] = window * phase.cos();
                scratch_im[i] = window * phase.sin();
            }

            fft.forward(&mut scratch_re, &mut scratch_im)?;

            bank.real.row_mut(k).assign(&aview1(&scratch_re));
            bank.imag.row_mut(k).assign(&aview1(&scratch_im));
        }

        log::debug!(
            "CQT kernel bank built: {} bins ({} skipped), n = {}",
            total_bins,
            skipped,
            n
        );

        Ok(bank)
    }

    pub fn total_bins(&self) -> usize {
        self.real.nrows()
    }

    pub fn fft_size(&self) -> usize {
        self.real.ncols()
    }

    /// Kernel for bin k as (real, imaginary) views
    pub fn kernel(&self, k: usize) -> Option<(ArrayView1<'_, f32>, ArrayView1<'_, f32>)> {
        if k >= self.total_bins() {
            return None;
        }
        Some((self.real.row(k), self.imag.row(k)))
    }

    /// Unscaled complex multiply-accumulate of a spectrum against bin k
    ///
    /// Callers guarantee `k < total_bins` and both inputs have length n.
    pub(crate) fn correlate(&self, k: usize, in_re: &[f32], in_im: &[f32]) -> Complex32 {
        let kernel_re = self.real.row(k);
        let kernel_im = self.imag.row(k);

        in_re
            .iter()
            .zip(in_im)
            .zip(kernel_re.iter().zip(kernel_im.iter()))
            .fold(Complex32::new(0.0, 0.0), |acc, ((&xr, &xi), (&kr, &ki))| {
                acc + Complex32::new(xr, xi) * Complex32::new(kr, ki)
            })
    }
}

fn zeroed_plane(rows: usize, cols: usize) -> Result<Array2<f32>> {
    let len = rows.checked_mul(cols).ok_or(TransformError::Allocation)?;
    let data = try_zeroed::<f32>(len)?;
    Array2::from_shape_vec((rows, cols), data).map_err(|_| TransformError::Allocation)
}
