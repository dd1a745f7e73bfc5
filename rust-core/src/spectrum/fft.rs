//! Radix-2 FFT engine with precomputed tables
//!
//! Operates in place on split real/imaginary buffers supplied by the caller.

use crate::error::{try_zeroed, Result, TransformError};
use std::f64::consts::PI;

/// In-place iterative FFT for a fixed power-of-two length
#[derive(Debug, Clone)]
pub struct FftEngine {
    /// Transform length (number of complex samples)
    fft_size: usize,

    /// cos(-2πi/n) for i = 0..n/2
    twiddle_re: Vec<f32>,

    /// sin(-2πi/n) for i = 0..n/2
    twiddle_im: Vec<f32>,

    /// Decimation-in-time input ordering
    bit_reversal: Vec<usize>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - Transform length, must be a positive power of two
    pub fn new(fft_size: usize) -> Result<Self> {
        if !fft_size.is_power_of_two() {
            return Err(TransformError::InvalidLength(fft_size));
        }

        let half = fft_size / 2;
        let mut twiddle_re = try_zeroed::<f32>(half)?;
        let mut twiddle_im = try_zeroed::<f32>(half)?;
        for i in 0..half {
            let angle = -2.0 * PI * i as f64 / fft_size as f64;
            twiddle_re[i] = angle.cos() as f32;
            twiddle_im[i] = angle.sin() as f32;
        }

        let mut bit_reversal = try_zeroed::<usize>(fft_size)?;
        let mut j = 0usize;
        for slot in bit_reversal.iter_mut() {
            *slot = j;
            let mut bit = fft_size >> 1;
            while j & bit != 0 {
                j ^= bit;
                bit >>= 1;
            }
            j ^= bit;
        }

        log::debug!("FFT tables built for n = {}", fft_size);

        Ok(Self {
            fft_size,
            twiddle_re,
            twiddle_im,
            bit_reversal,
        })
    }

    /// Forward transform in place (unnormalized)
    ///
    /// # Arguments
    /// * `real` - Real parts, length n
    /// * `imag` - Imaginary parts, length n
    pub fn forward(&self, real: &mut [f32], imag: &mut [f32]) -> Result<()> {
        self.check_buffers(real, imag)?;
        let n = self.fft_size;

        for i in 0..n {
            let j = self.bit_reversal[i];
            if i < j {
                real.swap(i, j);
                imag.swap(i, j);
            }
        }

        let mut len = 2;
        while len <= n {
            let half = len / 2;
            let step = n / len;
            for start in (0..n).step_by(len) {
                for j in 0..half {
                    let even = start + j;
                    let odd = even + half;
                    let w_re = self.twiddle_re[j * step];
                    let w_im = self.twiddle_im[j * step];

                    let re = real[odd] * w_re - imag[odd] * w_im;
                    let im = real[odd] * w_im + imag[odd] * w_re;

                    real[odd] = real[even] - re;
                    imag[odd] = imag[even] - im;
                    real[even] += re;
                    imag[even] += im;
                }
            }
            len <<= 1;
        }

        Ok(())
    }

    /// Inverse transform in place, scaled by 1/n
    ///
    /// Conjugates, runs the forward pass and conjugates again.
    pub fn inverse(&self, real: &mut [f32], imag: &mut [f32]) -> Result<()> {
        self.check_buffers(real, imag)?;

        for v in imag.iter_mut() {
            *v = -*v;
        }
        self.forward(real, imag)?;

        let inv_n = 1.0 / self.fft_size as f32;
        for (re, im) in real.iter_mut().zip(imag.iter_mut()) {
            *re *= inv_n;
            *im *= -inv_n;
        }

        Ok(())
    }

    /// Release the tables; later transforms report `Uninitialized`
    pub fn free(&mut self) {
        self.twiddle_re = Vec::new();
        self.twiddle_im = Vec::new();
        self.bit_reversal = Vec::new();
    }

    pub fn is_initialized(&self) -> bool {
        !self.bit_reversal.is_empty()
    }

    /// Get FFT size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Twiddle factors as (real, imaginary) tables
    pub fn twiddles(&self) -> (&[f32], &[f32]) {
        (&self.twiddle_re, &self.twiddle_im)
    }

    pub fn bit_reversal(&self) -> &[usize] {
        &self.bit_reversal
    }

    fn check_buffers(&self, real: &[f32], imag: &[f32]) -> Result<()> {
        if !self.is_initialized() {
            return Err(TransformError::Uninitialized);
        }
        for len in [real.len(), imag.len()] {
            if len != self.fft_size {
                return Err(TransformError::LengthMismatch {
                    expected: self.fft_size,
                    found: len,
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rustfft::{num_complex::Complex, FftPlanner};

    #[test]
    fn test_impulse_n8() {
        let fft = FftEngine::new(8).unwrap();
        let mut real = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let mut imag = [0.0f32; 8];

        fft.forward(&mut real, &mut imag).unwrap();

        assert_eq!(real, [1.0; 8]);
        assert_eq!(imag, [0.0; 8]);
    }

    #[test]
    fn test_impulse_flat_spectrum() {
        for shift in 0..12 {
            let n = 1usize << shift;
            let fft = FftEngine::new(n).unwrap();
            let mut real = vec![0.0f32; n];
            let mut imag = vec![0.0f32; n];
            real[0] = 1.0;

            fft.forward(&mut real, &mut imag).unwrap();

            for k in 0..n {
                assert!((real[k] - 1.0).abs() < 1e-6, "n = {}, bin {}: {}", n, k, real[k]);
                assert!(imag[k].abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_roundtrip_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for shift in 0..11 {
            let n = 1usize << shift;
            let fft = FftEngine::new(n).unwrap();
            let orig_re: Vec<f32> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let orig_im: Vec<f32> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();
            let mut real = orig_re.clone();
            let mut imag = orig_im.clone();

            fft.forward(&mut real, &mut imag).unwrap();
            fft.inverse(&mut real, &mut imag).unwrap();

            for i in 0..n {
                assert!((real[i] - orig_re[i]).abs() < 1e-3, "re: {} vs {}", real[i], orig_re[i]);
                assert!((imag[i] - orig_im[i]).abs() < 1e-3, "im: {} vs {}", imag[i], orig_im[i]);
            }
        }
    }

    #[test]
    fn test_matches_rustfft() {
        let n = 256;
        let mut rng = StdRng::seed_from_u64(7);
        let mut real: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut imag: Vec<f32> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
        let mut reference: Vec<Complex<f32>> = real
            .iter()
            .zip(imag.iter())
            .map(|(&re, &im)| Complex::new(re, im))
            .collect();

        FftPlanner::<f32>::new().plan_fft_forward(n).process(&mut reference);
        FftEngine::new(n).unwrap().forward(&mut real, &mut imag).unwrap();

        for k in 0..n {
            assert!((real[k] - reference[k].re).abs() < 1e-3);
            assert!((imag[k] - reference[k].im).abs() < 1e-3);
        }
    }

    #[test]
    fn test_sine_peak() {
        let n = 1024;
        let fft = FftEngine::new(n).unwrap();
        let bin = 37;
        let mut real: Vec<f32> = (0..n)
            .map(|i| (2.0 * PI * bin as f64 * i as f64 / n as f64).cos() as f32)
            .collect();
        let mut imag = vec![0.0f32; n];

        fft.forward(&mut real, &mut imag).unwrap();

        let mag = |k: usize| (real[k] * real[k] + imag[k] * imag[k]).sqrt();
        assert!((mag(bin) - n as f32 / 2.0).abs() < 0.5);
        assert!((mag(n - bin) - n as f32 / 2.0).abs() < 0.5);
        assert!(mag(bin + 5) < 1e-2);
    }

    #[test]
    fn test_bit_reversal_is_involution() {
        for shift in 0..13 {
            let fft = FftEngine::new(1 << shift).unwrap();
            let table = fft.bit_reversal();
            for i in 0..table.len() {
                assert_eq!(table[table[i]], i);
            }
        }

        let fft = FftEngine::new(8).unwrap();
        assert_eq!(fft.bit_reversal(), &[0, 4, 2, 6, 1, 5, 3, 7]);
    }

    #[test]
    fn test_twiddles() {
        let fft = FftEngine::new(4).unwrap();
        let (re, im) = fft.twiddles();
        assert_eq!(re.len(), 2);
        assert!((re[0] - 1.0).abs() < 1e-7 && im[0].abs() < 1e-7);
        assert!(re[1].abs() < 1e-7 && (im[1] + 1.0).abs() < 1e-7);
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        for n in [0, 3, 6, 12, 1000] {
            assert_eq!(FftEngine::new(n).unwrap_err(), TransformError::InvalidLength(n));
        }
    }

    #[test]
    fn test_length_mismatch_leaves_buffers() {
        let fft = FftEngine::new(8).unwrap();
        let mut real = vec![1.0f32; 4];
        let mut imag = vec![2.0f32; 8];

        let err = fft.inverse(&mut real, &mut imag).unwrap_err();
        assert_eq!(err, TransformError::LengthMismatch { expected: 8, found: 4 });
        assert!(imag.iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_free_is_idempotent() {
        let mut fft = FftEngine::new(16).unwrap();
        assert!(fft.is_initialized());

        fft.free();
        fft.free();
        assert!(!fft.is_initialized());

        let mut real = vec![0.0f32; 16];
        let mut imag = vec![0.0f32; 16];
        assert_eq!(fft.forward(&mut real, &mut imag), Err(TransformError::Uninitialized));
        assert_eq!(fft.inverse(&mut real, &mut imag), Err(TransformError::Uninitialized));
    }
}
