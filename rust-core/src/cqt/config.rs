//! Constant-Q transform configuration

use crate::error::{Result, TransformError};

/// Kernel bank parameters
#[derive(Debug, Clone, PartialEq)]
pub struct CqtConfig {
    /// Bins per octave (12 = semitone resolution)
    pub bins_per_octave: usize,

    /// Number of octaves covered above `min_freq`
    pub octaves: usize,

    /// Kernel length; must equal the FFT engine's length
    pub fft_size: usize,

    /// Sample rate in Hz
    pub sample_rate: f32,

    /// Centre frequency of bin 0 in Hz
    pub min_freq: f32,
}

impl Default for CqtConfig {
    fn default() -> Self {
        Self {
            bins_per_octave: 12,
            octaves: 7,
            fft_size: 8192,
            sample_rate: 44100.0,
            min_freq: 32.70, // C1
        }
    }
}

impl CqtConfig {
    pub fn new(bins_per_octave: usize, octaves: usize, fft_size: usize, sample_rate: f32, min_freq: f32) -> Self {
        Self {
            bins_per_octave,
            octaves,
            fft_size,
            sample_rate,
            min_freq,
        }
    }

    pub fn with_bins_per_octave(mut self, bins_per_octave: usize) -> Self {
        self.bins_per_octave = bins_per_octave;
        self
    }

    pub fn with_octaves(mut self, octaves: usize) -> Self {
        self.octaves = octaves;
        self
    }

    pub fn with_fft_size(mut self, fft_size: usize) -> Self {
        self.fft_size = fft_size;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_min_freq(mut self, min_freq: f32) -> Self {
        self.min_freq = min_freq;
        self
    }

    /// Reject any non-positive parameter
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("bins_per_octave", self.bins_per_octave),
            ("octaves", self.octaves),
            ("fft_size", self.fft_size),
        ];
        for (name, value) in counts {
            if value == 0 {
                return Err(TransformError::InvalidParameter { name, value: 0.0 });
            }
        }

        let rates = [("sample_rate", self.sample_rate), ("min_freq", self.min_freq)];
        for (name, value) in rates {
            // NaN fails this comparison too
            if !(value > 0.0) {
                return Err(TransformError::InvalidParameter {
                    name,
                    value: value as f64,
                });
            }
        }

        if self.bins_per_octave.checked_mul(self.octaves).is_none() {
            return Err(TransformError::Allocation);
        }

        Ok(())
    }

    /// Total number of bins (bins_per_octave * octaves)
    pub fn total_bins(&self) -> usize {
        self.bins_per_octave.saturating_mul(self.octaves)
    }

    /// Q = 1 / (2^(1/B) - 1), shared by every bin
    pub fn quality_factor(&self) -> f32 {
        1.0 / (2.0f32.powf(1.0 / self.bins_per_octave as f32) - 1.0)
    }

    /// Centre frequency of bin k: f_min * 2^(k/B)
    pub fn center_frequency(&self, k: usize) -> f32 {
        self.min_freq * 2.0f32.powf(k as f32 / self.bins_per_octave as f32)
    }

    pub fn nyquist(&self) -> f32 {
        self.sample_rate / 2.0
    }

    /// Time-domain kernel length for bin k, clamped to the FFT size
    ///
    /// `None` when the bin sits at or above Nyquist and carries no kernel.
    pub fn filter_length(&self, k: usize) -> Option<usize> {
        let freq = self.center_frequency(k);
        if !(freq > 0.0) || freq >= self.nyquist() {
            return None;
        }

        let len = (self.quality_factor() * self.sample_rate / freq).ceil();
        if !(len >= 1.0) {
            return None;
        }
        Some((len as usize).min(self.fft_size))
    }
}
