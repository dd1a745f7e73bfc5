//! High-level constant-Q analyzer
//!
//! Combines the FFT engine with a CQT kernel bank for time-domain input.

use super::fft::FftEngine;
use super::windowing::{apply_hann_inplace, window_correction_factor};
use crate::cqt::{CqtConfig, CqtEngine};
use crate::error::{try_zeroed, Result};
use num_complex::Complex32;

/// Analyzer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyzerConfig {
    /// Kernel bank parameters (also fixes the FFT size)
    pub cqt: CqtConfig,

    /// Apply a Hann window to each input frame before the FFT
    pub window_input: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            cqt: CqtConfig::default(),
            window_input: false,
        }
    }
}

/// Real-time constant-Q analyzer
pub struct ConstantQAnalyzer {
    config: AnalyzerConfig,
    fft: FftEngine,
    cqt: CqtEngine,
    correction_factor: f32,
    frame_re: Vec<f32>,
    frame_im: Vec<f32>,
}

impl ConstantQAnalyzer {
    /// Create new analyzer
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        config.cqt.validate()?;
        let fft = FftEngine::new(config.cqt.fft_size)?;
        let cqt = CqtEngine::new(&config.cqt, &fft)?;
        let n = config.cqt.fft_size;

        Ok(Self {
            correction_factor: correction_for(&config),
            frame_re: try_zeroed(n)?,
            frame_im: try_zeroed(n)?,
            config,
            fft,
            cqt,
        })
    }

    /// Analyze a real signal and return complex CQT coefficients
    ///
    /// # Arguments
    /// * `signal` - Input frame (zero-padded or truncated to the FFT size)
    pub fn analyze_complex(&mut self, signal: &[f32]) -> Result<Vec<Complex32>> {
        let n = self.fft.fft_size();
        let copy_len = signal.len().min(n);
        self.frame_re[..copy_len].copy_from_slice(&signal[..copy_len]);
        self.frame_re[copy_len..].fill(0.0);
        self.frame_im.fill(0.0);

        if self.config.window_input {
            apply_hann_inplace(&mut self.frame_re[..copy_len]);
        }

        self.fft.forward(&mut self.frame_re, &mut self.frame_im)?;
        let mut coeffs = self.cqt.apply_all(&self.frame_re, &self.frame_im)?;

        if self.config.window_input {
            for c in coeffs.iter_mut() {
                *c *= self.correction_factor;
            }
        }

        Ok(coeffs)
    }

    /// Analyze signal and return per-bin magnitudes
    pub fn analyze(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        Ok(self.analyze_complex(signal)?.iter().map(|c| c.norm()).collect())
    }

    /// Analyze and return magnitude in dB: 20*log10(|X[k]|/reference)
    pub fn analyze_db(&mut self, signal: &[f32], reference: f32) -> Result<Vec<f32>> {
        let magnitude = self.analyze(signal)?;
        Ok(magnitude
            .iter()
            .map(|&mag| {
                let mag_clamped = mag.max(1e-10); // Avoid log(0)
                20.0 * (mag_clamped / reference).log10()
            })
            .collect())
    }

    /// Per-bin phase in radians
    pub fn analyze_phase(&mut self, signal: &[f32]) -> Result<Vec<f32>> {
        Ok(self.analyze_complex(signal)?.iter().map(|c| c.arg()).collect())
    }

    /// Bin centre frequencies in Hz
    pub fn frequencies(&self) -> Vec<f32> {
        self.cqt.frequencies()
    }

    /// Update configuration, rebuilding engines only when the bank changes
    pub fn update_config(&mut self, config: AnalyzerConfig) -> Result<()> {
        if config.cqt != self.config.cqt {
            config.cqt.validate()?;
            let fft = if config.cqt.fft_size != self.fft.fft_size() {
                FftEngine::new(config.cqt.fft_size)?
            } else {
                self.fft.clone()
            };
            let cqt = CqtEngine::new(&config.cqt, &fft)?;
            let n = config.cqt.fft_size;
            self.frame_re = try_zeroed(n)?;
            self.frame_im = try_zeroed(n)?;
            self.fft = fft;
            self.cqt = cqt;
        }

        self.correction_factor = correction_for(&config);
        self.config = config;
        Ok(())
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    pub fn num_bins(&self) -> usize {
        self.cqt.total_bins()
    }
}

fn correction_for(config: &AnalyzerConfig) -> f32 {
    if config.window_input {
        window_correction_factor(config.cqt.fft_size)
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn small_config() -> AnalyzerConfig {
        AnalyzerConfig {
            cqt: CqtConfig::new(12, 3, 4096, 22050.0, 110.0),
            window_input: false,
        }
    }

    fn peak_bin(spectrum: &[f32]) -> usize {
        spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .map(|(k, _)| k)
            .unwrap()
    }

    #[test]
    fn test_analyzer_basic() {
        let mut analyzer = ConstantQAnalyzer::new(small_config()).unwrap();
        assert_eq!(analyzer.num_bins(), 36);

        // A3 = 220 Hz sits on bin 12
        let signal: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 220.0 * i as f32 / 22050.0).sin())
            .collect();
        let spectrum = analyzer.analyze(&signal).unwrap();

        assert_eq!(spectrum.len(), 36);
        assert_eq!(peak_bin(&spectrum), 12);

        let freqs = analyzer.frequencies();
        assert!((freqs[12] - 220.0).abs() < 0.01);
    }

    #[test]
    fn test_analyzer_db() {
        let mut analyzer = ConstantQAnalyzer::new(small_config()).unwrap();

        let silence = vec![0.0f32; 4096];
        let spectrum_db = analyzer.analyze_db(&silence, 1.0).unwrap();
        assert!(spectrum_db.iter().all(|&db| (db + 200.0).abs() < 1e-3));
    }

    #[test]
    fn test_short_signal_is_zero_padded() {
        let mut analyzer = ConstantQAnalyzer::new(small_config()).unwrap();
        let signal: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let phase = analyzer.analyze_phase(&signal).unwrap();
        assert_eq!(phase.len(), 36);
    }

    #[test]
    fn test_update_config() {
        let mut analyzer = ConstantQAnalyzer::new(small_config()).unwrap();

        let mut config = small_config();
        config.cqt.octaves = 2;
        config.window_input = true;
        analyzer.update_config(config).unwrap();
        assert_eq!(analyzer.num_bins(), 24);

        let signal: Vec<f32> = (0..4096)
            .map(|i| (2.0 * PI * 220.0 * i as f32 / 22050.0).sin())
            .collect();
        let spectrum = analyzer.analyze(&signal).unwrap();
        assert_eq!(spectrum.len(), 24);
        assert!((11..=13).contains(&peak_bin(&spectrum)));

        let mut bad = small_config();
        bad.cqt.fft_size = 1000;
        assert!(analyzer.update_config(bad).is_err());
        assert_eq!(analyzer.num_bins(), 24);
    }
}
