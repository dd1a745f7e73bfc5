//! Spectral analysis with FFT

pub mod fft;
pub mod windowing;
pub mod analysis;

pub use fft::FftEngine;
pub use windowing::{hann, hann_window};
pub use analysis::{AnalyzerConfig, ConstantQAnalyzer};
