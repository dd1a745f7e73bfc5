//! Hann windowing for kernel construction and signal analysis

use std::f32::consts::PI;

/// Hann window sample: w[i] = 0.5 - 0.5*cos(2πi/(L-1))
///
/// A single-sample window is 1.0.
#[inline]
pub fn hann(i: usize, length: usize) -> f32 {
    if length <= 1 {
        return 1.0;
    }
    let angle = 2.0 * PI * i as f32 / (length - 1) as f32;
    0.5 - 0.5 * angle.cos()
}

/// Generate Hann window coefficients for n = 0..length-1
pub fn hann_window(length: usize) -> Vec<f32> {
    (0..length).map(|i| hann(i, length)).collect()
}

/// Apply Hann window in-place
pub fn apply_hann_inplace(signal: &mut [f32]) {
    let length = signal.len();
    for (i, s) in signal.iter_mut().enumerate() {
        *s *= hann(i, length);
    }
}

/// Amplitude correction factor (multiply magnitudes by this)
pub fn window_correction_factor(length: usize) -> f32 {
    let sum: f32 = hann_window(length).iter().sum();
    length as f32 / sum
}
