//! Window functions for spectral analysis
//!
//! Applied to each frame before the transform to reduce spectral leakage.
//! Windows use the periodic (DFT-even) form, dividing by N rather than N-1,
//! so a length-N window tiles exactly over an N-point transform.

use crate::config::WindowFunction;
use std::f64::consts::PI;

impl WindowFunction {
    /// Coefficient w[n] of a length-`length` window
    pub fn coefficient(&self, n: usize, length: usize) -> f64 {
        let angle = 2.0 * PI * n as f64 / length as f64;
        match self {
            WindowFunction::None => 1.0,
            WindowFunction::Hann => 0.5 - 0.5 * angle.cos(),
            WindowFunction::Hamming => 0.54 - 0.46 * angle.cos(),
        }
    }
}

/// Fill `window` with the coefficients of `function`
pub fn fill_window(window: &mut [f64], function: WindowFunction) {
    let length = window.len();
    for (n, w) in window.iter_mut().enumerate() {
        *w = function.coefficient(n, length);
    }
}

/// Generate window coefficients w[n] for n = 0..length-1
pub fn generate_window(function: WindowFunction, length: usize) -> Vec<f64> {
    let mut window = vec![0.0; length];
    fill_window(&mut window, function);
    window
}

/// Multiply `signal` by precomputed window coefficients in-place
pub fn apply_window_inplace(signal: &mut [f64], window: &[f64]) {
    for (s, w) in signal.iter_mut().zip(window.iter()) {
        *s *= w;
    }
}

/// Calculate window correction factor
///
/// Windowing lowers the amplitude of a sinusoid's peak by the window's
/// coherent gain Σw[n]/N. Multiplying FFT magnitudes by this factor undoes it.
pub fn window_correction_factor(window: &[f64]) -> f64 {
    let sum: f64 = window.iter().sum();
    if sum > 0.0 {
        window.len() as f64 / sum
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_is_identity() {
        let window = generate_window(WindowFunction::None, 64);
        assert!(window.iter().all(|&w| w == 1.0));

        let mut signal = vec![0.25; 64];
        apply_window_inplace(&mut signal, &window);
        assert!(signal.iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_hann_shape() {
        let window = generate_window(WindowFunction::Hann, 64);

        // Periodic form: zero at n = 0, peak of 1.0 at N/2
        assert!(window[0].abs() < 1e-12);
        assert!((window[32] - 1.0).abs() < 1e-12);

        // Symmetric about N/2
        for n in 1..32 {
            assert!((window[n] - window[64 - n]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_hamming_endpoints() {
        let window = generate_window(WindowFunction::Hamming, 128);

        // Hamming has non-zero endpoints (0.08)
        assert!((window[0] - 0.08).abs() < 1e-12);
        assert!((window[64] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_correction_factor() {
        let rect = generate_window(WindowFunction::None, 256);
        let hann = generate_window(WindowFunction::Hann, 256);
        let hamming = generate_window(WindowFunction::Hamming, 256);

        assert!((window_correction_factor(&rect) - 1.0).abs() < 1e-12);

        // Periodic Hann sums to exactly N/2
        assert!((window_correction_factor(&hann) - 2.0).abs() < 1e-9);

        // Hamming coherent gain is 0.54
        assert!((window_correction_factor(&hamming) - 1.0 / 0.54).abs() < 1e-9);
    }
}
