//! Spectrum frames emitted by the engine

use serde::Serialize;
use std::time::Duration;

/// One magnitude spectrum
///
/// `magnitudes` holds bins 0..N/2 (DC through just below Nyquist).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumFrame {
    sequence: u64,
    captured_at: Duration,
    magnitudes: Vec<f64>,
    nyquist: f64,
}

impl SpectrumFrame {
    pub(crate) fn new(
        sequence: u64,
        captured_at: Duration,
        magnitudes: Vec<f64>,
        nyquist: f64,
    ) -> Self {
        Self {
            sequence,
            captured_at,
            magnitudes,
            nyquist,
        }
    }

    /// Per-engine sequence number, strictly increasing
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    /// Time since engine creation at which the frame was produced
    pub fn captured_at(&self) -> Duration {
        self.captured_at
    }

    /// Half-spectrum magnitudes, DC first
    pub fn magnitudes(&self) -> &[f64] {
        &self.magnitudes
    }

    /// Magnitude of the Nyquist bin (not part of `magnitudes`)
    pub fn nyquist(&self) -> f64 {
        self.nyquist
    }

    /// Frame length N the spectrum was computed from
    pub fn frame_size(&self) -> usize {
        self.magnitudes.len() * 2
    }

    pub fn into_magnitudes(self) -> Vec<f64> {
        self.magnitudes
    }

    /// Bin with the largest magnitude and its value
    pub fn peak(&self) -> Option<(usize, f64)> {
        self.magnitudes
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best, (bin, mag)| match best {
                Some((_, best_mag)) if best_mag >= mag => best,
                _ => Some((bin, mag)),
            })
    }

    /// Magnitudes in dB: 20*log10(|X[k]|/reference)
    pub fn magnitudes_db(&self, reference: f64) -> Vec<f64> {
        self.magnitudes
            .iter()
            .map(|&mag| {
                let mag_clamped = mag.max(1e-10); // Avoid log(0)
                20.0 * (mag_clamped / reference).log10()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peak() {
        let frame = SpectrumFrame::new(0, Duration::ZERO, vec![0.5, 3.0, 1.0, 3.0], 0.0);
        assert_eq!(frame.peak(), Some((1, 3.0)));
        assert_eq!(frame.frame_size(), 8);

        let empty = SpectrumFrame::new(0, Duration::ZERO, Vec::new(), 0.0);
        assert_eq!(empty.peak(), None);
    }

    #[test]
    fn test_magnitudes_db() {
        let frame = SpectrumFrame::new(0, Duration::ZERO, vec![1.0, 10.0, 0.0], 0.0);
        let db = frame.magnitudes_db(1.0);

        assert!(db[0].abs() < 1e-12);
        assert!((db[1] - 20.0).abs() < 1e-12);
        assert!((db[2] + 200.0).abs() < 1e-9);
    }
}
