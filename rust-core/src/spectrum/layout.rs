//! Host-facing frame layouts and the wire event
//!
//! The engine always produces the standard half-spectrum. Hosts whose UI was
//! tuned against one of the older platform analyzers can ask for that layout
//! instead; the conversion happens here, at the delivery boundary.

use super::frame::SpectrumFrame;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Arrangement of the values delivered to a sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpectrumLayout {
    /// N/2 magnitudes, DC through just below Nyquist
    #[default]
    HalfSpectrum,

    /// N/2 + 1 values as the Android Visualizer path produced them:
    /// |Nyquist| in slot 0 (the packed `fft[1]` byte), bins 1..N/2-1,
    /// and a trailing slot that was never written (0.0)
    AndroidVisualizer,

    /// N/4 squared magnitudes as the Accelerate `vDSP_fft_zrip` path
    /// produced them: zrip scales by 2 and packs Nyquist into bin 0's
    /// imaginary part, so slot 0 is (2·DC)² + (2·Nyquist)²
    IosAccelerate,
}

impl SpectrumLayout {
    /// Number of values this layout yields for a frame of length `frame_size`
    pub fn len(&self, frame_size: usize) -> usize {
        match self {
            SpectrumLayout::HalfSpectrum => frame_size / 2,
            SpectrumLayout::AndroidVisualizer => frame_size / 2 + 1,
            SpectrumLayout::IosAccelerate => frame_size / 4,
        }
    }

    /// Arrange `frame` into this layout
    ///
    /// # Arguments
    /// * `frame` - Engine output (N/2 magnitudes plus the Nyquist bin)
    ///
    /// # Returns
    /// `self.len(N)` values in the layout's order and scale
    pub fn render(&self, frame: &SpectrumFrame) -> Vec<f64> {
        let magnitudes = frame.magnitudes();

        match self {
            SpectrumLayout::HalfSpectrum => magnitudes.to_vec(),

            SpectrumLayout::AndroidVisualizer => {
                let mut values = Vec::with_capacity(magnitudes.len() + 1);
                values.push(frame.nyquist());
                values.extend_from_slice(magnitudes.get(1..).unwrap_or(&[]));
                values.push(0.0);
                values
            }

            SpectrumLayout::IosAccelerate => {
                let count = self.len(frame.frame_size());
                let mut values: Vec<f64> = magnitudes[..count]
                    .iter()
                    .map(|&mag| 4.0 * mag * mag)
                    .collect();
                if let Some(first) = values.first_mut() {
                    *first += 4.0 * frame.nyquist() * frame.nyquist();
                }
                values
            }
        }
    }
}

/// One delivery to a sink
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpectrumEvent {
    pub sequence: u64,
    pub captured_at: Duration,
    pub layout: SpectrumLayout,
    pub values: Vec<f64>,
}

impl SpectrumEvent {
    pub fn from_frame(frame: &SpectrumFrame, layout: SpectrumLayout) -> Self {
        Self {
            sequence: frame.sequence(),
            captured_at: frame.captured_at(),
            layout,
            values: layout.render(frame),
        }
    }

    /// Legacy wire payload: a JSON list of f64, DC first
    pub fn to_wire_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> SpectrumFrame {
        // N = 8: bins 0..3 plus Nyquist
        SpectrumFrame::new(3, Duration::from_millis(40), vec![1.0, 2.0, 3.0, 4.0], 5.0)
    }

    #[test]
    fn test_half_spectrum() {
        let values = SpectrumLayout::HalfSpectrum.render(&frame());
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_android_layout() {
        let values = SpectrumLayout::AndroidVisualizer.render(&frame());
        assert_eq!(values, vec![5.0, 2.0, 3.0, 4.0, 0.0]);
        assert_eq!(values.len(), SpectrumLayout::AndroidVisualizer.len(8));
    }

    #[test]
    fn test_ios_layout() {
        let values = SpectrumLayout::IosAccelerate.render(&frame());
        assert_eq!(values, vec![4.0 + 100.0, 16.0]);
        assert_eq!(values.len(), SpectrumLayout::IosAccelerate.len(8));
    }

    #[test]
    fn test_smallest_frame() {
        let tiny = SpectrumFrame::new(0, Duration::ZERO, vec![2.0], 1.0);

        assert_eq!(SpectrumLayout::AndroidVisualizer.render(&tiny), vec![1.0, 0.0]);
        assert!(SpectrumLayout::IosAccelerate.render(&tiny).is_empty());
    }

    #[test]
    fn test_wire_json() {
        let event = SpectrumEvent::from_frame(&frame(), SpectrumLayout::HalfSpectrum);
        assert_eq!(event.sequence, 3);
        assert_eq!(event.to_wire_json().unwrap(), "[1.0,2.0,3.0,4.0]");

        let parsed: Vec<f64> = serde_json::from_str(&event.to_wire_json().unwrap()).unwrap();
        assert_eq!(parsed, event.values);
    }
}
