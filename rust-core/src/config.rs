//! Capture and session configuration

use crate::error::ConfigError;
use crate::spectrum::layout::SpectrumLayout;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default ring buffer capacity between capture thread and session (samples)
pub const DEFAULT_BUFFER_CAPACITY: usize = 96000;

/// Window applied to each frame before the transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowFunction {
    /// No taper (identity), matches the legacy unwindowed analyzers
    #[default]
    None,

    /// Hann window: w[n] = 0.5 - 0.5*cos(2πn/N)
    Hann,

    /// Hamming window: w[n] = 0.54 - 0.46*cos(2πn/N)
    Hamming,
}

/// Engine configuration
///
/// Fixed for the lifetime of one engine configuration; changing any field
/// goes through `SpectrumEngine::reconfigure`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Transform length in samples (power of two >= 2)
    pub frame_size: usize,

    /// Sample rate in Hz, used only to label the frequency axis
    pub sample_rate: u32,

    /// Maximum number of spectrum frames emitted per second
    pub capture_rate_hz: f64,

    /// Window function
    pub window: WindowFunction,

    /// Scale magnitudes by N / Σw[n] to undo the window's amplitude loss
    pub amplitude_correction: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            sample_rate: 44100,
            capture_rate_hz: 20.0,
            window: WindowFunction::None,
            amplitude_correction: false,
        }
    }
}

impl CaptureConfig {
    /// Set the capture rate from millihertz, the unit Android's Visualizer reports
    pub fn with_capture_rate_millihertz(mut self, millihertz: u32) -> Self {
        self.capture_rate_hz = millihertz as f64 / 1000.0;
        self
    }

    /// Check every field, reporting the first invalid one
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.frame_size < 2 || !self.frame_size.is_power_of_two() {
            return Err(ConfigError::InvalidFrameSize(self.frame_size));
        }

        if self.sample_rate == 0 {
            return Err(ConfigError::InvalidRate {
                name: "sample_rate",
                value: 0.0,
            });
        }

        if !(self.capture_rate_hz.is_finite() && self.capture_rate_hz > 0.0) {
            return Err(ConfigError::InvalidRate {
                name: "capture_rate_hz",
                value: self.capture_rate_hz,
            });
        }

        Ok(())
    }

    /// Minimum time between two emitted frames
    ///
    /// Only meaningful on a validated config.
    pub fn capture_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.capture_rate_hz)
    }

    /// Number of magnitudes in every emitted frame
    pub fn num_bins(&self) -> usize {
        self.frame_size / 2
    }
}

/// Configuration of one capture session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub capture: CaptureConfig,

    /// Layout of the values handed to the sink
    pub layout: SpectrumLayout,

    /// Ring buffer capacity in samples between capture thread and engine
    pub buffer_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            layout: SpectrumLayout::HalfSpectrum,
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        }
    }
}

impl SessionConfig {
    /// Parse a configuration sent by the host as JSON
    ///
    /// Missing fields take their defaults; the result is not validated here.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_bins(), 512);
        assert_eq!(config.capture_interval(), Duration::from_millis(50));
    }

    #[test]
    fn test_frame_size_validation() {
        for size in [0, 1, 3, 1000, 1023] {
            let config = CaptureConfig {
                frame_size: size,
                ..Default::default()
            };
            assert_eq!(config.validate(), Err(ConfigError::InvalidFrameSize(size)));
        }

        for size in [2, 4, 256, 1024, 8192] {
            let config = CaptureConfig {
                frame_size: size,
                ..Default::default()
            };
            assert!(config.validate().is_ok());
        }
    }

    #[test]
    fn test_rate_validation() {
        let zero_rate = CaptureConfig {
            sample_rate: 0,
            ..Default::default()
        };
        assert!(matches!(
            zero_rate.validate(),
            Err(ConfigError::InvalidRate { name: "sample_rate", .. })
        ));

        for rate in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let config = CaptureConfig {
                capture_rate_hz: rate,
                ..Default::default()
            };
            assert!(matches!(
                config.validate(),
                Err(ConfigError::InvalidRate { name: "capture_rate_hz", .. })
            ));
        }
    }

    #[test]
    fn test_millihertz() {
        let config = CaptureConfig::default().with_capture_rate_millihertz(20000);
        assert!((config.capture_rate_hz - 20.0).abs() < 1e-12);
    }

    #[test]
    fn test_session_config_from_json() {
        let config = SessionConfig::from_json(
            r#"{"capture": {"frame_size": 2048, "window": "hann"}, "layout": "android_visualizer"}"#,
        )
        .unwrap();

        assert_eq!(config.capture.frame_size, 2048);
        assert_eq!(config.capture.window, WindowFunction::Hann);
        assert_eq!(config.capture.sample_rate, 44100);
        assert_eq!(config.layout, SpectrumLayout::AndroidVisualizer);
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
    }
}
