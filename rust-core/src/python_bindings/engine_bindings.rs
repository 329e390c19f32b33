//! Python bindings for the spectrum engine

use super::config_bindings::{engine_err, PyWindowFunction};
use crate::config::CaptureConfig;
use crate::spectrum::SpectrumEngine;
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Spectrum engine exposed to Python
#[pyclass(name = "SpectrumEngine")]
pub struct PySpectrumEngine {
    engine: SpectrumEngine,
}

#[pymethods]
impl PySpectrumEngine {
    /// Create a new spectrum engine
    ///
    /// Args:
    ///     frame_size: Transform length (power of two >= 2)
    ///     sample_rate: Sample rate in Hz (frequency axis only)
    ///     capture_rate_hz: Maximum frames per second
    ///     window: Window function
    ///     amplitude_correction: Undo the window's amplitude loss
    ///
    /// Raises:
    ///     ValueError: invalid frame size or rate
    #[new]
    #[pyo3(signature = (frame_size=1024, sample_rate=44100, capture_rate_hz=20.0, window=PyWindowFunction::Rectangular, amplitude_correction=false))]
    fn new(
        frame_size: usize,
        sample_rate: u32,
        capture_rate_hz: f64,
        window: PyWindowFunction,
        amplitude_correction: bool,
    ) -> PyResult<Self> {
        let config = CaptureConfig {
            frame_size,
            sample_rate,
            capture_rate_hz,
            window: window.into(),
            amplitude_correction,
        };

        Ok(Self {
            engine: SpectrumEngine::create(config).map_err(engine_err)?,
        })
    }

    /// Feed samples
    ///
    /// Returns:
    ///     Magnitude spectrum (frame_size/2 values) as numpy array, or None
    ///     when no frame is due yet
    fn ingest<'py>(
        &mut self,
        py: Python<'py>,
        samples: PyReadonlyArray1<f64>,
    ) -> PyResult<Option<&'py PyArray1<f64>>> {
        let samples = samples
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let frame = self.engine.ingest(samples).map_err(engine_err)?;
        Ok(frame.map(|f| PyArray1::from_vec(py, f.into_magnitudes())))
    }

    /// Replace the configuration; buffered samples are discarded
    #[pyo3(signature = (frame_size=None, sample_rate=None, capture_rate_hz=None, window=None, amplitude_correction=None))]
    fn reconfigure(
        &mut self,
        frame_size: Option<usize>,
        sample_rate: Option<u32>,
        capture_rate_hz: Option<f64>,
        window: Option<PyWindowFunction>,
        amplitude_correction: Option<bool>,
    ) -> PyResult<()> {
        let mut config = self
            .engine
            .config()
            .cloned()
            .ok_or_else(|| engine_err(crate::error::EngineError::Disposed))?;

        if let Some(size) = frame_size {
            config.frame_size = size;
        }
        if let Some(sr) = sample_rate {
            config.sample_rate = sr;
        }
        if let Some(rate) = capture_rate_hz {
            config.capture_rate_hz = rate;
        }
        if let Some(win) = window {
            config.window = win.into();
        }
        if let Some(corr) = amplitude_correction {
            config.amplitude_correction = corr;
        }

        self.engine.reconfigure(config).map_err(engine_err)
    }

    /// Release transform resources (safe to call twice)
    fn dispose(&mut self) {
        self.engine.dispose();
    }

    /// Get frequency of each emitted bin in Hz
    fn frequency_bins_hz<'py>(&self, py: Python<'py>) -> Option<&'py PyArray1<f64>> {
        self.engine
            .frequency_bins_hz()
            .map(|freqs| PyArray1::from_vec(py, freqs))
    }

    /// Get number of magnitudes per frame
    fn num_bins(&self) -> Option<usize> {
        self.engine.num_bins()
    }

    fn is_disposed(&self) -> bool {
        self.engine.is_disposed()
    }
}
