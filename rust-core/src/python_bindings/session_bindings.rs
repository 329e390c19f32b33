//! Python bindings for a capture session
//!
//! Python pushes captured blocks and polls the newest spectrum, the same
//! shape as the event channel the mobile plugins exposed.

use super::config_bindings::{session_err, PySpectrumLayout, PyWindowFunction};
use crate::audio::SampleProducer;
use crate::config::{CaptureConfig, SessionConfig, DEFAULT_BUFFER_CAPACITY};
use crate::error::SessionError;
use crate::session::{CaptureSession, LatestFrameSink};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Capture session exposed to Python
#[pyclass(name = "CaptureSession")]
pub struct PyCaptureSession {
    session: CaptureSession<LatestFrameSink>,
    reader: LatestFrameSink,
    producer: Option<SampleProducer>,
}

#[pymethods]
impl PyCaptureSession {
    /// Create a stopped session
    #[new]
    #[pyo3(signature = (frame_size=1024, sample_rate=44100, capture_rate_hz=20.0, window=PyWindowFunction::Rectangular, layout=PySpectrumLayout::HalfSpectrum))]
    fn new(
        frame_size: usize,
        sample_rate: u32,
        capture_rate_hz: f64,
        window: PyWindowFunction,
        layout: PySpectrumLayout,
    ) -> PyResult<Self> {
        let config = SessionConfig {
            capture: CaptureConfig {
                frame_size,
                sample_rate,
                capture_rate_hz,
                window: window.into(),
                amplitude_correction: false,
            },
            layout: layout.into(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
        };

        let reader = LatestFrameSink::new();
        let session = CaptureSession::new(config, reader.clone()).map_err(session_err)?;

        Ok(Self {
            session,
            reader,
            producer: None,
        })
    }

    fn start(&mut self) -> PyResult<()> {
        self.producer = Some(self.session.start().map_err(session_err)?);
        Ok(())
    }

    fn stop(&mut self) {
        self.session.stop();
        self.producer = None;
    }

    /// Queue captured samples and process them
    ///
    /// Returns:
    ///     Number of spectrum frames produced
    fn push(&mut self, samples: PyReadonlyArray1<f64>) -> PyResult<usize> {
        let samples = samples
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let producer = self
            .producer
            .as_mut()
            .ok_or_else(|| session_err(SessionError::NotRunning))?;
        producer.write(samples);

        self.session.pump().map_err(session_err)
    }

    /// Get the newest spectrum
    ///
    /// Returns:
    ///     Dictionary with keys 'sequence', 'captured_at' (seconds) and
    ///     'values', or None if nothing new arrived
    fn get_latest<'py>(&self, py: Python<'py>) -> PyResult<Option<&'py PyDict>> {
        let Some(event) = self.reader.take() else {
            return Ok(None);
        };

        let dict = PyDict::new(py);
        dict.set_item("sequence", event.sequence)?;
        dict.set_item("captured_at", event.captured_at.as_secs_f64())?;
        dict.set_item("values", PyArray1::from_vec(py, event.values))?;
        Ok(Some(dict))
    }

    /// Change the frame size
    fn set_capture_size(&mut self, size: usize) -> PyResult<()> {
        self.session.set_capture_size(size).map_err(session_err)
    }

    fn set_layout(&mut self, layout: PySpectrumLayout) {
        self.session.set_layout(layout.into());
    }

    fn is_running(&self) -> bool {
        self.session.is_running()
    }

    fn dispose(&mut self) {
        self.producer = None;
        self.session.dispose();
    }
}
