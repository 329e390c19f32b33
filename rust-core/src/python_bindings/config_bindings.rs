//! Python-facing configuration enums and error conversion

use crate::config::WindowFunction;
use crate::error::{EngineError, SessionError};
use crate::spectrum::SpectrumLayout;
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

/// Window function enum exposed to Python
#[pyclass(name = "WindowFunction")]
#[derive(Clone)]
pub enum PyWindowFunction {
    /// No taper
    Rectangular,
    Hann,
    Hamming,
}

impl From<PyWindowFunction> for WindowFunction {
    fn from(py_win: PyWindowFunction) -> Self {
        match py_win {
            PyWindowFunction::Rectangular => WindowFunction::None,
            PyWindowFunction::Hann => WindowFunction::Hann,
            PyWindowFunction::Hamming => WindowFunction::Hamming,
        }
    }
}

/// Spectrum layout enum exposed to Python
#[pyclass(name = "SpectrumLayout")]
#[derive(Clone)]
pub enum PySpectrumLayout {
    HalfSpectrum,
    AndroidVisualizer,
    IosAccelerate,
}

impl From<PySpectrumLayout> for SpectrumLayout {
    fn from(py_layout: PySpectrumLayout) -> Self {
        match py_layout {
            PySpectrumLayout::HalfSpectrum => SpectrumLayout::HalfSpectrum,
            PySpectrumLayout::AndroidVisualizer => SpectrumLayout::AndroidVisualizer,
            PySpectrumLayout::IosAccelerate => SpectrumLayout::IosAccelerate,
        }
    }
}

/// Configuration problems become ValueError, everything else RuntimeError
pub fn engine_err(err: EngineError) -> PyErr {
    match err {
        EngineError::Config(e) => PyValueError::new_err(e.to_string()),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

pub fn session_err(err: SessionError) -> PyErr {
    match err {
        SessionError::Engine(e) => engine_err(e),
        other => PyRuntimeError::new_err(other.to_string()),
    }
}
