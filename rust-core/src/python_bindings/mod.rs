//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod config_bindings;
mod engine_bindings;
mod session_bindings;

/// Python module definition
#[pymodule]
fn spectrum_engine(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<engine_bindings::PySpectrumEngine>()?;
    m.add_class::<session_bindings::PyCaptureSession>()?;

    m.add_class::<config_bindings::PyWindowFunction>()?;
    m.add_class::<config_bindings::PySpectrumLayout>()?;

    Ok(())
}
