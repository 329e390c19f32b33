//! Spectrum Engine - real-time magnitude spectra for audio visualizers
//!
//! Turns raw PCM blocks into throttled half-spectrum frames, with capture
//! sessions and sinks for delivering them to a host UI.

// Suppress PyO3 non-local impl warnings (harmless macro-generated code)
#![cfg_attr(feature = "python", allow(non_local_definitions))]

pub mod audio;
pub mod config;
pub mod error;
pub mod session;
pub mod spectrum;
#[cfg(feature = "python")]
pub mod python_bindings;

pub use config::{CaptureConfig, SessionConfig, WindowFunction};
pub use error::{ConfigError, EngineError, SessionError, SinkError, TransformError};
pub use session::{CaptureSession, SpectrumSink};
pub use spectrum::{SpectrumEngine, SpectrumEvent, SpectrumFrame, SpectrumLayout, TransformBackend};
