//! Spectral analysis: windowing, transform, throttled frame emission

pub mod clock;
pub mod engine;
pub mod frame;
pub mod history;
pub mod layout;
pub mod transform;
pub mod windowing;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use engine::SpectrumEngine;
pub use frame::SpectrumFrame;
pub use layout::{SpectrumEvent, SpectrumLayout};
pub use transform::{ComplexFftTransform, RealFftTransform, Transform, TransformBackend};
pub use windowing::{apply_window_inplace, generate_window, window_correction_factor};
