//! Sample transport from capture sources, and live device capture with cpal

pub mod buffer;
#[cfg(feature = "capture")]
pub mod input;
#[cfg(feature = "capture")]
pub mod runner;

pub use buffer::{sample_queue, SampleConsumer, SampleProducer};
#[cfg(feature = "capture")]
pub use input::{list_input_devices, AudioDeviceInfo, AudioInput, CaptureError};
#[cfg(feature = "capture")]
pub use runner::CaptureRunner;
