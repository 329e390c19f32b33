//! Audio input capture using cpal
//!
//! Feeds channel 0 of the device's interleaved stream into a sample queue.

use super::buffer::SampleProducer;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, SampleFormat, Stream, StreamConfig, SupportedStreamConfig};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("No audio input device found")]
    NoDevice,

    #[error("Input device not found: {0}")]
    DeviceNotFound(String),

    #[error("Failed to get device name: {0}")]
    DeviceName(String),

    #[error("Failed to get default config: {0}")]
    DefaultConfig(String),

    #[error("Unsupported sample format: {0}")]
    UnsupportedFormat(String),

    #[error("Failed to build stream: {0}")]
    BuildStream(String),

    #[error("Failed to play stream: {0}")]
    PlayStream(String),

    #[error(transparent)]
    Session(#[from] crate::error::SessionError),

    #[error("Processing thread panicked")]
    ThreadPanicked,
}

/// Audio input device information
#[derive(Debug, Clone)]
pub struct AudioDeviceInfo {
    pub name: String,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioDeviceInfo {
    fn from_config(name: String, config: &SupportedStreamConfig) -> Self {
        Self {
            name,
            sample_rate: config.sample_rate().0,
            channels: config.channels(),
        }
    }
}

/// Default input device and its description
pub fn default_input_device() -> Result<(Device, AudioDeviceInfo), CaptureError> {
    let host = cpal::default_host();
    let device = host.default_input_device().ok_or(CaptureError::NoDevice)?;
    let info = describe(&device)?;
    Ok((device, info))
}

/// Input device with the given name
pub fn input_device_by_name(name: &str) -> Result<(Device, AudioDeviceInfo), CaptureError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::DeviceName(e.to_string()))?;

    for device in devices {
        if device.name().map(|n| n == name).unwrap_or(false) {
            let info = describe(&device)?;
            return Ok((device, info));
        }
    }

    Err(CaptureError::DeviceNotFound(name.to_string()))
}

fn describe(device: &Device) -> Result<AudioDeviceInfo, CaptureError> {
    let config = default_config(device)?;
    describe_with(device, &config)
}

fn describe_with(
    device: &Device,
    config: &SupportedStreamConfig,
) -> Result<AudioDeviceInfo, CaptureError> {
    let name = device
        .name()
        .map_err(|e| CaptureError::DeviceName(e.to_string()))?;

    Ok(AudioDeviceInfo::from_config(name, config))
}

fn default_config(device: &Device) -> Result<SupportedStreamConfig, CaptureError> {
    device
        .default_input_config()
        .map_err(|e| CaptureError::DefaultConfig(e.to_string()))
}

/// Audio input stream
pub struct AudioInput {
    stream: Stream,
    device_info: AudioDeviceInfo,
}

impl AudioInput {
    /// Open a capture stream on `device` writing into `producer`
    ///
    /// The stream is created paused; call `start`.
    pub fn open(device: &Device, mut producer: SampleProducer) -> Result<Self, CaptureError> {
        let config = default_config(device)?;
        let device_info = describe_with(device, &config)?;

        let sample_format = config.sample_format();
        let stream_config: StreamConfig = config.into();
        let channels = (stream_config.channels as usize).max(1);

        let on_error = |err: cpal::StreamError| log::warn!("Audio input stream error: {}", err);

        // Channel 0 only: the engine consumes a single channel and does not mix
        let stream = match sample_format {
            SampleFormat::F32 => device.build_input_stream(
                &stream_config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    producer.write_iter(data.iter().step_by(channels).map(|&s| s as f64));
                },
                on_error,
                None,
            ),
            SampleFormat::I16 => device.build_input_stream(
                &stream_config,
                move |data: &[i16], _: &cpal::InputCallbackInfo| {
                    producer.write_iter(
                        data.iter()
                            .step_by(channels)
                            .map(|&s| s as f64 / i16::MAX as f64),
                    );
                },
                on_error,
                None,
            ),
            other => return Err(CaptureError::UnsupportedFormat(format!("{:?}", other))),
        }
        .map_err(|e| CaptureError::BuildStream(e.to_string()))?;

        Ok(Self {
            stream,
            device_info,
        })
    }

    /// Start capturing audio
    pub fn start(&self) -> Result<(), CaptureError> {
        self.stream
            .play()
            .map_err(|e| CaptureError::PlayStream(e.to_string()))
    }

    /// Pause audio capture
    pub fn pause(&self) -> Result<(), CaptureError> {
        self.stream
            .pause()
            .map_err(|e| CaptureError::PlayStream(e.to_string()))
    }

    /// Get device information
    pub fn device_info(&self) -> &AudioDeviceInfo {
        &self.device_info
    }
}

/// List available audio input devices
pub fn list_input_devices() -> Result<Vec<AudioDeviceInfo>, CaptureError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| CaptureError::DeviceName(e.to_string()))?;

    Ok(devices.filter_map(|device| describe(&device).ok()).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    use cpal::{SampleRate, SupportedBufferSize};

    #[test]
    fn test_device_info_from_config() {
        let config = SupportedStreamConfig::new(
            2,
            SampleRate(48000),
            SupportedBufferSize::Unknown,
            SampleFormat::F32,
        );
        let info = AudioDeviceInfo::from_config("Line In".to_string(), &config);

        assert_eq!(info.name, "Line In");
        assert_eq!(info.sample_rate, 48000);
        assert_eq!(info.channels, 2);
    }

    #[test]
    fn test_list_devices() {
        // Machines without audio hardware return an error or an empty list
        if let Ok(devices) = list_input_devices() {
            for device in devices {
                assert!(!device.name.is_empty());
                assert!(device.sample_rate > 0);
                assert!(device.channels > 0);
            }
        }
    }
}
