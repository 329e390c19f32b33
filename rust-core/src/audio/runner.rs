//! Live capture: cpal input → sample queue → session on a processing thread

use super::input::{
    default_input_device, input_device_by_name, AudioDeviceInfo, AudioInput, CaptureError,
};
use crate::config::SessionConfig;
use crate::error::SessionError;
use crate::session::{CaptureSession, SpectrumSink};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

/// Idle wait when the queue is empty
const IDLE_SLEEP: Duration = Duration::from_millis(1);

/// Owns a device stream and the thread that pumps its session
pub struct CaptureRunner {
    input: Option<AudioInput>,
    thread: Option<JoinHandle<Result<(), SessionError>>>,
    running: Arc<AtomicBool>,
}

impl CaptureRunner {
    /// Capture from the default input device
    pub fn start<S>(config: SessionConfig, sink: S) -> Result<Self, CaptureError>
    where
        S: SpectrumSink + Send + 'static,
    {
        let (device, info) = default_input_device()?;
        Self::start_on(device, info, config, sink)
    }

    /// Capture from the input device called `name`
    pub fn start_named<S>(name: &str, config: SessionConfig, sink: S) -> Result<Self, CaptureError>
    where
        S: SpectrumSink + Send + 'static,
    {
        let (device, info) = input_device_by_name(name)?;
        Self::start_on(device, info, config, sink)
    }

    fn start_on<S>(
        device: cpal::Device,
        info: AudioDeviceInfo,
        mut config: SessionConfig,
        sink: S,
    ) -> Result<Self, CaptureError>
    where
        S: SpectrumSink + Send + 'static,
    {
        // Label the frequency axis with what the device actually delivers
        config.capture.sample_rate = info.sample_rate;

        let mut session = CaptureSession::new(config, sink)?;
        let producer = session.start()?;

        let input = AudioInput::open(&device, producer)?;
        input.start()?;

        log::info!(
            "Capturing from '{}' ({} Hz, {} channels)",
            info.name,
            info.sample_rate,
            info.channels
        );

        let running = Arc::new(AtomicBool::new(true));
        let thread_running = Arc::clone(&running);

        let thread = std::thread::spawn(move || {
            let result = pump_loop(&mut session, &thread_running);
            session.dispose();
            result
        });

        Ok(Self {
            input: Some(input),
            thread: Some(thread),
            running,
        })
    }

    pub fn device_info(&self) -> Option<&AudioDeviceInfo> {
        self.input.as_ref().map(AudioInput::device_info)
    }

    /// Whether the processing thread is still pumping
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
            && self.thread.as_ref().map(|t| !t.is_finished()).unwrap_or(false)
    }

    /// Stop capture and join the processing thread
    ///
    /// Returns the error that ended the thread early, if any. Idempotent.
    pub fn stop(&mut self) -> Result<(), CaptureError> {
        self.running.store(false, Ordering::SeqCst);

        let paused = match self.input.take() {
            Some(input) => input.pause(),
            None => Ok(()),
        };

        // Join even if pausing failed
        let joined = match self.thread.take() {
            Some(handle) => match handle.join() {
                Ok(result) => result.map_err(CaptureError::from),
                Err(_) => Err(CaptureError::ThreadPanicked),
            },
            None => Ok(()),
        };

        paused.and(joined)
    }
}

fn pump_loop<S: SpectrumSink>(
    session: &mut CaptureSession<S>,
    running: &AtomicBool,
) -> Result<(), SessionError> {
    while running.load(Ordering::SeqCst) {
        if session.pump()? == 0 {
            std::thread::sleep(IDLE_SLEEP);
        }
    }
    Ok(())
}

impl Drop for CaptureRunner {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            log::warn!("Capture stopped with error: {}", e);
        }
    }
}
