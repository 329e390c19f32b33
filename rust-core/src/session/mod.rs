//! Capture session: one engine, one sink, one sample queue
//!
//! Replaces the process-wide visualizer instance of the platform plugins.
//! The host creates a session ("initialize"), starts it to obtain the
//! producer end of the sample queue for its capture callback, and pumps it
//! from one thread to turn queued samples into delivered spectrum events.

pub mod sink;

pub use sink::{CallbackSink, ChannelSink, LatestFrameSink, SpectrumSink};

use crate::audio::buffer::{sample_queue, SampleConsumer, SampleProducer};
use crate::config::{CaptureConfig, SessionConfig};
use crate::error::{EngineError, SessionError};
use crate::spectrum::{
    Clock, MonotonicClock, SpectrumEngine, SpectrumEvent, SpectrumLayout, TransformBackend,
};

/// Samples moved from the queue into the engine per `extend` call
const PUMP_CHUNK: usize = 1024;

pub struct CaptureSession<S: SpectrumSink, C: Clock = MonotonicClock> {
    engine: SpectrumEngine<C>,
    sink: S,
    layout: SpectrumLayout,
    buffer_capacity: usize,

    /// Present while running
    consumer: Option<SampleConsumer>,

    /// Reusable transfer buffer
    chunk: Vec<f64>,
}

impl<S: SpectrumSink> CaptureSession<S, MonotonicClock> {
    /// Create a stopped session
    pub fn new(config: SessionConfig, sink: S) -> Result<Self, SessionError> {
        Self::with_clock(config, sink, MonotonicClock)
    }
}

impl<S: SpectrumSink, C: Clock> CaptureSession<S, C> {
    /// Create a stopped session driven by `clock`
    pub fn with_clock(config: SessionConfig, sink: S, clock: C) -> Result<Self, SessionError> {
        let engine =
            SpectrumEngine::with_parts(config.capture, TransformBackend::default(), clock)?;

        Ok(Self {
            engine,
            sink,
            layout: config.layout,
            buffer_capacity: config.buffer_capacity,
            consumer: None,
            chunk: vec![0.0; PUMP_CHUNK],
        })
    }

    /// Start capturing; returns the producer end for the capture source
    pub fn start(&mut self) -> Result<SampleProducer, SessionError> {
        if self.engine.is_disposed() {
            return Err(EngineError::Disposed.into());
        }
        if self.consumer.is_some() {
            return Err(SessionError::AlreadyRunning);
        }

        self.engine.reset();
        let (producer, consumer) = sample_queue(self.buffer_capacity);
        self.consumer = Some(consumer);

        log::info!(
            "Capture session started (queue capacity {} samples, layout {:?})",
            self.buffer_capacity,
            self.layout
        );

        Ok(producer)
    }

    /// Stop capturing and drop all queued and buffered samples
    ///
    /// The producer handed out by `start` keeps accepting writes but nothing
    /// reads them any more. Idempotent.
    pub fn stop(&mut self) {
        if self.consumer.take().is_some() {
            log::info!("Capture session stopped");
        }
        self.engine.reset();
    }

    pub fn is_running(&self) -> bool {
        self.consumer.is_some()
    }

    /// Drain what is currently queued into the engine
    ///
    /// The whole backlog goes into the sample history first and the engine
    /// is polled once afterwards, so a delivered frame always reflects the
    /// newest queued samples. Returns the number of events delivered to the
    /// sink (0 or 1). Samples written while pumping are left for the next call.
    pub fn pump(&mut self) -> Result<usize, SessionError> {
        let Self {
            engine,
            sink,
            layout,
            consumer,
            chunk,
            ..
        } = self;

        let consumer = consumer.as_mut().ok_or(SessionError::NotRunning)?;

        let mut remaining = consumer.len();
        if remaining == 0 {
            return Ok(0);
        }

        while remaining > 0 {
            let want = remaining.min(chunk.len());
            let n = consumer.read(&mut chunk[..want]);
            if n == 0 {
                break;
            }
            remaining -= n;
            engine.extend(&chunk[..n])?;
        }

        match engine.poll()? {
            Some(frame) => {
                sink.deliver(SpectrumEvent::from_frame(&frame, *layout))?;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    /// Push samples straight into the engine, bypassing the queue
    ///
    /// For hosts whose capture callback runs on the thread that owns the
    /// session. Returns whether an event was delivered.
    pub fn feed(&mut self, samples: &[f64]) -> Result<bool, SessionError> {
        if !self.is_running() {
            return Err(SessionError::NotRunning);
        }

        match self.engine.ingest(samples)? {
            Some(frame) => {
                self.sink.deliver(SpectrumEvent::from_frame(&frame, self.layout))?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Change the frame size, keeping the rest of the configuration
    pub fn set_capture_size(&mut self, frame_size: usize) -> Result<(), SessionError> {
        let config = CaptureConfig {
            frame_size,
            ..self.current_config()?
        };
        self.reconfigure(config)
    }

    /// Replace the capture configuration
    ///
    /// Samples queued under the old configuration are discarded.
    pub fn reconfigure(&mut self, config: CaptureConfig) -> Result<(), SessionError> {
        self.engine.reconfigure(config)?;

        if let Some(consumer) = self.consumer.as_mut() {
            let discarded = consumer.clear();
            log::debug!("Discarded {} queued samples on reconfigure", discarded);
        }
        Ok(())
    }

    pub fn set_layout(&mut self, layout: SpectrumLayout) {
        self.layout = layout;
    }

    pub fn layout(&self) -> SpectrumLayout {
        self.layout
    }

    /// Stop and release the engine; the session cannot be restarted
    pub fn dispose(&mut self) {
        self.stop();
        self.engine.dispose();
    }

    pub fn engine(&self) -> &SpectrumEngine<C> {
        &self.engine
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    fn current_config(&self) -> Result<CaptureConfig, SessionError> {
        self.engine
            .config()
            .cloned()
            .ok_or_else(|| EngineError::Disposed.into())
    }
}
