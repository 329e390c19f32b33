//! Throttled spectrum engine
//!
//! Buffers incoming samples, and at most once per capture interval turns the
//! most recent frame into a half-spectrum of magnitudes.

use super::clock::{Clock, MonotonicClock};
use super::frame::SpectrumFrame;
use super::history::SampleHistory;
use super::transform::{Transform, TransformBackend};
use super::windowing::{apply_window_inplace, fill_window, window_correction_factor};
use crate::config::CaptureConfig;
use crate::error::{try_zeroed, EngineError};
use num_complex::Complex64;
use std::time::{Duration, Instant};

/// Everything derived from one validated configuration
///
/// Dropped as a whole on reconfigure and dispose.
struct EngineState {
    config: CaptureConfig,
    interval: Duration,
    transform: Box<dyn Transform>,

    /// Precomputed window coefficients
    window: Vec<f64>,

    /// Magnitude scale (1.0 unless amplitude correction is on)
    gain: f64,

    history: SampleHistory,

    /// Transform input, overwritten each frame
    working: Vec<f64>,

    /// Transform output (N/2 + 1 bins)
    spectrum: Vec<Complex64>,

    /// Samples received since the last emission
    pending: usize,

    last_emission: Option<Instant>,
}

impl EngineState {
    fn new(config: CaptureConfig, backend: TransformBackend) -> Result<Self, EngineError> {
        config.validate()?;

        let frame_size = config.frame_size;
        let mut window = try_zeroed(frame_size)?;
        fill_window(&mut window, config.window);

        let gain = if config.amplitude_correction {
            window_correction_factor(&window)
        } else {
            1.0
        };

        Ok(Self {
            interval: config.capture_interval(),
            transform: backend.plan(frame_size),
            window,
            gain,
            history: SampleHistory::new(frame_size)?,
            working: try_zeroed(frame_size)?,
            spectrum: try_zeroed(frame_size / 2 + 1)?,
            pending: 0,
            last_emission: None,
            config,
        })
    }

    fn is_due(&self, now: Instant) -> bool {
        match self.last_emission {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        }
    }

    /// Window, transform, and reduce the current history to (magnitudes, |Nyquist|)
    fn analyze(&mut self) -> Result<Option<(Vec<f64>, f64)>, EngineError> {
        if !self.history.copy_latest(&mut self.working) {
            return Ok(None);
        }

        apply_window_inplace(&mut self.working, &self.window);
        self.transform.process(&mut self.working, &mut self.spectrum)?;

        let num_bins = self.config.num_bins();
        let mut magnitudes: Vec<f64> = try_zeroed(num_bins)?;

        // DC is purely real
        magnitudes[0] = self.spectrum[0].re.abs() * self.gain;
        for (mag, bin) in magnitudes[1..].iter_mut().zip(&self.spectrum[1..num_bins]) {
            *mag = bin.norm() * self.gain;
        }

        let nyquist = self.spectrum[num_bins].re.abs() * self.gain;

        Ok(Some((magnitudes, nyquist)))
    }
}

/// Real-time spectrum engine
///
/// One instance per capture session. `ingest` is driven from a single
/// producer context; nothing inside the engine is shared or synchronized.
pub struct SpectrumEngine<C: Clock = MonotonicClock> {
    clock: C,
    backend: TransformBackend,

    /// Reference point for frame timestamps
    origin: Instant,

    next_sequence: u64,

    /// None once disposed
    state: Option<EngineState>,
}

impl SpectrumEngine<MonotonicClock> {
    /// Create an engine using the real-input FFT and the system clock
    pub fn create(config: CaptureConfig) -> Result<Self, EngineError> {
        Self::with_parts(config, TransformBackend::default(), MonotonicClock)
    }
}

impl<C: Clock> SpectrumEngine<C> {
    /// Create an engine with an explicit transform backend and clock
    ///
    /// # Arguments
    /// * `config` - Capture configuration, validated here
    /// * `backend` - FFT implementation to plan
    /// * `clock` - Time source for throttling and timestamps
    ///
    /// # Returns
    /// A ready engine, or `EngineError::Config` / `EngineError::Allocation`
    pub fn with_parts(
        config: CaptureConfig,
        backend: TransformBackend,
        clock: C,
    ) -> Result<Self, EngineError> {
        let state = EngineState::new(config, backend)?;
        let origin = clock.now();

        log::debug!(
            "Spectrum engine created: frame_size={}, window={:?}, capture_rate={} Hz, backend={:?}",
            state.config.frame_size,
            state.config.window,
            state.config.capture_rate_hz,
            backend
        );

        Ok(Self {
            clock,
            backend,
            origin,
            next_sequence: 0,
            state: Some(state),
        })
    }

    /// Feed samples; returns a frame when one is due
    ///
    /// `Ok(None)` means "no frame yet": fewer than `frame_size` new samples
    /// since the last emission, or the capture interval has not elapsed.
    /// Excess calls only update the sample history. Non-finite samples are
    /// treated as silence.
    ///
    /// # Arguments
    /// * `samples` - Mono samples in capture order, any length
    ///
    /// # Returns
    /// The frame built from the newest `frame_size` samples, if one is due
    pub fn ingest(&mut self, samples: &[f64]) -> Result<Option<SpectrumFrame>, EngineError> {
        if samples.is_empty() {
            return self.state.as_ref().map(|_| None).ok_or(EngineError::Disposed);
        }

        self.extend(samples)?;
        self.poll()
    }

    /// Add samples to the history without checking whether a frame is due
    ///
    /// Lets a caller draining a backlog in pieces analyze only once, after
    /// the last piece, via `poll`.
    pub fn extend(&mut self, samples: &[f64]) -> Result<(), EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::Disposed)?;

        state.history.extend(samples);
        state.pending = state.pending.saturating_add(samples.len());
        Ok(())
    }

    /// Emit a frame from the current history if one is due
    pub fn poll(&mut self) -> Result<Option<SpectrumFrame>, EngineError> {
        let state = self.state.as_mut().ok_or(EngineError::Disposed)?;

        if state.pending < state.config.frame_size {
            return Ok(None);
        }

        let now = self.clock.now();
        if !state.is_due(now) {
            return Ok(None);
        }

        let Some((magnitudes, nyquist)) = state.analyze()? else {
            return Ok(None);
        };

        state.pending = 0;
        state.last_emission = Some(now);

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        log::trace!("Emitting spectrum frame {} ({} bins)", sequence, magnitudes.len());

        Ok(Some(SpectrumFrame::new(
            sequence,
            now.saturating_duration_since(self.origin),
            magnitudes,
            nyquist,
        )))
    }

    /// Replace the configuration, discarding buffered samples and timing state
    ///
    /// On error the previous configuration stays in effect.
    pub fn reconfigure(&mut self, config: CaptureConfig) -> Result<(), EngineError> {
        if self.state.is_none() {
            return Err(EngineError::Disposed);
        }

        let state = EngineState::new(config, self.backend)?;

        log::debug!(
            "Spectrum engine reconfigured: frame_size={}, window={:?}, capture_rate={} Hz",
            state.config.frame_size,
            state.config.window,
            state.config.capture_rate_hz
        );

        self.state = Some(state);
        Ok(())
    }

    /// Drop buffered samples and throttle state, keeping the configuration
    ///
    /// No-op once disposed.
    pub fn reset(&mut self) {
        if let Some(state) = self.state.as_mut() {
            state.history.clear();
            state.pending = 0;
            state.last_emission = None;
        }
    }

    /// Release the transform plan and all buffers
    ///
    /// Idempotent. Afterwards `ingest` and `reconfigure` fail with `Disposed`.
    pub fn dispose(&mut self) {
        if self.state.take().is_some() {
            log::debug!("Spectrum engine disposed");
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.state.is_none()
    }

    /// Current configuration (None once disposed)
    pub fn config(&self) -> Option<&CaptureConfig> {
        self.state.as_ref().map(|state| &state.config)
    }

    pub fn backend(&self) -> TransformBackend {
        self.backend
    }

    /// Number of magnitudes per emitted frame
    pub fn num_bins(&self) -> Option<usize> {
        self.config().map(CaptureConfig::num_bins)
    }

    /// Center frequency in Hz of every emitted bin
    pub fn frequency_bins_hz(&self) -> Option<Vec<f64>> {
        self.config().map(|config| {
            let resolution = config.sample_rate as f64 / config.frame_size as f64;
            (0..config.num_bins())
                .map(|bin| bin as f64 * resolution)
                .collect()
        })
    }
}
