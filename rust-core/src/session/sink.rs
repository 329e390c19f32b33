//! Destinations for spectrum events
//!
//! A sink stands in for the host's message channel. Delivery must never block
//! the thread that pumps the engine.

use crate::error::SinkError;
use crate::spectrum::SpectrumEvent;
use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};
use std::sync::{Arc, Mutex};

pub trait SpectrumSink {
    fn deliver(&mut self, event: SpectrumEvent) -> Result<(), SinkError>;
}

impl<S: SpectrumSink + ?Sized> SpectrumSink for Box<S> {
    fn deliver(&mut self, event: SpectrumEvent) -> Result<(), SinkError> {
        (**self).deliver(event)
    }
}

/// Keeps only the newest event; the reader polls it at its own rate
///
/// Clones share the same slot.
#[derive(Clone, Default)]
pub struct LatestFrameSink {
    latest: Arc<Mutex<Option<SpectrumEvent>>>,
}

impl LatestFrameSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the newest event, if any arrived since the last call
    pub fn take(&self) -> Option<SpectrumEvent> {
        match self.latest.lock() {
            Ok(mut latest) => latest.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        }
    }
}

impl SpectrumSink for LatestFrameSink {
    fn deliver(&mut self, event: SpectrumEvent) -> Result<(), SinkError> {
        match self.latest.lock() {
            Ok(mut latest) => *latest = Some(event),
            Err(poisoned) => *poisoned.into_inner() = Some(event),
        }
        Ok(())
    }
}

/// Bounded channel; events are dropped while the receiver lags
pub struct ChannelSink {
    sender: SyncSender<SpectrumEvent>,
    dropped: u64,
}

impl ChannelSink {
    /// Create a sink and the receiver the host reads from
    pub fn bounded(capacity: usize) -> (Self, Receiver<SpectrumEvent>) {
        let (sender, receiver) = mpsc::sync_channel(capacity);
        (Self { sender, dropped: 0 }, receiver)
    }

    /// Events dropped because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl SpectrumSink for ChannelSink {
    fn deliver(&mut self, event: SpectrumEvent) -> Result<(), SinkError> {
        match self.sender.try_send(event) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(event)) => {
                self.dropped += 1;
                log::warn!(
                    "Spectrum channel full, dropped frame {} ({} dropped so far)",
                    event.sequence,
                    self.dropped
                );
                Ok(())
            }
            Err(TrySendError::Disconnected(_)) => Err(SinkError::Disconnected),
        }
    }
}

/// Hands each event to a closure
pub struct CallbackSink<F> {
    callback: F,
}

impl<F> CallbackSink<F>
where
    F: FnMut(SpectrumEvent) -> Result<(), SinkError>,
{
    pub fn new(callback: F) -> Self {
        Self { callback }
    }
}

impl<F> SpectrumSink for CallbackSink<F>
where
    F: FnMut(SpectrumEvent) -> Result<(), SinkError>,
{
    fn deliver(&mut self, event: SpectrumEvent) -> Result<(), SinkError> {
        (self.callback)(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectrum::SpectrumLayout;
    use std::time::Duration;

    fn event(sequence: u64) -> SpectrumEvent {
        SpectrumEvent {
            sequence,
            captured_at: Duration::ZERO,
            layout: SpectrumLayout::HalfSpectrum,
            values: vec![sequence as f64],
        }
    }

    #[test]
    fn test_latest_keeps_newest() {
        let reader = LatestFrameSink::new();
        let mut sink = reader.clone();

        sink.deliver(event(0)).unwrap();
        sink.deliver(event(1)).unwrap();

        assert_eq!(reader.take().map(|e| e.sequence), Some(1));
        assert!(reader.take().is_none());
    }

    #[test]
    fn test_channel_drops_when_full() {
        let (mut sink, receiver) = ChannelSink::bounded(2);

        for seq in 0..5 {
            sink.deliver(event(seq)).unwrap();
        }

        assert_eq!(sink.dropped(), 3);
        let received: Vec<u64> = receiver.try_iter().map(|e| e.sequence).collect();
        assert_eq!(received, vec![0, 1]);
    }

    #[test]
    fn test_channel_disconnected() {
        let (mut sink, receiver) = ChannelSink::bounded(2);
        drop(receiver);

        assert_eq!(sink.deliver(event(0)), Err(SinkError::Disconnected));
    }

    #[test]
    fn test_callback_sink() {
        let mut seen = Vec::new();
        {
            let mut sink = CallbackSink::new(|e: SpectrumEvent| {
                seen.push(e.sequence);
                Ok(())
            });
            sink.deliver(event(7)).unwrap();
        }
        assert_eq!(seen, vec![7]);
    }
}
