//! Lock-free sample queue between a capture thread and its session
//!
//! Single producer (the capture callback) and single consumer (the thread
//! that pumps the session). Neither side ever blocks.

use ringbuf::{HeapConsumer, HeapProducer, HeapRb};

/// Create a queue holding up to `capacity` samples
///
/// # Arguments
/// * `capacity` - Maximum number of queued samples before writes drop
///
/// # Returns
/// Producer half for the capture source and consumer half for the session
pub fn sample_queue(capacity: usize) -> (SampleProducer, SampleConsumer) {
    let rb = HeapRb::<f64>::new(capacity.max(1));
    let (producer, consumer) = rb.split();

    (
        SampleProducer {
            producer,
            dropped: 0,
        },
        SampleConsumer { consumer },
    )
}

/// Writing end, owned by the capture source
pub struct SampleProducer {
    producer: HeapProducer<f64>,

    /// Samples rejected because the queue was full
    dropped: u64,
}

impl SampleProducer {
    /// Write samples; those that do not fit are dropped and counted
    ///
    /// Returns the number of samples actually queued.
    pub fn write(&mut self, samples: &[f64]) -> usize {
        let written = self.producer.push_slice(samples);
        self.dropped += (samples.len() - written) as u64;
        written
    }

    /// Write samples from any iterator (e.g. one channel of an interleaved block)
    pub fn write_iter<I: Iterator<Item = f64>>(&mut self, samples: I) -> usize {
        let mut written = 0;
        for sample in samples {
            if self.producer.push(sample).is_ok() {
                written += 1;
            } else {
                self.dropped += 1;
            }
        }
        written
    }

    /// Get number of free slots
    pub fn free_len(&self) -> usize {
        self.producer.free_len()
    }

    /// Total samples dropped on overflow
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

/// Reading end, owned by the session
pub struct SampleConsumer {
    consumer: HeapConsumer<f64>,
}

impl SampleConsumer {
    /// Read up to `buffer.len()` samples, returns how many were read
    pub fn read(&mut self, buffer: &mut [f64]) -> usize {
        self.consumer.pop_slice(buffer)
    }

    /// Get number of available samples
    pub fn len(&self) -> usize {
        self.consumer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumer.is_empty()
    }

    /// Discard everything queued
    pub fn clear(&mut self) -> usize {
        self.consumer.skip(self.consumer.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_write_read() {
        let (mut producer, mut consumer) = sample_queue(1024);

        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert_eq!(producer.write(&data), 5);
        assert_eq!(consumer.len(), 5);

        let mut output = vec![0.0; 5];
        assert_eq!(consumer.read(&mut output), 5);
        assert_eq!(output, data);
        assert!(consumer.is_empty());
    }

    #[test]
    fn test_queue_overflow_counts_drops() {
        let (mut producer, mut consumer) = sample_queue(10);

        let written = producer.write(&[1.0; 25]);
        assert_eq!(written, 10);
        assert_eq!(producer.dropped(), 15);
        assert_eq!(producer.free_len(), 0);

        assert_eq!(producer.write_iter([2.0, 3.0].into_iter()), 0);
        assert_eq!(producer.dropped(), 17);

        let mut output = vec![0.0; 20];
        assert_eq!(consumer.read(&mut output), 10);
    }

    #[test]
    fn test_queue_underflow() {
        let (_producer, mut consumer) = sample_queue(16);

        let mut output = vec![0.0; 10];
        assert_eq!(consumer.read(&mut output), 0);
    }

    #[test]
    fn test_queue_clear() {
        let (mut producer, mut consumer) = sample_queue(16);
        producer.write_iter((0..12).map(|v| v as f64));

        assert_eq!(consumer.clear(), 12);
        assert!(consumer.is_empty());
    }
}
