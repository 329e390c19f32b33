//! Sliding sample history feeding the transform

use crate::error::{try_zeroed, EngineError};

fn copy_finite(dst: &mut [f64], src: &[f64]) {
    for (d, &s) in dst.iter_mut().zip(src) {
        *d = if s.is_finite() { s } else { 0.0 };
    }
}

/// Fixed-size circular buffer holding the most recent `capacity` samples
pub struct SampleHistory {
    /// Circular storage
    buffer: Vec<f64>,

    /// Next write position (also the oldest sample once full)
    cursor: usize,

    /// Number of valid samples, saturates at capacity
    filled: usize,
}

impl SampleHistory {
    /// Create an empty history
    pub fn new(capacity: usize) -> Result<Self, EngineError> {
        Ok(Self {
            buffer: try_zeroed(capacity)?,
            cursor: 0,
            filled: 0,
        })
    }

    /// Append samples, overwriting the oldest once full
    ///
    /// NaN and infinite samples are stored as silence.
    pub fn extend(&mut self, samples: &[f64]) {
        let capacity = self.buffer.len();
        if capacity == 0 || samples.is_empty() {
            return;
        }

        // Only the newest `capacity` samples can survive
        if samples.len() >= capacity {
            copy_finite(&mut self.buffer, &samples[samples.len() - capacity..]);
            self.cursor = 0;
            self.filled = capacity;
            return;
        }

        let first = samples.len().min(capacity - self.cursor);
        copy_finite(&mut self.buffer[self.cursor..self.cursor + first], &samples[..first]);

        let rest = samples.len() - first;
        if rest > 0 {
            copy_finite(&mut self.buffer[..rest], &samples[first..]);
        }

        self.cursor = (self.cursor + samples.len()) % capacity;
        self.filled = (self.filled + samples.len()).min(capacity);
    }

    /// Copy the history oldest-first into `out`
    ///
    /// Returns false (leaving `out` untouched) until the history is full or
    /// when `out` is not exactly `capacity` long.
    pub fn copy_latest(&self, out: &mut [f64]) -> bool {
        let capacity = self.buffer.len();
        if !self.is_full() || out.len() != capacity {
            return false;
        }

        let tail = capacity - self.cursor;
        out[..tail].copy_from_slice(&self.buffer[self.cursor..]);
        out[tail..].copy_from_slice(&self.buffer[..self.cursor]);
        true
    }

    pub fn is_full(&self) -> bool {
        self.filled == self.buffer.len()
    }

    pub fn len(&self) -> usize {
        self.filled
    }

    pub fn is_empty(&self) -> bool {
        self.filled == 0
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    /// Discard all samples
    pub fn clear(&mut self) {
        self.buffer.fill(0.0);
        self.cursor = 0;
        self.filled = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(start: usize, len: usize) -> Vec<f64> {
        (start..start + len).map(|v| v as f64).collect()
    }

    #[test]
    fn test_non_finite_stored_as_silence() {
        let mut history = SampleHistory::new(4).unwrap();
        let mut out = vec![0.0; 4];

        history.extend(&[1.0, f64::NAN, f64::INFINITY, 2.0]);
        assert!(history.copy_latest(&mut out));
        assert_eq!(out, vec![1.0, 0.0, 0.0, 2.0]);

        // Partial write path
        history.extend(&[f64::NEG_INFINITY, 3.0]);
        assert!(history.copy_latest(&mut out));
        assert_eq!(out, vec![0.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn test_not_full_until_capacity() {
        let mut history = SampleHistory::new(8).unwrap();
        let mut out = vec![0.0; 8];

        history.extend(&ramp(0, 7));
        assert_eq!(history.len(), 7);
        assert!(!history.copy_latest(&mut out));

        history.extend(&ramp(7, 1));
        assert!(history.copy_latest(&mut out));
        assert_eq!(out, ramp(0, 8));
    }

    #[test]
    fn test_wraparound_keeps_newest() {
        let mut history = SampleHistory::new(8).unwrap();
        let mut out = vec![0.0; 8];

        for chunk in 0..5 {
            history.extend(&ramp(chunk * 3, 3));
        }

        // 15 samples written, newest 8 are 7..15
        assert!(history.copy_latest(&mut out));
        assert_eq!(out, ramp(7, 8));
    }

    #[test]
    fn test_oversized_chunk() {
        let mut history = SampleHistory::new(4).unwrap();
        let mut out = vec![0.0; 4];

        history.extend(&ramp(0, 2));
        history.extend(&ramp(2, 10));

        assert!(history.copy_latest(&mut out));
        assert_eq!(out, ramp(8, 4));
    }

    #[test]
    fn test_clear() {
        let mut history = SampleHistory::new(4).unwrap();
        history.extend(&ramp(0, 6));
        history.clear();

        assert!(history.is_empty());
        assert!(!history.copy_latest(&mut [0.0; 4]));
    }
}
