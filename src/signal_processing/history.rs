use crate::error::{Result, SgError};

/// Bounded sample history in chronological order (oldest to newest)
///
/// Backed by a contiguous `Vec` so the whole history can be handed to
/// [`SavitzkyGolayFilter::apply`](super::SavitzkyGolayFilter::apply) as a
/// slice. Once full, each push evicts the oldest sample.
#[derive(Debug, Clone)]
pub struct SampleHistory<T> {
    buffer: Vec<T>,
    capacity: usize,
}

impl<T: Copy> SampleHistory<T> {
    /// Create an empty history
    ///
    /// # Arguments
    /// * `capacity` - Samples retained; at least 1
    pub fn new(capacity: usize) -> Result<Self> {
        if capacity == 0 {
            return Err(SgError::InvalidConfiguration(
                "history capacity must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            buffer: Vec::with_capacity(capacity),
            capacity,
        })
    }

    /// Append a sample, evicting the oldest one when full
    ///
    /// Eviction shifts the buffer, O(capacity) per push; sized for histories
    /// of one filter window (tens of samples).
    pub fn push(&mut self, sample: T) {
        if self.buffer.len() == self.capacity {
            self.buffer.remove(0);
        }
        self.buffer.push(sample);
    }

    /// Append several samples in order
    pub fn extend_from_slice(&mut self, samples: &[T]) {
        for &sample in samples {
            self.push(sample);
        }
    }

    /// All retained samples, oldest first
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// Latest `count` samples, oldest first (fewer if not yet available)
    pub fn latest(&self, count: usize) -> &[T] {
        let len = self.buffer.len().min(count);
        &self.buffer[self.buffer.len() - len..]
    }

    /// Most recent sample
    pub fn last(&self) -> Option<T> {
        self.buffer.last().copied()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.buffer.len() == self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacity_rejected() {
        assert!(SampleHistory::<f32>::new(0).is_err());
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut history = SampleHistory::new(3).unwrap();
        history.extend_from_slice(&[1.0f32, 2.0, 3.0]);
        assert!(history.is_full());

        history.push(4.0);
        history.push(5.0);
        assert_eq!(history.as_slice(), &[3.0, 4.0, 5.0]);
        assert_eq!(history.last(), Some(5.0));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_latest() {
        let mut history = SampleHistory::new(5).unwrap();
        history.extend_from_slice(&[1, 2, 3]);
        assert_eq!(history.latest(2), &[2, 3]);
        assert_eq!(history.latest(10), &[1, 2, 3]);
        assert!(history.latest(0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut history = SampleHistory::new(2).unwrap();
        history.push(1u8);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.last(), None);
        assert_eq!(history.capacity(), 2);
    }
}
