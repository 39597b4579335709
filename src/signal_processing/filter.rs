/// Common trait for sample-at-a-time filters
///
/// Implemented by [`StreamingFilter`](super::StreamingFilter). Filters with a
/// warm-up period return `None` until they can produce an output.
pub trait Filter<T> {
    /// Process a single sample through the filter
    fn process(&mut self, sample: T) -> Option<T>;

    /// Process a buffer of samples, collecting every output produced
    fn process_buffer(&mut self, samples: &[T]) -> Vec<T>
    where
        T: Copy,
    {
        samples.iter().filter_map(|&s| self.process(s)).collect()
    }

    /// Forget all buffered state
    fn reset(&mut self);
}
