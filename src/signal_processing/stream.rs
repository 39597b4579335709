use crate::config::FilterOptions;
use crate::error::Result;

use super::filter::Filter;
use super::history::SampleHistory;
use super::sample::Sample;
use super::savitzky_golay::SavitzkyGolayFilter;

/// Savitzky-Golay filter paired with its own sample history
///
/// One instance per signal. Produces an output for every sample once a full
/// window has been seen.
#[derive(Debug, Clone)]
pub struct StreamingFilter<T> {
    filter: SavitzkyGolayFilter,
    history: SampleHistory<T>,
}

impl<T: Sample> StreamingFilter<T> {
    pub fn new(options: FilterOptions) -> Result<Self> {
        let filter = SavitzkyGolayFilter::new(options)?;
        Self::from_filter(filter)
    }

    /// Wrap an existing filter, with history sized to its window
    pub fn from_filter(filter: SavitzkyGolayFilter) -> Result<Self> {
        let history = SampleHistory::new(filter.window_size())?;
        Ok(Self { filter, history })
    }

    /// Reconfigure the filter
    ///
    /// The history is resized to the new window; the newest samples are kept.
    pub fn configure(&mut self, options: FilterOptions) -> Result<()> {
        self.filter.configure(options)?;
        let mut history = SampleHistory::new(self.filter.window_size())?;
        history.extend_from_slice(self.history.as_slice());
        self.history = history;
        Ok(())
    }

    /// True once a full window is buffered
    pub fn is_warm(&self) -> bool {
        self.history.is_full()
    }

    /// Samples between the newest input and the point each output describes
    ///
    /// `m - t`: zero for causal filters, `m` for centered ones.
    pub fn lag(&self) -> usize {
        let options = self.filter.options();
        (options.m as i64 - options.t as i64) as usize
    }

    /// Raw sample at the evaluation point of the current window
    ///
    /// # Returns
    /// The input the latest output is aligned with, or `None` during warm-up
    pub fn eval_sample(&self) -> Option<T> {
        if !self.is_warm() {
            return None;
        }
        let options = self.filter.options();
        let position = (options.m as i64 + options.t as i64) as usize;
        self.history.as_slice().get(position).copied()
    }

    pub fn filter(&self) -> &SavitzkyGolayFilter {
        &self.filter
    }

    pub fn history(&self) -> &SampleHistory<T> {
        &self.history
    }
}

impl<T: Sample> Filter<T> for StreamingFilter<T> {
    fn process(&mut self, sample: T) -> Option<T> {
        self.history.push(sample);
        if !self.is_warm() {
            return None;
        }
        self.filter.apply(self.history.as_slice(), 0).ok()
    }

    fn reset(&mut self) {
        self.history.clear();
    }
}
