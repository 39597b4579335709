use crate::config::FilterOptions;
use crate::constants::WEIGHT_SUM_TOLERANCE;
use crate::error::{Result, SgError};

use super::gram::compute_weights;
use super::sample::Sample;

/// Savitzky-Golay smoothing/differentiating convolution filter
///
/// Fits a polynomial of order `n` to a window of `2m+1` evenly spaced samples
/// by least squares and reports the fitted value (or its `s`'th derivative) at
/// window offset `t`. The fit reduces to a fixed set of convolution weights,
/// computed once when the filter is configured, so each application is a
/// single O(2m+1) dot product.
///
/// The filter keeps no sample history. Callers pass a buffer of samples
/// (oldest first) and the trailing window is convolved; see
/// [`StreamingFilter`](super::StreamingFilter) for a buffered wrapper.
///
/// # Example
/// ```
/// use sgtrack::config::FilterOptions;
/// use sgtrack::signal_processing::SavitzkyGolayFilter;
///
/// let filter = SavitzkyGolayFilter::new(FilterOptions::causal(2, 1, 0, 1.0)).unwrap();
/// let ramp = [1.0f32, 2.0, 3.0, 4.0, 5.0];
/// assert!((filter.apply(&ramp, 0).unwrap() - 5.0).abs() < 1e-5);
/// ```
#[derive(Debug, Clone)]
pub struct SavitzkyGolayFilter {
    options: FilterOptions,
    weights: Vec<f64>,
    time_scale: f64,
}

impl SavitzkyGolayFilter {
    /// Create a filter, computing its weights
    ///
    /// # Arguments
    /// * `options` - Window half-width, evaluation point, polynomial order,
    ///   derivative order and sample interval
    ///
    /// # Errors
    /// `InvalidConfiguration` if the options do not describe a well-posed fit
    /// (see [`FilterOptions::validate`]).
    pub fn new(options: FilterOptions) -> Result<Self> {
        options.validate()?;
        let (weights, time_scale) = Self::design(&options);
        Ok(Self {
            options,
            weights,
            time_scale,
        })
    }

    /// Replace the configuration and recompute the weights
    ///
    /// On error the filter keeps its previous configuration.
    pub fn configure(&mut self, options: FilterOptions) -> Result<()> {
        options.validate()?;
        let (weights, time_scale) = Self::design(&options);
        self.options = options;
        self.weights = weights;
        self.time_scale = time_scale;
        Ok(())
    }

    fn design(options: &FilterOptions) -> (Vec<f64>, f64) {
        let weights = compute_weights(options.m, options.t, options.n, options.s);
        let time_scale = options.dt.powi(options.s as i32);

        log::debug!(
            "Savitzky-Golay filter: window={} t={} n={} s={} dt={}",
            options.window_size(),
            options.t,
            options.n,
            options.s,
            options.dt
        );
        log::trace!("Savitzky-Golay weights: {:?}", weights);

        if options.s == 0 {
            let sum: f64 = weights.iter().sum();
            if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
                log::warn!("Smoothing weights sum to {} instead of 1", sum);
            }
        }

        (weights, time_scale)
    }

    /// Filter the trailing window of `samples`, `offset` samples back from the end
    ///
    /// Weight `j` multiplies `samples[len - (window - j) - offset]`, so offset 0
    /// uses the newest `2m+1` samples and larger offsets re-evaluate the filter
    /// at earlier points of the same buffer. The weighted sum is divided by
    /// `dt^s` to express derivatives in per-time units.
    ///
    /// # Arguments
    /// * `samples` - Evenly spaced samples, oldest first
    /// * `offset` - How many of the newest samples to skip
    ///
    /// # Returns
    /// The smoothed value (or derivative) at window offset `t`
    ///
    /// # Errors
    /// `InsufficientSamples` if `samples.len() < window_size() + offset`.
    pub fn apply<T: Sample>(&self, samples: &[T], offset: usize) -> Result<T> {
        let window = self.weights.len();
        let needed = window + offset;
        if samples.len() < needed {
            return Err(SgError::InsufficientSamples {
                needed,
                available: samples.len(),
            });
        }

        let end = samples.len() - offset;
        Ok(T::convolve(
            &self.weights,
            &samples[end - window..end],
            self.time_scale,
        ))
    }

    /// Filter the newest window of `samples`
    pub fn apply_latest<T: Sample>(&self, samples: &[T]) -> Result<T> {
        self.apply(samples, 0)
    }

    /// Filter every full window of `samples`, oldest first
    ///
    /// Returns `samples.len() - 2m` values; output `k` covers
    /// `samples[k..k + 2m + 1]`.
    pub fn apply_all<T: Sample>(&self, samples: &[T]) -> Result<Vec<T>> {
        let window = self.weights.len();
        if samples.len() < window {
            return Err(SgError::InsufficientSamples {
                needed: window,
                available: samples.len(),
            });
        }

        Ok(samples
            .windows(window)
            .map(|w| T::convolve(&self.weights, w, self.time_scale))
            .collect())
    }

    /// Override the convolution weights
    ///
    /// The configuration (and therefore `dt^s`) is kept; the new weights must
    /// cover the same window.
    pub fn set_weights(&mut self, weights: Vec<f64>) -> Result<()> {
        if weights.len() != self.window_size() {
            return Err(SgError::InvalidConfiguration(format!(
                "expected {} weights, got {}",
                self.window_size(),
                weights.len()
            )));
        }
        self.weights = weights;
        Ok(())
    }

    /// Current configuration
    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    /// Convolution weights, oldest window sample first
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Number of samples consumed per application (`2m+1`)
    pub fn window_size(&self) -> usize {
        self.weights.len()
    }

    /// Derivative scale `dt^s` applied to every output
    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }
}

impl Default for SavitzkyGolayFilter {
    fn default() -> Self {
        let options = FilterOptions::default();
        let (weights, time_scale) = Self::design(&options);
        Self {
            options,
            weights,
            time_scale,
        }
    }
}
