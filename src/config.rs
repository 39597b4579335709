//! Configuration for Savitzky-Golay filtering and joint tracking.
//!
//! ## Filter parameters
//!
//! A filter is described by five values, held in [`FilterOptions`]:
//!
//! ```ignore
//! m: 5,    // window is 2*m+1 = 11 samples
//! t: 5,    // evaluate at the newest sample (t = m) for real-time use
//! n: 3,    // cubic local fit
//! s: 0,    // smoothing (1 = velocity, 2 = acceleration)
//! dt: 1.0, // sample interval, scales derivatives
//! ```
//!
//! Use `t = 0` for centered smoothing when future samples are available.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BODY_TIMEOUT_FRAMES, DEFAULT_DERIVATIVE, DEFAULT_EVAL_POINT, DEFAULT_HALF_WIDTH,
    DEFAULT_POLY_ORDER, DEFAULT_TIME_STEP, KINECT_FRAME_DT,
};
use crate::error::{Result, SgError};
use crate::output::OutputFormat;

/// Sampling interval
///
/// Given as a period in seconds, a period in milliseconds, or a
/// sample rate in Hz. Frame rates are usually known as a rate while the filter
/// wants the interval.
///
/// # Parsing formats
/// - `0.0333` or `0.0333s` - interval in seconds
/// - `33.3ms` - interval in milliseconds
/// - `30hz` or `30Hz` - sample rate
///
/// # Example
/// ```
/// use sgtrack::config::SampleInterval;
///
/// let dt: SampleInterval = "30hz".parse().unwrap();
/// assert!((dt.as_secs() - 1.0 / 30.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleInterval(f64);

impl SampleInterval {
    /// Create from an interval in seconds
    pub fn from_secs(secs: f64) -> Self {
        Self(secs)
    }

    /// Create from a sample rate in Hz
    pub fn from_hz(hz: f64) -> Self {
        Self(1.0 / hz)
    }

    /// Interval in seconds
    pub fn as_secs(&self) -> f64 {
        self.0
    }

    /// Sample rate in Hz
    pub fn as_hz(&self) -> f64 {
        1.0 / self.0
    }
}

impl Default for SampleInterval {
    fn default() -> Self {
        Self(DEFAULT_TIME_STEP)
    }
}

impl fmt::Display for SampleInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}s", self.0)
    }
}

impl FromStr for SampleInterval {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let s = s.trim();

        let parse_positive = |num: &str, what: &str| -> std::result::Result<f64, String> {
            let value: f64 = num
                .trim()
                .parse()
                .map_err(|_| format!("invalid {}: {}", what, s))?;
            if !(value > 0.0 && value.is_finite()) {
                return Err(format!("{} must be positive", what));
            }
            Ok(value)
        };

        if let Some(num) = s.strip_suffix("ms") {
            return Ok(Self::from_secs(parse_positive(num, "interval")? / 1000.0));
        }

        if let Some(num) = s
            .strip_suffix("hz")
            .or_else(|| s.strip_suffix("Hz"))
            .or_else(|| s.strip_suffix("HZ"))
        {
            return Ok(Self::from_hz(parse_positive(num, "rate")?));
        }

        let num = s.strip_suffix('s').unwrap_or(s);
        Ok(Self::from_secs(parse_positive(num, "interval")?))
    }
}

/// Savitzky-Golay filter parameters
///
/// Plain value object; the filter validates it on construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterOptions {
    /// Window half-width; the window is `2*m+1` samples
    pub m: usize,
    /// Evaluation point in `[-m, m]`; `m` for real-time, `0` for smoothing
    pub t: i32,
    /// Polynomial order of the local fit
    pub n: usize,
    /// Derivative order (0 for plain smoothing)
    pub s: usize,
    /// Sample interval
    pub dt: f64,
}

impl FilterOptions {
    pub fn new(m: usize, t: i32, n: usize, s: usize, dt: f64) -> Self {
        Self { m, t, n, s, dt }
    }

    /// Real-time configuration evaluated at the newest sample (`t = m`)
    pub fn causal(m: usize, n: usize, s: usize, dt: f64) -> Self {
        Self::new(m, m as i32, n, s, dt)
    }

    /// Centered configuration (`t = 0`), delayed by `m` samples
    pub fn centered(m: usize, n: usize, s: usize, dt: f64) -> Self {
        Self::new(m, 0, n, s, dt)
    }

    /// Same window and fit, different derivative order
    pub fn with_derivative(mut self, s: usize) -> Self {
        self.s = s;
        self
    }

    /// Full window size `2*m+1`
    pub fn window_size(&self) -> usize {
        2 * self.m + 1
    }

    pub fn eval_point(&self) -> i32 {
        self.t
    }

    pub fn order(&self) -> usize {
        self.n
    }

    pub fn derivative_order(&self) -> usize {
        self.s
    }

    pub fn time_step(&self) -> f64 {
        self.dt
    }

    /// Check that the parameters describe a well-posed least-squares fit.
    pub fn validate(&self) -> Result<()> {
        // Window offsets and `t` are i32.
        if i32::try_from(self.m).is_err() {
            return Err(SgError::InvalidConfiguration(format!(
                "half-width {} too large",
                self.m
            )));
        }
        if self.n >= self.window_size() {
            return Err(SgError::InvalidConfiguration(format!(
                "polynomial order {} must be less than window size {}",
                self.n,
                self.window_size()
            )));
        }
        if self.t.unsigned_abs() as usize > self.m {
            return Err(SgError::InvalidConfiguration(format!(
                "evaluation point {} outside window [-{}, {}]",
                self.t, self.m, self.m
            )));
        }
        if self.s > self.n {
            return Err(SgError::InvalidConfiguration(format!(
                "derivative order {} exceeds polynomial order {}",
                self.s, self.n
            )));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(SgError::InvalidConfiguration(format!(
                "time step must be positive and finite, got {}",
                self.dt
            )));
        }
        Ok(())
    }
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            m: DEFAULT_HALF_WIDTH,
            t: DEFAULT_EVAL_POINT,
            n: DEFAULT_POLY_ORDER,
            s: DEFAULT_DERIVATIVE,
            dt: DEFAULT_TIME_STEP,
        }
    }
}

impl fmt::Display for FilterOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "m                       : {}", self.m)?;
        writeln!(f, "Window Size (2*m+1)     : {}", self.window_size())?;
        writeln!(f, "n (Order)               : {}", self.n)?;
        writeln!(f, "s (Differentiate)       : {}", self.s)?;
        writeln!(f, "t: Filter point ([-m,m]): {}", self.t)?;
        write!(f, "dt (Time step)          : {}", self.dt)
    }
}

/// Output configuration for the command-line front end
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Emit the raw sample alongside the filtered value
    pub include_raw: bool,
}

/// Joint tracking configuration
///
/// Every tracked joint gets its own smoothing and velocity filter built from
/// these options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Samples retained per joint (at least the filter window)
    pub history_capacity: usize,
    /// Frames a body may go without updates before it is dropped
    pub body_timeout_frames: u64,
    /// Position smoothing filter
    pub smoothing: FilterOptions,
    /// Velocity filter (derivative order 1)
    pub velocity: FilterOptions,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        let smoothing = FilterOptions::causal(
            DEFAULT_HALF_WIDTH,
            DEFAULT_POLY_ORDER,
            DEFAULT_DERIVATIVE,
            KINECT_FRAME_DT,
        );
        Self {
            history_capacity: smoothing.window_size(),
            body_timeout_frames: DEFAULT_BODY_TIMEOUT_FRAMES,
            smoothing,
            velocity: smoothing.with_derivative(1),
        }
    }
}

/// Top-level configuration file layout
///
/// # Example
/// ```
/// use sgtrack::config::SgConfig;
///
/// let config = SgConfig::from_toml_str("[filter]\nm = 3\nt = 0\nn = 2\n").unwrap();
/// assert_eq!(config.filter.window_size(), 7);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SgConfig {
    pub filter: FilterOptions,
    pub output: OutputConfig,
    pub tracking: TrackingConfig,
}

impl SgConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| SgError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| SgError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        self.filter.validate()?;
        self.tracking.smoothing.validate()?;
        self.tracking.velocity.validate()?;
        let needed = self
            .tracking
            .smoothing
            .window_size()
            .max(self.tracking.velocity.window_size());
        if self.tracking.history_capacity < needed {
            return Err(SgError::Config(format!(
                "tracking history capacity {} smaller than filter window {}",
                self.tracking.history_capacity, needed
            )));
        }
        Ok(())
    }
}
