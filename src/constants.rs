//! Default filter parameters and numeric tolerances
//!
//! The defaults describe a causal 11-sample cubic smoother, the setting used
//! for real-time joint tracking.

/// Default window half-width `m` (window is `2m+1` samples).
pub const DEFAULT_HALF_WIDTH: usize = 5;

/// Default evaluation point `t`. Equal to `m` so the filter only looks back.
pub const DEFAULT_EVAL_POINT: i32 = 5;

/// Default local polynomial order `n`.
pub const DEFAULT_POLY_ORDER: usize = 3;

/// Default derivative order `s`.
pub const DEFAULT_DERIVATIVE: usize = 0;

/// Default sampling interval in seconds.
pub const DEFAULT_TIME_STEP: f64 = 1.0;

/// Kinect body frames arrive at 30 Hz.
pub const KINECT_FRAME_DT: f64 = 1.0 / 30.0;

/// Frames a body may go unseen before the tracker drops its signals.
pub const DEFAULT_BODY_TIMEOUT_FRAMES: u64 = 30;

/// Tolerance on the sum of smoothing weights (which must be 1).
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;
