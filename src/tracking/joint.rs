use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::TrackingConfig;
use crate::error::Result;
use crate::signal_processing::{SampleHistory, SavitzkyGolayFilter, Vec3};

/// Skeleton joints followed by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JointKind {
    FootLeft,
    FootRight,
    KneeLeft,
    KneeRight,
    HipLeft,
    HipRight,
    SpineBase,
}

impl JointKind {
    pub const ALL: [JointKind; 7] = [
        JointKind::FootLeft,
        JointKind::FootRight,
        JointKind::KneeLeft,
        JointKind::KneeRight,
        JointKind::HipLeft,
        JointKind::HipRight,
        JointKind::SpineBase,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            JointKind::FootLeft => "foot_left",
            JointKind::FootRight => "foot_right",
            JointKind::KneeLeft => "knee_left",
            JointKind::KneeRight => "knee_right",
            JointKind::HipLeft => "hip_left",
            JointKind::HipRight => "hip_right",
            JointKind::SpineBase => "spine_base",
        }
    }
}

impl fmt::Display for JointKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Filtered joint kinematics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct JointState {
    /// Smoothed position
    pub position: Vec3,
    /// First derivative of position, per second
    pub velocity: Vec3,
}

/// Filter state for one joint of one body
///
/// Owns its own history and filters; nothing is shared between joints.
#[derive(Debug, Clone)]
pub struct JointSignal {
    history: SampleHistory<Vec3>,
    smoothing: SavitzkyGolayFilter,
    velocity: SavitzkyGolayFilter,
    state: Option<JointState>,
}

impl JointSignal {
    pub fn new(config: &TrackingConfig) -> Result<Self> {
        let smoothing = SavitzkyGolayFilter::new(config.smoothing)?;
        let velocity = SavitzkyGolayFilter::new(config.velocity)?;
        let capacity = config
            .history_capacity
            .max(smoothing.window_size())
            .max(velocity.window_size());

        Ok(Self {
            history: SampleHistory::new(capacity)?,
            smoothing,
            velocity,
            state: None,
        })
    }

    /// Feed a raw position; returns the filtered state once enough samples
    /// have been seen for both filters
    pub fn update(&mut self, position: Vec3) -> Option<JointState> {
        self.history.push(position);
        let samples = self.history.as_slice();

        let position = self.smoothing.apply(samples, 0).ok()?;
        let velocity = self.velocity.apply(samples, 0).ok()?;
        let state = JointState { position, velocity };
        self.state = Some(state);
        Some(state)
    }

    /// Latest filtered state
    pub fn state(&self) -> Option<JointState> {
        self.state
    }

    /// Latest raw position
    pub fn raw(&self) -> Option<Vec3> {
        self.history.last()
    }

    pub fn reset(&mut self) {
        self.history.clear();
        self.state = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterOptions;
    use approx::assert_abs_diff_eq;

    fn config(dt: f64) -> TrackingConfig {
        let smoothing = FilterOptions::causal(3, 2, 0, dt);
        TrackingConfig {
            history_capacity: 7,
            smoothing,
            velocity: smoothing.with_derivative(1),
            body_timeout_frames: 5,
        }
    }

    #[test]
    fn test_joint_names() {
        assert_eq!(JointKind::KneeLeft.to_string(), "knee_left");
        assert_eq!(JointKind::ALL.len(), 7);
    }

    #[test]
    fn test_warm_up_then_state() {
        let mut signal = JointSignal::new(&config(0.1)).unwrap();
        for i in 0..6 {
            assert!(signal.update(Vec3::splat(i as f32)).is_none());
        }
        assert!(signal.update(Vec3::splat(6.0)).is_some());
        assert!(signal.state().is_some());
        assert_eq!(signal.raw(), Some(Vec3::splat(6.0)));
    }

    #[test]
    fn test_constant_velocity_joint() {
        let dt = 1.0 / 30.0;
        let mut signal = JointSignal::new(&config(dt)).unwrap();
        let velocity = Vec3::new(0.3, -0.6, 0.0);

        let mut state = None;
        for i in 0..20 {
            let t = i as f32 * dt as f32;
            state = signal.update(Vec3::new(1.0, 0.5, 2.0) + velocity * t);
        }

        let state = state.unwrap();
        let t_last = 19.0 * dt as f32;
        assert_abs_diff_eq!(state.position.x, 1.0 + 0.3 * t_last, epsilon = 1e-4);
        assert_abs_diff_eq!(state.position.y, 0.5 - 0.6 * t_last, epsilon = 1e-4);
        assert_abs_diff_eq!(state.velocity.x, 0.3, epsilon = 1e-3);
        assert_abs_diff_eq!(state.velocity.y, -0.6, epsilon = 1e-3);
        assert_abs_diff_eq!(state.velocity.z, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_reset() {
        let mut signal = JointSignal::new(&config(0.1)).unwrap();
        for i in 0..7 {
            signal.update(Vec3::splat(i as f32));
        }
        signal.reset();
        assert!(signal.state().is_none());
        assert!(signal.update(Vec3::ZERO).is_none());
    }
}
