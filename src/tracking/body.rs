use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::config::TrackingConfig;
use crate::error::Result;
use crate::signal_processing::Vec3;

use super::joint::{JointKind, JointSignal, JointState};

/// Per-body, per-joint filtering
///
/// Bodies are identified by the sensor's 64-bit tracking id. Each
/// `(body, joint)` pair owns an independent [`JointSignal`]. Call
/// [`end_frame`](Self::end_frame) once per sensor frame to expire bodies that
/// stopped reporting.
pub struct BodyTracker {
    config: TrackingConfig,
    signals: HashMap<(u64, JointKind), JointSignal>,
    last_seen: HashMap<u64, u64>,
    frame: u64,
}

impl BodyTracker {
    /// Create a tracker with no bodies
    ///
    /// # Arguments
    /// * `config` - Filter options and timeout shared by every joint signal
    ///
    /// # Errors
    /// `InvalidConfiguration` if either filter configuration is invalid
    pub fn new(config: TrackingConfig) -> Result<Self> {
        // Validates both filter configurations up front.
        JointSignal::new(&config)?;
        Ok(Self {
            config,
            signals: HashMap::new(),
            last_seen: HashMap::new(),
            frame: 0,
        })
    }

    /// Feed a raw joint position for the current frame
    ///
    /// # Returns
    /// The filtered state of the joint, or `None` until its filters are warm
    pub fn update(
        &mut self,
        body_id: u64,
        joint: JointKind,
        position: Vec3,
    ) -> Result<Option<JointState>> {
        self.last_seen.insert(body_id, self.frame);

        let signal = match self.signals.entry((body_id, joint)) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                log::debug!("Tracking {} of body {}", joint, body_id);
                entry.insert(JointSignal::new(&self.config)?)
            }
        };

        Ok(signal.update(position))
    }

    /// Latest filtered state of a joint
    pub fn state(&self, body_id: u64, joint: JointKind) -> Option<JointState> {
        self.signals
            .get(&(body_id, joint))
            .and_then(JointSignal::state)
    }

    /// Drop every signal of a body
    pub fn remove_body(&mut self, body_id: u64) {
        self.signals.retain(|&(id, _), _| id != body_id);
        self.last_seen.remove(&body_id);
    }

    /// Advance the frame counter and expire stale bodies
    ///
    /// Returns the ids of the bodies removed.
    pub fn end_frame(&mut self) -> Vec<u64> {
        let frame = self.frame;
        let timeout = self.config.body_timeout_frames;
        let mut expired: Vec<u64> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| frame - seen >= timeout)
            .map(|(&id, _)| id)
            .collect();
        expired.sort_unstable();

        for &id in &expired {
            log::info!("Body {} lost after {} frames", id, timeout);
            self.remove_body(id);
        }

        self.frame += 1;
        expired
    }

    /// Ids of all bodies with at least one tracked joint, ascending
    pub fn tracked_bodies(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.last_seen.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FilterOptions;

    fn tracker(timeout: u64) -> BodyTracker {
        let smoothing = FilterOptions::causal(1, 1, 0, 1.0);
        BodyTracker::new(TrackingConfig {
            history_capacity: 3,
            smoothing,
            velocity: smoothing.with_derivative(1),
            body_timeout_frames: timeout,
        })
        .unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackingConfig {
            smoothing: FilterOptions::causal(1, 4, 0, 1.0),
            ..TrackingConfig::default()
        };
        assert!(BodyTracker::new(config).is_err());
    }

    #[test]
    fn test_joints_are_independent() {
        let mut tracker = tracker(10);
        for i in 0..3 {
            tracker
                .update(1, JointKind::KneeLeft, Vec3::splat(i as f32))
                .unwrap();
            tracker
                .update(1, JointKind::KneeRight, Vec3::splat(-(i as f32)))
                .unwrap();
            tracker.update(2, JointKind::KneeLeft, Vec3::ZERO).unwrap();
            tracker.end_frame();
        }

        let left = tracker.state(1, JointKind::KneeLeft).unwrap();
        let right = tracker.state(1, JointKind::KneeRight).unwrap();
        let other = tracker.state(2, JointKind::KneeLeft).unwrap();
        assert!((left.velocity.y - 1.0).abs() < 1e-5);
        assert!((right.velocity.y + 1.0).abs() < 1e-5);
        assert!(other.velocity.y.abs() < 1e-5);
        assert!(tracker.state(2, JointKind::FootLeft).is_none());
        assert_eq!(tracker.tracked_bodies(), vec![1, 2]);
    }

    #[test]
    fn test_stale_body_expires() {
        let mut tracker = tracker(2);
        tracker.update(7, JointKind::FootLeft, Vec3::ZERO).unwrap();
        tracker.update(9, JointKind::FootLeft, Vec3::ZERO).unwrap();
        assert!(tracker.end_frame().is_empty());

        tracker.update(9, JointKind::FootLeft, Vec3::ZERO).unwrap();
        assert!(tracker.end_frame().is_empty());

        tracker.update(9, JointKind::FootLeft, Vec3::ZERO).unwrap();
        assert_eq!(tracker.end_frame(), vec![7]);
        assert_eq!(tracker.tracked_bodies(), vec![9]);
        assert_eq!(tracker.frame(), 3);
    }

    #[test]
    fn test_remove_body() {
        let mut tracker = tracker(10);
        tracker.update(3, JointKind::HipLeft, Vec3::ZERO).unwrap();
        tracker.remove_body(3);
        assert!(tracker.tracked_bodies().is_empty());
        assert!(tracker.state(3, JointKind::HipLeft).is_none());
    }
}
