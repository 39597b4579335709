use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};

use serde::{Deserialize, Serialize};

/// Element types a Savitzky-Golay filter can convolve
///
/// The filter only needs a weighted sum of a window followed by a division by
/// the derivative time scale. Accumulation happens in `f64` regardless of the
/// storage type.
pub trait Sample: Copy + Send + Sync {
    /// `(Σ_j weights[j] * window[j]) / scale`
    ///
    /// `window.len()` must equal `weights.len()`.
    fn convolve(weights: &[f64], window: &[Self], scale: f64) -> Self;
}

impl Sample for f64 {
    fn convolve(weights: &[f64], window: &[Self], scale: f64) -> Self {
        debug_assert_eq!(weights.len(), window.len());
        let sum: f64 = weights.iter().zip(window).map(|(w, x)| w * x).sum();
        sum / scale
    }
}

impl Sample for f32 {
    fn convolve(weights: &[f64], window: &[Self], scale: f64) -> Self {
        debug_assert_eq!(weights.len(), window.len());
        let sum: f64 = weights
            .iter()
            .zip(window)
            .map(|(w, &x)| w * x as f64)
            .sum();
        (sum / scale) as f32
    }
}

/// 3-component position/velocity vector (meters, meters per second)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Vec3 = Vec3::new(0.0, 0.0, 0.0);

    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    pub fn length(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    pub fn distance(&self, other: Vec3) -> f32 {
        (*self - other).length()
    }
}

impl Sample for Vec3 {
    fn convolve(weights: &[f64], window: &[Self], scale: f64) -> Self {
        debug_assert_eq!(weights.len(), window.len());
        let (mut x, mut y, mut z) = (0.0f64, 0.0f64, 0.0f64);
        for (w, v) in weights.iter().zip(window) {
            x += w * v.x as f64;
            y += w * v.y as f64;
            z += w * v.z as f64;
        }
        Vec3::new((x / scale) as f32, (y / scale) as f32, (z / scale) as f32)
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Vec3) {
        *self = *self + rhs;
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f32; 3]> for Vec3 {
    fn from(v: [f32; 3]) -> Self {
        Vec3::new(v[0], v[1], v[2])
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6},{:.6}", self.x, self.y, self.z)
    }
}
