use std::f64::consts::PI;

use crate::signal_processing::Vec3;

/// `amplitude * sin(2π f t)` sampled every `dt` seconds
pub fn sinusoid(len: usize, dt: f64, amplitude: f64, freq_hz: f64) -> Vec<f64> {
    (0..len)
        .map(|i| amplitude * (2.0 * PI * freq_hz * i as f64 * dt).sin())
        .collect()
}

/// Analytic derivative of [`sinusoid`]
pub fn sinusoid_derivative(len: usize, dt: f64, amplitude: f64, freq_hz: f64) -> Vec<f64> {
    let w = 2.0 * PI * freq_hz;
    (0..len)
        .map(|i| amplitude * w * (w * i as f64 * dt).cos())
        .collect()
}

/// `intercept + slope * t`
pub fn ramp(len: usize, dt: f64, slope: f64, intercept: f64) -> Vec<f64> {
    (0..len).map(|i| intercept + slope * i as f64 * dt).collect()
}

/// Polynomial in `t` with coefficients in ascending order (`c0 + c1 t + c2 t² …`)
pub fn polynomial(len: usize, dt: f64, coeffs: &[f64]) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let t = i as f64 * dt;
            coeffs.iter().rev().fold(0.0, |acc, &c| acc * t + c)
        })
        .collect()
}

/// Synthetic foot trajectory of a dancer stepping in place
///
/// The foot rises by `lift` meters during the first half of every step
/// period and rests on the floor for the second half, while the body drifts
/// slowly sideways. Positions are relative to `origin`.
pub fn step_trajectory(len: usize, dt: f64, origin: Vec3, step_hz: f64, lift: f64) -> Vec<Vec3> {
    (0..len)
        .map(|i| {
            let t = i as f64 * dt;
            let height = lift * (2.0 * PI * step_hz * t).sin().max(0.0);
            let sway = 0.05 * (2.0 * PI * 0.25 * t).sin();
            origin + Vec3::new(sway as f32, height as f32, (0.02 * t) as f32)
        })
        .collect()
}
