mod measure;
mod noise;
mod signal;

pub use measure::{ErrorStats, filter_error, raw_error};
pub use noise::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, JitterConfig, NoiseConfig, apply_noise,
    apply_noise_vec3, signal_power,
};
pub use signal::{polynomial, ramp, sinusoid, sinusoid_derivative, step_trajectory};
