use rand::RngExt;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

use crate::signal_processing::Vec3;

#[derive(Clone, Debug, Default, serde::Deserialize)]
pub struct NoiseConfig {
    pub seed: Option<u64>,
    pub additive: Option<AdditiveNoiseConfig>,
    pub jitter: Option<JitterConfig>,
    pub impulse: Option<ImpulseNoiseConfig>,
}

impl NoiseConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_awgn(mut self, snr_db: f64) -> Self {
        self.additive = Some(AdditiveNoiseConfig { snr_db });
        self
    }

    pub fn with_jitter(mut self, std_dev: f64) -> Self {
        self.jitter = Some(JitterConfig { std_dev });
        self
    }

    pub fn with_impulse(mut self, probability: f64, amplitude: f64) -> Self {
        self.impulse = Some(ImpulseNoiseConfig {
            probability,
            amplitude,
        });
        self
    }
}

/// White Gaussian noise scaled to a signal-to-noise ratio
#[derive(Clone, Debug, serde::Deserialize)]
pub struct AdditiveNoiseConfig {
    pub snr_db: f64,
}

/// White Gaussian noise with a fixed standard deviation (sensor jitter)
#[derive(Clone, Debug, serde::Deserialize)]
pub struct JitterConfig {
    pub std_dev: f64,
}

/// Isolated outliers (tracking glitches)
#[derive(Clone, Debug, serde::Deserialize)]
pub struct ImpulseNoiseConfig {
    /// Per-sample probability of an outlier
    pub probability: f64,
    /// Outlier magnitude, added with random sign
    pub amplitude: f64,
}

fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => rand::make_rng(),
    }
}

pub fn signal_power(signal: &[f64]) -> f64 {
    if signal.is_empty() {
        return 0.0;
    }
    signal.iter().map(|&x| x * x).sum::<f64>() / signal.len() as f64
}

fn add_gaussian(signal: &mut [f64], std_dev: f64, rng: &mut ChaCha8Rng) {
    if std_dev <= 0.0 {
        return;
    }
    let normal = match Normal::new(0.0, std_dev) {
        Ok(normal) => normal,
        Err(e) => {
            log::warn!("Skipping gaussian noise with std dev {}: {}", std_dev, e);
            return;
        }
    };

    for sample in signal.iter_mut() {
        *sample += normal.sample(rng);
    }
}

fn apply_additive_noise(signal: &mut [f64], config: &AdditiveNoiseConfig, rng: &mut ChaCha8Rng) {
    let sig_power = signal_power(signal);
    if sig_power == 0.0 {
        return;
    }

    let snr_linear = 10.0_f64.powf(config.snr_db / 10.0);
    let noise_std = (sig_power / snr_linear).sqrt();
    add_gaussian(signal, noise_std, rng);
}

fn apply_impulse_noise(signal: &mut [f64], config: &ImpulseNoiseConfig, rng: &mut ChaCha8Rng) {
    if config.probability <= 0.0 {
        return;
    }

    for sample in signal.iter_mut() {
        if rng.random::<f64>() < config.probability {
            let sign = if rng.random::<bool>() { 1.0 } else { -1.0 };
            *sample += sign * config.amplitude;
        }
    }
}

fn apply_noise_with_rng(signal: &[f64], config: &NoiseConfig, rng: &mut ChaCha8Rng) -> Vec<f64> {
    let mut output = signal.to_vec();

    if let Some(ref additive) = config.additive {
        apply_additive_noise(&mut output, additive, rng);
    }
    if let Some(ref jitter) = config.jitter {
        add_gaussian(&mut output, jitter.std_dev, rng);
    }
    if let Some(ref impulse) = config.impulse {
        apply_impulse_noise(&mut output, impulse, rng);
    }

    output
}

fn component(signal: &[Vec3], f: impl Fn(&Vec3) -> f32) -> Vec<f64> {
    signal.iter().map(|v| f(v) as f64).collect()
}

/// Return a noisy copy of `signal`
///
/// Deterministic when `config.seed` is set.
pub fn apply_noise(signal: &[f64], config: &NoiseConfig) -> Vec<f64> {
    let mut rng = create_rng(config.seed);
    apply_noise_with_rng(signal, config, &mut rng)
}

/// Noisy copy of a vector signal, each component perturbed independently
pub fn apply_noise_vec3(signal: &[Vec3], config: &NoiseConfig) -> Vec<Vec3> {
    let mut rng = create_rng(config.seed);

    let xs = apply_noise_with_rng(&component(signal, |v| v.x), config, &mut rng);
    let ys = apply_noise_with_rng(&component(signal, |v| v.y), config, &mut rng);
    let zs = apply_noise_with_rng(&component(signal, |v| v.z), config, &mut rng);

    xs.iter()
        .zip(&ys)
        .zip(&zs)
        .map(|((&x, &y), &z)| Vec3::new(x as f32, y as f32, z as f32))
        .collect()
}
