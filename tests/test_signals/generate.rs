use sgtrack::config::FilterOptions;
use sgtrack::simulation::{NoiseConfig, apply_noise, sinusoid};

/// Every well-posed configuration with `m <= max_m` and derivative order
/// `<= max_s`, at time step `dt`
pub fn valid_configurations(max_m: usize, max_s: usize, dt: f64) -> Vec<FilterOptions> {
    let mut configs = Vec::new();
    for m in 0..=max_m {
        for n in 0..(2 * m + 1).min(6) {
            for s in 0..=n.min(max_s) {
                for t in -(m as i32)..=(m as i32) {
                    configs.push(FilterOptions::new(m, t, n, s, dt));
                }
            }
        }
    }
    configs
}

/// Zero-mean pseudo-random buffer, reproducible from `seed`
pub fn random_buffer(len: usize, seed: u64) -> Vec<f64> {
    apply_noise(
        &vec![0.0; len],
        &NoiseConfig::default().with_seed(seed).with_jitter(1.0),
    )
}

/// (clean, noisy) sinusoid pair
pub fn noisy_sinusoid(
    len: usize,
    dt: f64,
    freq_hz: f64,
    std_dev: f64,
    seed: u64,
) -> (Vec<f64>, Vec<f64>) {
    let clean = sinusoid(len, dt, 1.0, freq_hz);
    let noisy = apply_noise(
        &clean,
        &NoiseConfig::default().with_seed(seed).with_jitter(std_dev),
    );
    (clean, noisy)
}
