use anyhow::{Context, Result};
use clap::Parser;
use sgtrack::config::SampleInterval;
use sgtrack::signal_processing::Vec3;
use sgtrack::simulation::{
    AdditiveNoiseConfig, ImpulseNoiseConfig, JitterConfig, NoiseConfig, apply_noise,
    apply_noise_vec3, sinusoid, step_trajectory,
};
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "generate_signal")]
#[command(about = "Generate noisy synthetic signals for Savitzky-Golay filter testing")]
struct Args {
    /// TOML noise configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, default_value = "data/synthetic")]
    output_dir: PathBuf,

    /// Signal frequencies in Hz: comma-separated (e.g., "0.5,1,2") or range (e.g., "0.5-2:0.5")
    #[arg(short, long, default_value = "1")]
    frequencies: String,

    /// Number of trials per frequency
    #[arg(short, long, default_value_t = 1)]
    trials: u32,

    /// Base seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of samples per signal
    #[arg(short = 'n', long, default_value_t = 300)]
    samples: usize,

    /// Sample interval (e.g., "0.033", "33ms", "30hz")
    #[arg(long, default_value = "30hz")]
    dt: SampleInterval,

    /// Sinusoid amplitude (or step lift height with --vector)
    #[arg(long, default_value_t = 1.0)]
    amplitude: f64,

    /// Generate x,y,z foot trajectories instead of scalar sinusoids
    #[arg(long)]
    vector: bool,

    /// Output filename prefix
    #[arg(long, default_value = "synth")]
    prefix: String,

    /// Generate manifest.json
    #[arg(long)]
    manifest: bool,

    /// Gaussian jitter standard deviation (CLI override)
    #[arg(long)]
    jitter: Option<f64>,

    /// AWGN SNR in dB (CLI override)
    #[arg(long)]
    snr: Option<f64>,

    /// Per-sample outlier probability (CLI override)
    #[arg(long)]
    impulse_probability: Option<f64>,
}

#[derive(Debug, serde::Serialize)]
struct ManifestEntry {
    file: String,
    samples_file: String,
    frequency_hz: f64,
    trial: u32,
    seed: u64,
}

#[derive(Debug, serde::Serialize)]
struct Manifest {
    samples: usize,
    dt: f64,
    amplitude: f64,
    vector: bool,
    files: Vec<ManifestEntry>,
}

fn parse_frequencies(s: &str) -> Result<Vec<f64>> {
    if s.contains(':') {
        let parts: Vec<&str> = s.split(':').collect();
        if parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let step: f64 = parts[1].parse().context("Invalid step value")?;
        if step <= 0.0 {
            anyhow::bail!("Step must be positive");
        }
        let range_parts: Vec<&str> = parts[0].split('-').collect();
        if range_parts.len() != 2 {
            anyhow::bail!("Invalid range format. Use 'start-end:step'");
        }
        let start: f64 = range_parts[0].parse().context("Invalid start value")?;
        let end: f64 = range_parts[1].parse().context("Invalid end value")?;

        let mut frequencies = Vec::new();
        let mut i = 0;
        loop {
            let f = start + i as f64 * step;
            if f > end + step * 1e-9 {
                break;
            }
            frequencies.push(f);
            i += 1;
        }
        Ok(frequencies)
    } else {
        s.split(',')
            .map(|p| p.trim().parse::<f64>().context("Invalid frequency value"))
            .collect()
    }
}

fn load_noise_config(path: &Path) -> Result<NoiseConfig> {
    let content = fs::read_to_string(path).context("Failed to read config file")?;
    toml::from_str(&content).context("Failed to parse config file")
}

fn build_noise_config(base: &NoiseConfig, args: &Args, seed: u64) -> NoiseConfig {
    let mut config = base.clone().with_seed(seed);

    if let Some(snr_db) = args.snr {
        config.additive = Some(AdditiveNoiseConfig { snr_db });
    }
    if let Some(std_dev) = args.jitter {
        config.jitter = Some(JitterConfig { std_dev });
    }
    if let Some(probability) = args.impulse_probability {
        config.impulse = Some(ImpulseNoiseConfig {
            probability,
            amplitude: args.amplitude,
        });
    }

    config
}

/// Returns (table csv, samples text)
fn render_scalar(args: &Args, frequency: f64, noise: &NoiseConfig) -> (String, String) {
    let dt = args.dt.as_secs();
    let clean = sinusoid(args.samples, dt, args.amplitude, frequency);
    let noisy = apply_noise(&clean, noise);

    let mut table = String::from("t,clean,noisy\n");
    let mut samples = String::new();
    for (i, (c, n)) in clean.iter().zip(&noisy).enumerate() {
        let _ = writeln!(table, "{:.6},{:.6},{:.6}", i as f64 * dt, c, n);
        let _ = writeln!(samples, "{:.6}", n);
    }
    (table, samples)
}

fn render_vector(args: &Args, frequency: f64, noise: &NoiseConfig) -> (String, String) {
    let dt = args.dt.as_secs();
    let origin = Vec3::new(0.0, 0.1, 2.0);
    let clean = step_trajectory(args.samples, dt, origin, frequency, args.amplitude);
    let noisy = apply_noise_vec3(&clean, noise);

    let mut table = String::from("t,clean_x,clean_y,clean_z,x,y,z\n");
    let mut samples = String::new();
    for (i, (c, n)) in clean.iter().zip(&noisy).enumerate() {
        let _ = writeln!(table, "{:.6},{},{}", i as f64 * dt, c, n);
        let _ = writeln!(samples, "{}", n);
    }
    (table, samples)
}

fn main() -> Result<()> {
    let args = Args::parse();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    fs::create_dir_all(&args.output_dir).context("Failed to create output directory")?;

    let base_noise = match args.config {
        Some(ref config_path) => load_noise_config(config_path)?,
        None => NoiseConfig::default(),
    };

    let frequencies = parse_frequencies(&args.frequencies)?;
    let base_seed = args.seed.or(base_noise.seed).unwrap_or(0);

    let mut manifest_entries = Vec::new();
    let total_files = frequencies.len() * args.trials as usize;
    let mut file_count = 0;

    for (freq_index, &frequency) in frequencies.iter().enumerate() {
        for trial in 0..args.trials {
            let seed = base_seed + trial as u64 * 1000 + freq_index as u64;
            let noise_config = build_noise_config(&base_noise, &args, seed);

            let (table, samples) = if args.vector {
                render_vector(&args, frequency, &noise_config)
            } else {
                render_scalar(&args, frequency, &noise_config)
            };

            let stem = format!("{}_f{:06.3}_t{:02}", args.prefix, frequency, trial);
            let filename = format!("{}.csv", stem);
            let samples_filename = format!("{}.samples", stem);

            fs::write(args.output_dir.join(&filename), table)
                .context("Failed to write signal table")?;
            fs::write(args.output_dir.join(&samples_filename), samples)
                .context("Failed to write samples file")?;

            manifest_entries.push(ManifestEntry {
                file: filename,
                samples_file: samples_filename,
                frequency_hz: frequency,
                trial,
                seed,
            });

            file_count += 1;
            eprint!("\rGenerating: {}/{}", file_count, total_files);
        }
    }
    eprintln!();

    if args.manifest {
        let manifest = Manifest {
            samples: args.samples,
            dt: args.dt.as_secs(),
            amplitude: args.amplitude,
            vector: args.vector,
            files: manifest_entries,
        };
        let manifest_path = args.output_dir.join("manifest.json");
        let manifest_json =
            serde_json::to_string_pretty(&manifest).context("Failed to serialize manifest")?;
        fs::write(&manifest_path, manifest_json).context("Failed to write manifest")?;
        eprintln!("Manifest written to: {}", manifest_path.display());
    }

    eprintln!(
        "Generated {} signals in {}",
        total_files,
        args.output_dir.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_frequencies_comma_separated() {
        let frequencies = parse_frequencies("0.5,1,2").unwrap();
        assert_eq!(frequencies, vec![0.5, 1.0, 2.0]);
    }

    #[test]
    fn test_parse_frequencies_range() {
        let frequencies = parse_frequencies("0.5-2:0.5").unwrap();
        assert_eq!(frequencies, vec![0.5, 1.0, 1.5, 2.0]);
    }

    #[test]
    fn test_parse_frequencies_invalid() {
        assert!(parse_frequencies("1-2:0").is_err());
        assert!(parse_frequencies("1-2-3:1").is_err());
        assert!(parse_frequencies("a,b").is_err());
    }

    #[test]
    fn test_noise_config_from_toml() {
        let config: NoiseConfig = toml::from_str(
            "seed = 4\n[jitter]\nstd_dev = 0.01\n[impulse]\nprobability = 0.02\namplitude = 0.3\n",
        )
        .unwrap();
        assert_eq!(config.seed, Some(4));
        assert_eq!(config.jitter.map(|j| j.std_dev), Some(0.01));
        assert!(config.additive.is_none());
    }
}
