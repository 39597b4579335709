use clap::Parser;
use rolling_stats::Stats;
use serde::Serialize;

use sgtrack::config::{FilterOptions, SampleInterval};
use sgtrack::signal_processing::SavitzkyGolayFilter;
use sgtrack::simulation::{
    NoiseConfig, apply_noise, filter_error, raw_error, sinusoid, sinusoid_derivative,
};

#[derive(Parser, Debug)]
#[command(name = "noise_analysis")]
#[command(about = "Sweep Savitzky-Golay configurations over noisy synthetic signals")]
struct Args {
    /// Output format: text, csv, json
    #[arg(short = 'f', long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Trials per configuration (each with its own seed)
    #[arg(short, long, default_value_t = 20)]
    trials: u32,

    /// Samples per trial
    #[arg(short = 'n', long, default_value_t = 600)]
    samples: usize,

    /// Sample interval (e.g., "0.033", "33ms", "30hz")
    #[arg(long, default_value = "30hz")]
    dt: SampleInterval,

    /// Frequency of the clean sinusoid in Hz
    #[arg(long, default_value_t = 0.5)]
    frequency: f64,

    /// Jitter standard deviations to sweep, comma-separated
    #[arg(long, default_value = "0.01,0.05,0.1")]
    jitter: String,

    /// Derivative order to analyze (0 or 1)
    #[arg(long, default_value_t = 0)]
    derivative: usize,

    /// Increase output verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Csv,
    Json,
}

#[derive(Debug, Clone, Serialize)]
struct SweepResult {
    m: usize,
    t: i32,
    n: usize,
    s: usize,
    jitter: f64,
    raw_rms_mean: f64,
    filtered_rms_mean: f64,
    filtered_rms_std: f64,
    /// filtered / raw (smoothing only)
    improvement: Option<f64>,
}

const HALF_WIDTHS: [usize; 4] = [2, 3, 5, 8];
const ORDERS: [usize; 4] = [1, 2, 3, 4];

fn parse_list(s: &str) -> anyhow::Result<Vec<f64>> {
    s.split(',')
        .map(|p| {
            p.trim()
                .parse::<f64>()
                .map_err(|e| anyhow::anyhow!("Invalid value '{}': {}", p, e))
        })
        .collect()
}

fn run_configuration(args: &Args, options: FilterOptions, jitter: f64) -> anyhow::Result<SweepResult> {
    let filter = SavitzkyGolayFilter::new(options)?;
    let dt = args.dt.as_secs();
    let clean = sinusoid(args.samples, dt, 1.0, args.frequency);
    let reference = if options.s == 0 {
        clean.clone()
    } else {
        sinusoid_derivative(args.samples, dt, 1.0, args.frequency)
    };

    let mut raw_stats: Stats<f64> = Stats::new();
    let mut filtered_stats: Stats<f64> = Stats::new();

    for trial in 0..args.trials {
        let noise = NoiseConfig::default()
            .with_seed(42 + trial as u64)
            .with_jitter(jitter);
        let noisy = apply_noise(&clean, &noise);

        raw_stats.update(raw_error(&noisy, &clean).rms);
        filtered_stats.update(filter_error(&filter, &noisy, &reference)?.rms);
    }

    let improvement =
        (options.s == 0 && raw_stats.mean > 0.0).then(|| filtered_stats.mean / raw_stats.mean);

    log::debug!(
        "m={} t={} n={} jitter={}: rms {:.5} -> {:.5}",
        options.m,
        options.t,
        options.n,
        jitter,
        raw_stats.mean,
        filtered_stats.mean
    );

    Ok(SweepResult {
        m: options.m,
        t: options.t,
        n: options.n,
        s: options.s,
        jitter,
        raw_rms_mean: raw_stats.mean,
        filtered_rms_mean: filtered_stats.mean,
        filtered_rms_std: filtered_stats.std_dev,
        improvement,
    })
}

fn run_sweep(args: &Args) -> anyhow::Result<Vec<SweepResult>> {
    let jitters = parse_list(&args.jitter)?;
    let dt = args.dt.as_secs();
    let mut results = Vec::new();

    for &jitter in &jitters {
        for &m in &HALF_WIDTHS {
            for &n in &ORDERS {
                if n >= 2 * m + 1 || args.derivative > n {
                    continue;
                }
                for options in [
                    FilterOptions::causal(m, n, args.derivative, dt),
                    FilterOptions::centered(m, n, args.derivative, dt),
                ] {
                    results.push(run_configuration(args, options, jitter)?);
                }
            }
        }
    }

    Ok(results)
}

fn print_text(results: &[SweepResult]) {
    for r in results {
        let improvement = r
            .improvement
            .map(|v| format!(" ({:.0}% of raw)", v * 100.0))
            .unwrap_or_default();
        println!(
            "m={:<2} t={:<2} n={} s={} jitter={:.3}: rms {:.5} ± {:.5}{}",
            r.m, r.t, r.n, r.s, r.jitter, r.filtered_rms_mean, r.filtered_rms_std, improvement
        );
    }
}

fn print_csv(results: &[SweepResult]) {
    println!("m,t,n,s,jitter,raw_rms,filtered_rms,filtered_rms_std,improvement");
    for r in results {
        let improvement = r
            .improvement
            .map(|v| format!("{:.4}", v))
            .unwrap_or_default();
        println!(
            "{},{},{},{},{},{:.6},{:.6},{:.6},{}",
            r.m,
            r.t,
            r.n,
            r.s,
            r.jitter,
            r.raw_rms_mean,
            r.filtered_rms_mean,
            r.filtered_rms_std,
            improvement
        );
    }
}

fn print_json(results: &[SweepResult]) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(results)?;
    println!("{}", json);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let results = run_sweep(&args)?;

    match args.format {
        OutputFormat::Text => print_text(&results),
        OutputFormat::Csv => print_csv(&results),
        OutputFormat::Json => print_json(&results)?,
    }

    Ok(())
}
