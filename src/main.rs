use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::PathBuf;
use std::thread::{self, JoinHandle};

use anyhow::Context;
use clap::Parser;
use crossbeam_channel::{Receiver, bounded};

use sgtrack::config::{FilterOptions, SampleInterval, SgConfig};
use sgtrack::input::{parse_scalar, parse_vector};
use sgtrack::output::{FilteredOutput, Formatter, OutputFormat, SampleValue, create_formatter};
use sgtrack::signal_processing::{Filter, Sample, StreamingFilter, Vec3};

#[derive(Parser, Debug)]
#[command(name = "sgtrack")]
#[command(about = "Stream samples through a Savitzky-Golay smoothing/differentiating filter")]
struct Args {
    /// Input file with one sample per line (stdin if omitted)
    input: Option<PathBuf>,

    /// TOML configuration file ([filter], [output] sections)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window half-width m (window is 2m+1 samples)
    #[arg(short = 'm', long)]
    half_width: Option<usize>,

    /// Evaluation point t in [-m, m]; defaults to m (real-time) when -m is given
    #[arg(short = 't', long, allow_negative_numbers = true)]
    eval_point: Option<i32>,

    /// Polynomial order n
    #[arg(short = 'n', long)]
    order: Option<usize>,

    /// Derivative order s (0 = smoothing)
    #[arg(short = 's', long)]
    derivative: Option<usize>,

    /// Sample interval (e.g., "0.033", "33ms", "30hz")
    #[arg(long)]
    dt: Option<SampleInterval>,

    /// Output format
    #[arg(short = 'f', long, value_enum)]
    format: Option<OutputFormat>,

    /// Samples are x,y,z vectors
    #[arg(long)]
    vector: bool,

    /// Include the raw sample in the output
    #[arg(long)]
    raw: bool,

    /// Increase log verbosity
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,
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

    let config = build_config(&args)?;
    log::info!("Filter configuration:\n{}", config.filter);

    let input: Box<dyn BufRead + Send> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let format = args.format.unwrap_or(config.output.format);
    let include_raw = args.raw || config.output.include_raw;
    let formatter = create_formatter(format, args.vector, include_raw);

    let read_count = if args.vector {
        let (rx, reader) = spawn_reader(input, parse_vector);
        run_processing_loop::<Vec3>(rx, config.filter, formatter.as_ref())?;
        join_reader(reader)?
    } else {
        let (rx, reader) = spawn_reader(input, parse_scalar);
        run_processing_loop::<f64>(rx, config.filter, formatter.as_ref())?;
        join_reader(reader)?
    };

    log::info!("Read {} samples", read_count);
    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<SgConfig> {
    let config = match &args.config {
        Some(path) => SgConfig::load(path).context("Failed to load config file")?,
        None => SgConfig::default(),
    };
    apply_overrides(config, args)
}

/// Merge command-line flags over the file configuration
///
/// `-m` without `-t` selects the real-time evaluation point `t = m`. The
/// merged filter options are validated.
fn apply_overrides(mut config: SgConfig, args: &Args) -> anyhow::Result<SgConfig> {
    let filter: &mut FilterOptions = &mut config.filter;
    if let Some(m) = args.half_width {
        filter.m = m;
        if args.eval_point.is_none() {
            filter.t = m as i32;
        }
    }
    if let Some(t) = args.eval_point {
        filter.t = t;
    }
    if let Some(n) = args.order {
        filter.n = n;
    }
    if let Some(s) = args.derivative {
        filter.s = s;
    }
    if let Some(dt) = args.dt {
        filter.dt = dt.as_secs();
    }

    config.filter.validate().context("Invalid filter parameters")?;
    Ok(config)
}

/// Parse input lines on a separate thread, forwarding samples over a bounded channel
fn spawn_reader<T, P>(
    input: Box<dyn BufRead + Send>,
    parse: P,
) -> (Receiver<T>, JoinHandle<io::Result<usize>>)
where
    T: Send + 'static,
    P: Fn(&str) -> sgtrack::Result<Option<T>> + Send + 'static,
{
    let (tx, rx) = bounded(1024);

    let handle = thread::spawn(move || {
        let mut count = 0;
        for (line_no, line) in input.lines().enumerate() {
            let line = line?;
            match parse(&line) {
                Ok(Some(sample)) => {
                    if tx.send(sample).is_err() {
                        // Processing loop has stopped
                        break;
                    }
                    count += 1;
                }
                Ok(None) => {}
                Err(e) => log::warn!("Skipping line {}: {}", line_no + 1, e),
            }
        }
        Ok(count)
    });

    (rx, handle)
}

fn join_reader(reader: JoinHandle<io::Result<usize>>) -> anyhow::Result<usize> {
    reader
        .join()
        .map_err(|_| anyhow::anyhow!("Input reader thread panicked"))?
        .context("Failed to read input")
}

fn run_processing_loop<T>(
    rx: Receiver<T>,
    options: FilterOptions,
    formatter: &dyn Formatter,
) -> anyhow::Result<()>
where
    T: Sample + Into<SampleValue>,
{
    let mut stream = StreamingFilter::<T>::new(options)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    if let Some(header) = formatter.header() {
        writeln!(out, "{}", header)?;
    }

    let mut emitted = 0usize;
    for (index, sample) in rx.iter().enumerate() {
        let Some(output) = process_sample(&mut stream, index, sample) else {
            continue;
        };
        writeln!(out, "{}", formatter.format(&output))?;
        emitted += 1;
    }

    out.flush()?;
    log::debug!(
        "Emitted {} values (warm-up {} samples)",
        emitted,
        stream.filter().window_size() - 1
    );
    Ok(())
}

/// Feed the sample at input position `index`; once warm, returns the output
/// labeled with the input position it estimates (`index - (m - t)`)
fn process_sample<T>(stream: &mut StreamingFilter<T>, index: usize, sample: T) -> Option<FilteredOutput>
where
    T: Sample + Into<SampleValue>,
{
    let filtered = stream.process(sample)?;
    let raw = stream.eval_sample()?;
    let at = index - stream.lag();
    Some(FilteredOutput {
        index: at,
        time: at as f64 * stream.filter().options().dt,
        raw: raw.into(),
        filtered: filtered.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn args(flags: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("sgtrack").chain(flags.iter().copied())).unwrap()
    }

    #[test]
    fn test_half_width_alone_selects_causal_point() {
        let config = apply_overrides(SgConfig::default(), &args(&["-m", "3"])).unwrap();
        assert_eq!(config.filter.m, 3);
        assert_eq!(config.filter.t, 3);
    }

    #[test]
    fn test_explicit_eval_point_kept() {
        let config = apply_overrides(SgConfig::default(), &args(&["-m", "3", "-t", "0"])).unwrap();
        assert_eq!(config.filter.t, 0);

        let config = apply_overrides(SgConfig::default(), &args(&["-m", "3", "-t", "-2"])).unwrap();
        assert_eq!(config.filter.t, -2);
    }

    #[test]
    fn test_flags_override_file() {
        let file = SgConfig::from_toml_str("[filter]\nm = 4\nt = 0\nn = 2\ns = 0\ndt = 0.5\n").unwrap();

        let config = apply_overrides(file.clone(), &args(&[])).unwrap();
        assert_eq!(config.filter, file.filter);

        let config = apply_overrides(file, &args(&["-n", "3", "-s", "1", "--dt", "20ms"])).unwrap();
        assert_eq!(config.filter, FilterOptions::new(4, 0, 3, 1, 0.02));
    }

    #[test]
    fn test_invalid_merge_rejected() {
        let file = SgConfig::from_toml_str("[filter]\nm = 4\nt = 0\nn = 2\n").unwrap();
        assert!(apply_overrides(file.clone(), &args(&["-m", "1"])).is_err());
        assert!(apply_overrides(file.clone(), &args(&["-t", "5"])).is_err());
        assert!(apply_overrides(file, &args(&["-s", "3"])).is_err());
    }

    #[test]
    fn test_centered_outputs_labeled_with_estimated_sample() {
        let mut stream = StreamingFilter::<f64>::new(FilterOptions::centered(2, 1, 0, 0.5)).unwrap();
        let outputs: Vec<FilteredOutput> = (0..10)
            .filter_map(|i| process_sample(&mut stream, i, i as f64))
            .collect();

        assert_eq!(outputs.len(), 6);
        for (k, output) in outputs.iter().enumerate() {
            let at = k + 2;
            assert_eq!(output.index, at);
            assert_abs_diff_eq!(output.time, at as f64 * 0.5, epsilon = 1e-12);
            assert_eq!(output.raw, SampleValue::Scalar(at as f64));
            match output.filtered {
                SampleValue::Scalar(y) => assert_abs_diff_eq!(y, at as f64, epsilon = 1e-9),
                SampleValue::Vector(_) => panic!("expected scalar output"),
            }
        }
    }

    #[test]
    fn test_causal_outputs_labeled_with_newest_sample() {
        let mut stream = StreamingFilter::<Vec3>::new(FilterOptions::causal(1, 1, 0, 1.0)).unwrap();
        let outputs: Vec<FilteredOutput> = (0..4)
            .filter_map(|i| process_sample(&mut stream, i, Vec3::splat(i as f32)))
            .collect();

        assert_eq!(outputs.iter().map(|o| o.index).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(outputs[1].raw, SampleValue::Vector(Vec3::splat(3.0)));
    }
}
