mod test_signals;

use approx::assert_abs_diff_eq;
use sgtrack::config::{FilterOptions, SgConfig, TrackingConfig};
use sgtrack::input::{parse_scalar, parse_vector};
use sgtrack::signal_processing::{Filter, SavitzkyGolayFilter, StreamingFilter, Vec3};
use sgtrack::simulation::{filter_error, raw_error, ramp, sinusoid, sinusoid_derivative};
use sgtrack::tracking::{BodyTracker, JointKind};

use test_signals::noisy_sinusoid;

#[test]
fn test_causal_cubic_smooths_noisy_sinusoid() {
    let filter = SavitzkyGolayFilter::new(FilterOptions::new(5, 5, 3, 0, 1.0)).unwrap();
    assert_eq!(filter.weights().len(), 11);
    let sum: f64 = filter.weights().iter().sum();
    assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-5);

    let (clean, noisy) = noisy_sinusoid(2000, 1.0, 0.01, 0.2, 17);
    let raw = raw_error(&noisy, &clean);
    let filtered = filter_error(&filter, &noisy, &clean).unwrap();

    assert_eq!(filtered.count, 1990);
    assert!(
        filtered.rms < raw.rms,
        "filtered rms {} not below raw rms {}",
        filtered.rms,
        raw.rms
    );
}

#[test]
fn test_centered_smoothing_beats_causal() {
    let (clean, noisy) = noisy_sinusoid(3000, 1.0 / 30.0, 0.5, 0.1, 5);
    let causal = SavitzkyGolayFilter::new(FilterOptions::causal(5, 2, 0, 1.0 / 30.0)).unwrap();
    let centered = SavitzkyGolayFilter::new(FilterOptions::centered(5, 2, 0, 1.0 / 30.0)).unwrap();

    let causal_rms = filter_error(&causal, &noisy, &clean).unwrap().rms;
    let centered_rms = filter_error(&centered, &noisy, &clean).unwrap().rms;
    let raw_rms = raw_error(&noisy, &clean).rms;

    assert!(centered_rms < causal_rms);
    assert!(causal_rms < raw_rms);
}

#[test]
fn test_velocity_of_clean_sinusoid() {
    let dt = 0.01;
    let clean = sinusoid(500, dt, 1.0, 1.0);
    let derivative = sinusoid_derivative(500, dt, 1.0, 1.0);

    let filter = SavitzkyGolayFilter::new(FilterOptions::centered(4, 4, 1, dt)).unwrap();
    let stats = filter_error(&filter, &clean, &derivative).unwrap();
    assert!(stats.max_abs < 1e-3, "max error {}", stats.max_abs);
}

#[test]
fn test_streaming_matches_batch() {
    let options = FilterOptions::causal(4, 2, 1, 0.5);
    let data = ramp(50, 0.5, 3.0, -2.0)
        .into_iter()
        .enumerate()
        .map(|(i, x)| x + 0.25 * (i as f64 * 0.9).sin())
        .collect::<Vec<f64>>();

    let batch = SavitzkyGolayFilter::new(options)
        .unwrap()
        .apply_all(&data)
        .unwrap();

    let mut stream = StreamingFilter::new(options).unwrap();
    let mut streamed = Vec::new();
    for &x in &data {
        if let Some(y) = stream.process(x) {
            streamed.push(y);
        }
    }

    assert_eq!(streamed.len(), data.len() - 8);
    for (a, b) in streamed.iter().zip(&batch) {
        assert_abs_diff_eq!(*a, *b, epsilon = 1e-12);
    }
}

#[test]
fn test_parsed_lines_through_stream() {
    let lines = "# x\n1\n2\n\n3\n4\n5\n";
    let mut stream = StreamingFilter::new(FilterOptions::causal(2, 1, 0, 1.0)).unwrap();
    let outputs: Vec<f64> = lines
        .lines()
        .filter_map(|l| parse_scalar(l).unwrap())
        .filter_map(|x| stream.process(x))
        .collect();

    assert_eq!(outputs.len(), 1);
    assert_abs_diff_eq!(outputs[0], 5.0, epsilon = 1e-12);

    let mut vectors = StreamingFilter::new(FilterOptions::causal(1, 1, 1, 0.5)).unwrap();
    let velocity: Vec<Vec3> = ["0,0,0", "1 2 3", "2,4,6"]
        .iter()
        .filter_map(|l| parse_vector(l).unwrap())
        .filter_map(|v| vectors.process(v))
        .collect();
    assert_eq!(velocity.len(), 1);
    assert_abs_diff_eq!(velocity[0].x, 2.0, epsilon = 1e-5);
    assert_abs_diff_eq!(velocity[0].y, 4.0, epsilon = 1e-5);
    assert_abs_diff_eq!(velocity[0].z, 6.0, epsilon = 1e-5);
}

#[test]
fn test_tracker_recovers_constant_velocity() {
    let config = TrackingConfig::default();
    let dt = config.smoothing.dt;
    let window = config.smoothing.window_size();
    let mut tracker = BodyTracker::new(config).unwrap();

    let start = Vec3::new(0.1, 0.2, 2.0);
    let velocity = Vec3::new(0.5, -0.2, 1.0);

    let mut last = None;
    for frame in 0..window + 5 {
        let position = start + velocity * (frame as f64 * dt) as f32;
        last = tracker
            .update(42, JointKind::FootLeft, position)
            .unwrap();
        if frame + 1 < window {
            assert!(last.is_none());
        }
        tracker.end_frame();
    }

    let state = last.unwrap();
    assert_abs_diff_eq!(state.velocity.x, 0.5, epsilon = 1e-3);
    assert_abs_diff_eq!(state.velocity.y, -0.2, epsilon = 1e-3);
    assert_abs_diff_eq!(state.velocity.z, 1.0, epsilon = 1e-3);

    let expected = start + velocity * ((window + 4) as f64 * dt) as f32;
    assert!(state.position.distance(expected) < 1e-4);
    assert_eq!(tracker.state(42, JointKind::FootLeft), Some(state));
    assert_eq!(tracker.state(42, JointKind::FootRight), None);
}

#[test]
fn test_tracker_joints_are_independent() {
    let mut tracker = BodyTracker::new(TrackingConfig::default()).unwrap();
    for frame in 0..20 {
        let y = frame as f32 * 0.01;
        tracker
            .update(1, JointKind::FootLeft, Vec3::new(0.0, y, 0.0))
            .unwrap();
        tracker
            .update(1, JointKind::FootRight, Vec3::new(0.0, 0.0, 0.0))
            .unwrap();
        tracker
            .update(2, JointKind::FootLeft, Vec3::new(1.0, 1.0, 1.0))
            .unwrap();
        tracker.end_frame();
    }

    let left = tracker.state(1, JointKind::FootLeft).unwrap();
    let right = tracker.state(1, JointKind::FootRight).unwrap();
    let other = tracker.state(2, JointKind::FootLeft).unwrap();

    assert_abs_diff_eq!(left.velocity.y, 0.3, epsilon = 1e-3);
    assert_abs_diff_eq!(right.velocity.length(), 0.0, epsilon = 1e-4);
    assert_abs_diff_eq!(other.position.x, 1.0, epsilon = 1e-5);
    assert_eq!(tracker.tracked_bodies(), vec![1, 2]);
}

#[test]
fn test_config_round_trip() {
    let config = SgConfig::from_toml_str(
        r#"
[filter]
m = 4
t = -1
n = 2
s = 1
dt = 0.02

[output]
format = "csv"
include_raw = true

[tracking]
history_capacity = 15
body_timeout_frames = 10
"#,
    )
    .unwrap();

    let text = toml::to_string(&config).unwrap();
    let reloaded = SgConfig::from_toml_str(&text).unwrap();

    assert_eq!(reloaded.filter, FilterOptions::new(4, -1, 2, 1, 0.02));
    assert_eq!(reloaded.output.format, config.output.format);
    assert!(reloaded.output.include_raw);
    assert_eq!(reloaded.tracking.history_capacity, 15);
    assert_eq!(reloaded.tracking.body_timeout_frames, 10);
    assert_eq!(reloaded.tracking.smoothing, config.tracking.smoothing);
}
