mod csv;
mod json;
mod text;

use std::fmt;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::signal_processing::Vec3;

pub use self::csv::CsvFormatter;
pub use self::json::JsonFormatter;
pub use self::text::TextFormatter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Csv,
    Json,
}

/// A scalar or vector sample value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SampleValue {
    Scalar(f64),
    Vector(Vec3),
}

impl From<f64> for SampleValue {
    fn from(v: f64) -> Self {
        SampleValue::Scalar(v)
    }
}

impl From<Vec3> for SampleValue {
    fn from(v: Vec3) -> Self {
        SampleValue::Vector(v)
    }
}

impl fmt::Display for SampleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleValue::Scalar(v) => write!(f, "{:.6}", v),
            SampleValue::Vector(v) => write!(f, "{}", v),
        }
    }
}

/// One filter output, tagged with the input sample it estimates
///
/// For `t < m` that sample lags the newest input by `m - t` positions.
pub struct FilteredOutput {
    /// Input position of the estimated sample
    pub index: usize,
    /// `index * dt`
    pub time: f64,
    pub raw: SampleValue,
    pub filtered: SampleValue,
}

pub trait Formatter: Send {
    fn format(&self, output: &FilteredOutput) -> String;

    fn header(&self) -> Option<String> {
        None
    }
}

pub fn create_formatter(format: OutputFormat, vector: bool, include_raw: bool) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Text => Box::new(TextFormatter::new(include_raw)),
        OutputFormat::Csv => Box::new(CsvFormatter::new(vector, include_raw)),
        OutputFormat::Json => Box::new(JsonFormatter::new(include_raw)),
    }
}

pub fn iso8601_timestamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
