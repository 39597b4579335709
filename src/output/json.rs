use serde::Serialize;

use super::{FilteredOutput, Formatter, SampleValue, iso8601_timestamp};

#[derive(Serialize)]
struct JsonRecord<'a> {
    ts: String,
    index: usize,
    time: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<&'a SampleValue>,
    filtered: &'a SampleValue,
}

pub struct JsonFormatter {
    include_raw: bool,
}

impl JsonFormatter {
    pub fn new(include_raw: bool) -> Self {
        Self { include_raw }
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, output: &FilteredOutput) -> String {
        let record = JsonRecord {
            ts: iso8601_timestamp(),
            index: output.index,
            time: output.time,
            raw: self.include_raw.then_some(&output.raw),
            filtered: &output.filtered,
        };
        serde_json::to_string(&record).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
    }
}
