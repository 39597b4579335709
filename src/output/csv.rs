use super::{FilteredOutput, Formatter, iso8601_timestamp};

pub struct CsvFormatter {
    vector: bool,
    include_raw: bool,
}

impl CsvFormatter {
    pub fn new(vector: bool, include_raw: bool) -> Self {
        Self {
            vector,
            include_raw,
        }
    }
}

impl Formatter for CsvFormatter {
    fn format(&self, output: &FilteredOutput) -> String {
        if self.include_raw {
            format!(
                "{},{},{:.6},{},{}",
                iso8601_timestamp(),
                output.index,
                output.time,
                output.raw,
                output.filtered
            )
        } else {
            format!(
                "{},{},{:.6},{}",
                iso8601_timestamp(),
                output.index,
                output.time,
                output.filtered
            )
        }
    }

    fn header(&self) -> Option<String> {
        let columns = match (self.vector, self.include_raw) {
            (false, false) => "filtered",
            (false, true) => "raw,filtered",
            (true, false) => "x,y,z",
            (true, true) => "raw_x,raw_y,raw_z,x,y,z",
        };
        Some(format!("ts,index,time,{}", columns))
    }
}
