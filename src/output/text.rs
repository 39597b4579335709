use super::{FilteredOutput, Formatter};

pub struct TextFormatter {
    include_raw: bool,
}

impl TextFormatter {
    pub fn new(include_raw: bool) -> Self {
        Self { include_raw }
    }
}

impl Formatter for TextFormatter {
    fn format(&self, output: &FilteredOutput) -> String {
        if self.include_raw {
            format!(
                "[{}] t={:.3}s {} (raw: {})",
                output.index, output.time, output.filtered, output.raw
            )
        } else {
            format!("[{}] t={:.3}s {}", output.index, output.time, output.filtered)
        }
    }
}
