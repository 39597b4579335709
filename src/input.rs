//! Text sample parsing for the command-line front end
//!
//! One sample per line. Scalar lines hold a single number; vector lines hold
//! three numbers separated by commas and/or whitespace. Blank lines and lines
//! starting with `#` carry no sample.

use crate::error::{Result, SgError};
use crate::signal_processing::Vec3;

fn fields(line: &str) -> Option<Vec<&str>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    Some(
        line.split(|c: char| c == ',' || c.is_whitespace())
            .filter(|f| !f.is_empty())
            .collect(),
    )
}

fn parse_number<T: std::str::FromStr>(field: &str, line: &str) -> Result<T> {
    field
        .parse()
        .map_err(|_| SgError::Parse(format!("invalid number '{}' in '{}'", field, line.trim())))
}

/// Parse a scalar sample line; `Ok(None)` for blank and comment lines
pub fn parse_scalar(line: &str) -> Result<Option<f64>> {
    let Some(fields) = fields(line) else {
        return Ok(None);
    };
    match fields.as_slice() {
        [value] => parse_number(value, line).map(Some),
        _ => Err(SgError::Parse(format!(
            "expected 1 value, got {} in '{}'",
            fields.len(),
            line.trim()
        ))),
    }
}

/// Parse an `x,y,z` sample line; `Ok(None)` for blank and comment lines
pub fn parse_vector(line: &str) -> Result<Option<Vec3>> {
    let Some(fields) = fields(line) else {
        return Ok(None);
    };
    match fields.as_slice() {
        [x, y, z] => Ok(Some(Vec3::new(
            parse_number(x, line)?,
            parse_number(y, line)?,
            parse_number(z, line)?,
        ))),
        _ => Err(SgError::Parse(format!(
            "expected 3 values, got {} in '{}'",
            fields.len(),
            line.trim()
        ))),
    }
}
