use crate::error::{Result, SgError};
use crate::signal_processing::SavitzkyGolayFilter;

/// Error summary between an estimate and its reference
#[derive(Debug, Clone, Copy, Default, PartialEq, serde::Serialize)]
pub struct ErrorStats {
    pub rms: f64,
    pub max_abs: f64,
    pub count: usize,
}

impl ErrorStats {
    pub fn from_errors<I: IntoIterator<Item = f64>>(errors: I) -> Self {
        let mut sum_sq = 0.0;
        let mut max_abs = 0.0f64;
        let mut count = 0;
        for e in errors {
            sum_sq += e * e;
            max_abs = max_abs.max(e.abs());
            count += 1;
        }
        let rms = if count > 0 {
            (sum_sq / count as f64).sqrt()
        } else {
            0.0
        };
        Self {
            rms,
            max_abs,
            count,
        }
    }
}

/// Error of the raw samples against the reference
pub fn raw_error(noisy: &[f64], reference: &[f64]) -> ErrorStats {
    ErrorStats::from_errors(noisy.iter().zip(reference).map(|(n, r)| n - r))
}

/// Run `filter` over every full window of `noisy` and compare with `reference`
///
/// Window `k` covers `noisy[k..k+2m+1]` and is evaluated at offset `t`, so its
/// output is compared with `reference[k + m + t]`. For derivative filters the
/// reference must hold the derivative of the clean signal.
pub fn filter_error(
    filter: &SavitzkyGolayFilter,
    noisy: &[f64],
    reference: &[f64],
) -> Result<ErrorStats> {
    if reference.len() < noisy.len() {
        return Err(SgError::InsufficientSamples {
            needed: noisy.len(),
            available: reference.len(),
        });
    }

    let options = filter.options();
    let center = (options.m as i64 + options.t as i64) as usize;
    let filtered = filter.apply_all(noisy)?;

    Ok(ErrorStats::from_errors(
        filtered
            .iter()
            .enumerate()
            .map(|(k, y)| y - reference[k + center]),
    ))
}
