//! Rolling statistics

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DetectionError {
    #[error("series length mismatch: series {series}, lower {lower}, upper {upper}")]
    LengthMismatch { series: usize, lower: usize, upper: usize },
}

/// Z-score of each point against the trailing `window` points ending at it.
///
/// Early points use whatever history exists. The deviation is the sample
/// standard deviation; a flat window yields 0 rather than NaN. A zero
/// window behaves as a window of one.
pub fn rolling_zscore(series: &[f64], window: usize) -> Vec<f64> {
    let window = window.max(1);
    (0..series.len())
        .map(|idx| {
            let start = (idx + 1).saturating_sub(window);
            let slice = &series[start..=idx];
            let n = slice.len() as f64;
            let mean = slice.iter().sum::<f64>() / n;
            let std = if slice.len() > 1 {
                (slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0)).sqrt()
            } else {
                0.0
            };
            if std > 0.0 && std.is_finite() {
                (series[idx] - mean) / std
            } else {
                0.0
            }
        })
        .collect()
}

/// Distance of each point outside `[lower, upper]`, 0 inside the band.
pub fn band_distance(series: &[f64], lower: &[f64], upper: &[f64]) -> Result<Vec<f64>, DetectionError> {
    if series.len() != lower.len() || series.len() != upper.len() {
        return Err(DetectionError::LengthMismatch {
            series: series.len(),
            lower: lower.len(),
            upper: upper.len(),
        });
    }
    Ok(series
        .iter()
        .zip(lower.iter().zip(upper))
        .map(|(&x, (&lo, &hi))| {
            if x < lo {
                lo - x
            } else if x > hi {
                x - hi
            } else {
                0.0
            }
        })
        .collect())
}
