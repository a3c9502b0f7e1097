//! Exogenous sentiment curves
//!
//! A sentiment curve maps a day index to a price drift that traders add to
//! the last clearing price before drawing their limit price.

use serde::{Deserialize, Serialize};
use std::fmt;
use types::config::SentimentMode;

pub trait SentimentCurve: fmt::Debug {
    fn value_at(&self, day: usize) -> f64;
}

/// Always zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NoSentiment;

impl SentimentCurve for NoSentiment {
    fn value_at(&self, _day: usize) -> f64 {
        0.0
    }
}

/// `magnitude` from `start_day` onward, zero before.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepSentiment {
    pub start_day: usize,
    pub magnitude: f64,
}

impl SentimentCurve for StepSentiment {
    fn value_at(&self, day: usize) -> f64 {
        if day >= self.start_day {
            self.magnitude
        } else {
            0.0
        }
    }
}

/// `magnitude` inside `[center_day - width / 2, center_day + width / 2]`
/// (integer halving), zero outside.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PulseSentiment {
    pub center_day: usize,
    pub width: usize,
    pub magnitude: f64,
}

impl SentimentCurve for PulseSentiment {
    fn value_at(&self, day: usize) -> f64 {
        let half = (self.width / 2) as i64;
        let (day, center) = (day as i64, self.center_day as i64);
        if center - half <= day && day <= center + half {
            self.magnitude
        } else {
            0.0
        }
    }
}

/// Explicit per-day values; days past the end read as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesSentiment {
    pub values: Vec<f64>,
}

impl SentimentCurve for SeriesSentiment {
    fn value_at(&self, day: usize) -> f64 {
        self.values.get(day).copied().unwrap_or(0.0)
    }
}

/// Curve for a configured mode. `start_day` anchors the step and centers the
/// pulse; `width` only applies to the pulse.
pub fn sentiment_from_config(
    mode: SentimentMode,
    start_day: usize,
    width: usize,
    magnitude: f64,
) -> Box<dyn SentimentCurve> {
    match mode {
        SentimentMode::None => Box::new(NoSentiment),
        SentimentMode::Step => Box::new(StepSentiment { start_day, magnitude }),
        SentimentMode::Pulse => Box::new(PulseSentiment {
            center_day: start_day,
            width,
            magnitude,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_sentiment() {
        assert!((0..100).all(|d| NoSentiment.value_at(d) == 0.0));
    }

    #[test]
    fn test_step() {
        let step = StepSentiment { start_day: 10, magnitude: 5.0 };
        assert_eq!(step.value_at(9), 0.0);
        assert_eq!(step.value_at(10), 5.0);
        assert_eq!(step.value_at(1_000), 5.0);
    }

    #[test]
    fn test_pulse_window() {
        let pulse = PulseSentiment { center_day: 15, width: 4, magnitude: 10.0 };
        assert_eq!(pulse.value_at(12), 0.0);
        assert_eq!(pulse.value_at(13), 10.0);
        assert_eq!(pulse.value_at(17), 10.0);
        assert_eq!(pulse.value_at(18), 0.0);
    }

    #[test]
    fn test_pulse_near_day_zero() {
        let pulse = PulseSentiment { center_day: 1, width: 6, magnitude: -2.0 };
        assert_eq!(pulse.value_at(0), -2.0);
        assert_eq!(pulse.value_at(4), -2.0);
        assert_eq!(pulse.value_at(5), 0.0);
    }

    #[test]
    fn test_odd_width_rounds_down() {
        let pulse = PulseSentiment { center_day: 10, width: 3, magnitude: 1.0 };
        assert_eq!(pulse.value_at(8), 0.0);
        assert_eq!(pulse.value_at(9), 1.0);
        assert_eq!(pulse.value_at(11), 1.0);
        assert_eq!(pulse.value_at(12), 0.0);
    }

    #[test]
    fn test_series() {
        let series = SeriesSentiment { values: vec![1.0, -1.0] };
        assert_eq!(series.value_at(1), -1.0);
        assert_eq!(series.value_at(2), 0.0);
    }

    #[test]
    fn test_from_config() {
        let curve = sentiment_from_config(SentimentMode::Step, 5, 0, 3.0);
        assert_eq!(curve.value_at(4), 0.0);
        assert_eq!(curve.value_at(5), 3.0);
        let curve = sentiment_from_config(SentimentMode::Pulse, 20, 2, 1.5);
        assert_eq!(curve.value_at(21), 1.5);
        assert_eq!(curve.value_at(22), 0.0);
        let curve = sentiment_from_config(SentimentMode::None, 0, 0, 99.0);
        assert_eq!(curve.value_at(0), 0.0);
    }
}
