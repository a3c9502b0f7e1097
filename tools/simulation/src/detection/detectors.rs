//! Pluggable anomaly detectors
//!
//! Every detector scores each day in `[0, 1]` and flags a subset as
//! anomalous. Detectors can be combined with [`ensemble_detection`].

use crate::detection::anomaly::{compute_price_volume_anomaly, DEFAULT_WINDOW};
use crate::state::MarketState;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    /// Per-day score in `[0, 1]`
    pub scores: Vec<f64>,
    pub is_anomaly: Vec<bool>,
    /// Mean score of the flagged days, 0 when nothing is flagged
    pub confidence: f64,
    pub method: String,
}

impl DetectionResult {
    fn empty(n: usize, method: &str) -> Self {
        Self {
            scores: vec![0.0; n],
            is_anomaly: vec![false; n],
            confidence: 0.0,
            method: method.to_string(),
        }
    }

    /// Days flagged as anomalous.
    pub fn anomalous_days(&self) -> Vec<usize> {
        self.is_anomaly
            .iter()
            .enumerate()
            .filter_map(|(day, flagged)| flagged.then_some(day))
            .collect()
    }

    pub fn anomaly_count(&self) -> usize {
        self.is_anomaly.iter().filter(|f| **f).count()
    }
}

pub trait AnomalyDetector {
    fn name(&self) -> &'static str;

    fn detect(&self, states: &[MarketState]) -> DetectionResult;
}

fn flagged_confidence(scores: &[f64], is_anomaly: &[bool]) -> f64 {
    let flagged: Vec<f64> = scores
        .iter()
        .zip(is_anomaly)
        .filter_map(|(s, f)| f.then_some(*s))
        .collect();
    if flagged.is_empty() {
        0.0
    } else {
        flagged.iter().sum::<f64>() / flagged.len() as f64
    }
}

/// Multivariate outlier score: Euclidean distance from the feature means in
/// standardized space, scaled by the largest distance of the run.
///
/// Features per day are relative price change, volume, curve imbalance
/// `(buy - sell) / (buy + sell)` and absolute price change. The top
/// `contamination` share of days is flagged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StandardizedDistanceDetector {
    contamination: f64,
}

impl Default for StandardizedDistanceDetector {
    fn default() -> Self {
        Self::new(0.1)
    }
}

impl StandardizedDistanceDetector {
    /// `contamination` is clamped to `[0, 0.5]`.
    pub fn new(contamination: f64) -> Self {
        Self {
            contamination: contamination.clamp(0.0, 0.5),
        }
    }

    pub fn contamination(&self) -> f64 {
        self.contamination
    }

    fn features(states: &[MarketState]) -> Vec<[f64; 4]> {
        states
            .iter()
            .enumerate()
            .map(|(idx, state)| {
                let price_change = match idx.checked_sub(1).map(|prev| states[prev].price) {
                    Some(prev) if prev != 0.0 => (state.price - prev) / prev,
                    _ => 0.0,
                };
                let imbalance = state
                    .order_curves
                    .as_ref()
                    .filter(|c| !c.is_empty())
                    .map_or(0.0, |c| {
                        let buy: f64 = c.buy_curve().iter().sum();
                        let sell: f64 = c.sell_curve().iter().sum();
                        if buy + sell > 0.0 {
                            (buy - sell) / (buy + sell)
                        } else {
                            0.0
                        }
                    });
                [price_change, state.volume, imbalance, price_change.abs()]
            })
            .collect()
    }
}

impl AnomalyDetector for StandardizedDistanceDetector {
    fn name(&self) -> &'static str {
        "standardized_distance"
    }

    fn detect(&self, states: &[MarketState]) -> DetectionResult {
        let n = states.len();
        if n < 2 {
            return DetectionResult::empty(n, self.name());
        }

        let features = Self::features(states);
        let mut means = [0.0; 4];
        let mut stds = [1.0; 4];
        for col in 0..4 {
            means[col] = features.iter().map(|row| row[col]).sum::<f64>() / n as f64;
            let variance = features.iter().map(|row| (row[col] - means[col]).powi(2)).sum::<f64>() / (n - 1) as f64;
            if variance > 0.0 {
                stds[col] = variance.sqrt();
            }
        }

        let distances: Vec<f64> = features
            .iter()
            .map(|row| {
                (0..4)
                    .map(|col| ((row[col] - means[col]) / stds[col]).powi(2))
                    .sum::<f64>()
                    .sqrt()
            })
            .collect();
        let max_dist = distances.iter().copied().fold(0.0, f64::max);
        let scores: Vec<f64> = distances
            .iter()
            .map(|d| if max_dist > 0.0 { d / max_dist } else { 0.0 })
            .collect();

        let mut sorted = scores.clone();
        sorted.sort_by(|a, b| b.total_cmp(a));
        let cut = ((n as f64 * self.contamination) as usize).min(n - 1);
        let threshold = sorted[cut];
        let is_anomaly: Vec<bool> = scores.iter().map(|s| *s >= threshold).collect();
        let confidence = flagged_confidence(&scores, &is_anomaly);

        DetectionResult {
            scores,
            is_anomaly,
            confidence,
            method: self.name().to_string(),
        }
    }
}

/// Rolling price/volume z-score, scaled to `[0, 1]` by the run maximum.
/// A day is flagged when its raw combined z-score exceeds `threshold`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZScoreDetector {
    pub window: usize,
    pub threshold: f64,
}

impl Default for ZScoreDetector {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            threshold: 3.0,
        }
    }
}

impl AnomalyDetector for ZScoreDetector {
    fn name(&self) -> &'static str {
        "zscore"
    }

    fn detect(&self, states: &[MarketState]) -> DetectionResult {
        let raw = compute_price_volume_anomaly(states, self.window);
        let max = raw.iter().copied().fold(0.0, f64::max);
        let scores: Vec<f64> = raw.iter().map(|r| if max > 0.0 { r / max } else { 0.0 }).collect();
        let is_anomaly: Vec<bool> = raw.iter().map(|r| *r > self.threshold).collect();
        let confidence = flagged_confidence(&scores, &is_anomaly);
        DetectionResult {
            scores,
            is_anomaly,
            confidence,
            method: self.name().to_string(),
        }
    }
}

/// Weighted combination of several detectors.
///
/// Weights are normalized to sum to one. Scores and confidences are weighted
/// averages; a day is flagged when a strict majority of detectors flag it.
pub fn ensemble_detection(states: &[MarketState], detectors: &[(&dyn AnomalyDetector, f64)]) -> DetectionResult {
    let n = states.len();
    let total_weight: f64 = detectors.iter().map(|(_, w)| w.max(0.0)).sum();
    if n == 0 || detectors.is_empty() || total_weight <= 0.0 {
        return DetectionResult::empty(n, "ensemble");
    }

    let results: Vec<(DetectionResult, f64)> = detectors
        .iter()
        .map(|(detector, weight)| (detector.detect(states), weight.max(0.0) / total_weight))
        .collect();

    let mut scores = vec![0.0; n];
    let mut votes = vec![0usize; n];
    let mut confidence = 0.0;
    for (result, weight) in &results {
        for (slot, score) in scores.iter_mut().zip(&result.scores) {
            *slot += score * weight;
        }
        for (slot, flagged) in votes.iter_mut().zip(&result.is_anomaly) {
            if *flagged {
                *slot += 1;
            }
        }
        confidence += result.confidence * weight;
    }
    let is_anomaly = votes.iter().map(|v| *v * 2 > results.len()).collect();

    DetectionResult {
        scores,
        is_anomaly,
        confidence,
        method: "ensemble".to_string(),
    }
}
