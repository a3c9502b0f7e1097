//! Price/volume anomaly scores

use crate::detection::stats::rolling_zscore;
use crate::state::{price_series, volume_series, MarketState};
use auction::OrderCurves;

/// Trailing window used when callers do not pick one.
pub const DEFAULT_WINDOW: usize = 20;

const IMBALANCE_EPSILON: f64 = 1e-6;

/// `|z(price)| + |z(volume)|` per day.
pub fn compute_price_volume_anomaly(states: &[MarketState], window: usize) -> Vec<f64> {
    let zp = rolling_zscore(&price_series(states), window);
    let zv = rolling_zscore(&volume_series(states), window);
    zp.iter().zip(&zv).map(|(p, v)| p.abs() + v.abs()).collect()
}

/// Mean absolute gap between the buy and sell curves, relative to the mean
/// sell depth. Missing or empty curves score 0.
pub fn curve_imbalance_score(curves: Option<&OrderCurves>) -> f64 {
    let Some(curves) = curves.filter(|c| !c.is_empty()) else {
        return 0.0;
    };
    let n = curves.len() as f64;
    let gap: f64 = curves
        .buy_curve()
        .iter()
        .zip(curves.sell_curve())
        .map(|(b, s)| (b - s).abs())
        .sum();
    let avg_sell = curves.sell_curve().iter().sum::<f64>() / n;
    gap / n / (avg_sell + IMBALANCE_EPSILON)
}

/// Write the price/volume anomaly score into every state.
pub fn attach_anomaly_scores(states: &mut [MarketState], window: usize) {
    let scores = compute_price_volume_anomaly(states, window);
    for (state, score) in states.iter_mut().zip(scores) {
        state.manipulation_score = Some(score);
    }
}
