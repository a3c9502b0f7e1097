//! Per-day market snapshot

use auction::OrderCurves;
use serde::{Deserialize, Serialize};

/// Outcome of one simulated day.
///
/// Only `manipulation_score` is written after the runner produces the
/// state, by the detection pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub day: usize,
    pub price: f64,
    pub volume: f64,
    pub sentiment_value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_curves: Option<OrderCurves>,
    #[serde(default)]
    pub manipulation_score: Option<f64>,
}

impl MarketState {
    pub fn new(day: usize, price: f64, volume: f64, sentiment_value: f64) -> Self {
        Self {
            day,
            price,
            volume,
            sentiment_value,
            order_curves: None,
            manipulation_score: None,
        }
    }

    pub fn with_curves(mut self, curves: OrderCurves) -> Self {
        self.order_curves = Some(curves);
        self
    }

    pub fn traded(&self) -> bool {
        self.volume > 0.0
    }
}

/// Prices of a run, in day order.
pub fn price_series(states: &[MarketState]) -> Vec<f64> {
    states.iter().map(|s| s.price).collect()
}

/// Volumes of a run, in day order.
pub fn volume_series(states: &[MarketState]) -> Vec<f64> {
    states.iter().map(|s| s.volume).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_series_helpers() {
        let states = vec![MarketState::new(0, 100.0, 5.0, 0.0), MarketState::new(1, 101.0, 0.0, 0.5)];
        assert_eq!(price_series(&states), vec![100.0, 101.0]);
        assert_eq!(volume_series(&states), vec![5.0, 0.0]);
        assert!(states[0].traded());
        assert!(!states[1].traded());
    }

    #[test]
    fn test_json_keeps_curves() {
        let curves = OrderCurves::new(vec![99.0, 100.0], vec![5.0, 3.0], vec![1.0, 4.0]).unwrap();
        let state = MarketState::new(3, 100.0, 3.0, 0.0).with_curves(curves);
        let json = serde_json::to_string(&state).unwrap();
        let parsed: MarketState = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, state);
    }

    #[test]
    fn test_json_without_curves() {
        let json = r#"{"day":0,"price":100.0,"volume":0.0,"sentiment_value":0.0}"#;
        let state: MarketState = serde_json::from_str(json).unwrap();
        assert!(state.order_curves.is_none());
        assert!(state.manipulation_score.is_none());
    }
}
