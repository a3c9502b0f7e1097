//! Run metrics
//!
//! Counters accumulated by the runner while it steps through the days.

use crate::state::MarketState;
use serde::{Deserialize, Serialize};
use types::order::Order;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunMetrics {
    pub days: u64,
    pub buy_orders: u64,
    pub sell_orders: u64,
    /// Fills settled on either side
    pub fills: u64,
    /// Cleared volume summed over days
    pub total_volume: f64,
    /// Buy-side notional settled at clearing prices
    pub total_notional: f64,
    /// Days with no orders at all
    pub empty_days: u64,
    /// Days with orders but nothing cleared
    pub no_trade_days: u64,
    pub max_daily_volume: f64,
    pub final_price: Option<f64>,
}

impl RunMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_orders(&mut self, buys: &[Order], sells: &[Order]) {
        self.buy_orders += buys.len() as u64;
        self.sell_orders += sells.len() as u64;
    }

    pub fn record_fill(&mut self, order: &Order, price: f64, volume: f64) {
        self.fills += 1;
        if order.is_buy() {
            self.total_notional += price * volume;
        }
    }

    pub fn record_empty_day(&mut self, state: &MarketState) {
        self.empty_days += 1;
        self.record_day(state);
    }

    /// Record a day that went through clearing.
    pub fn record_day(&mut self, state: &MarketState) {
        self.days += 1;
        self.total_volume += state.volume;
        if state.volume > self.max_daily_volume {
            self.max_daily_volume = state.volume;
        }
        self.final_price = Some(state.price);
    }

    pub fn record_no_trade(&mut self) {
        self.no_trade_days += 1;
    }

    pub fn total_orders(&self) -> u64 {
        self.buy_orders + self.sell_orders
    }

    /// Mean cleared volume per simulated day.
    pub fn average_volume(&self) -> f64 {
        if self.days == 0 {
            return 0.0;
        }
        self.total_volume / self.days as f64
    }

    /// Volume-weighted average clearing price over the run.
    pub fn vwap(&self) -> Option<f64> {
        (self.total_volume > 0.0).then(|| self.total_notional / self.total_volume)
    }

    pub fn summary(&self) -> String {
        format!(
            "Days: {} | Orders: {} | Fills: {} | Volume: {:.2} | Empty days: {} | Final price: {}",
            self.days,
            self.total_orders(),
            self.fills,
            self.total_volume,
            self.empty_days,
            self.final_price.map_or_else(|| "n/a".to_string(), |p| format!("{p:.2}")),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::order::Side;

    #[test]
    fn test_empty_metrics() {
        let m = RunMetrics::new();
        assert_eq!(m.total_orders(), 0);
        assert_eq!(m.average_volume(), 0.0);
        assert!(m.vwap().is_none());
        assert!(m.summary().contains("n/a"));
    }

    #[test]
    fn test_record_day_flow() {
        let mut m = RunMetrics::new();
        let buy = Order::new("b", Side::BUY, 101.0, 4.0).unwrap();
        let sell = Order::new("s", Side::SELL, 99.0, 4.0).unwrap();
        m.record_orders(std::slice::from_ref(&buy), std::slice::from_ref(&sell));
        m.record_fill(&buy, 100.0, 4.0);
        m.record_fill(&sell, 100.0, 4.0);
        m.record_day(&MarketState::new(0, 100.0, 4.0, 0.0));
        m.record_empty_day(&MarketState::new(1, 100.0, 0.0, 0.0));

        assert_eq!(m.total_orders(), 2);
        assert_eq!(m.fills, 2);
        assert_eq!(m.total_notional, 400.0);
        assert_eq!(m.vwap(), Some(100.0));
        assert_eq!(m.days, 2);
        assert_eq!(m.empty_days, 1);
        assert_eq!(m.average_volume(), 2.0);
        assert_eq!(m.max_daily_volume, 4.0);
        assert_eq!(m.final_price, Some(100.0));
    }
}
