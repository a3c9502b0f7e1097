//! Pump-and-dump manipulator
//!
//! Calendar-driven three phase strategy:
//! - Accumulate: trade like a wealth-limited trader around `last * 0.98`
//! - Pump: paired buy/sell just above market to ratchet the price up
//! - Dump: unload the position slightly below market
//!
//! Dump is terminal. `dump_days` is carried for reporting only.

use crate::traders::{Account, DayContext, Trader, WealthLimitedTrader};
use serde::{Deserialize, Serialize};
use std::fmt;
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::{Order, Side};

const ACCUMULATE_DISCOUNT: f64 = 0.98;
const PUMP_MARKUP: f64 = 1.02;
const PUMP_SELL_MARKUP: f64 = 1.001;
const PUMP_VOLUME_FACTOR: f64 = 2.0;
const DUMP_DISCOUNT: f64 = 0.99;
const DUMP_VOLUME_FACTOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Accumulate,
    Pump,
    Dump,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Accumulate => f.write_str("accumulate"),
            Phase::Pump => f.write_str("pump"),
            Phase::Dump => f.write_str("dump"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManipulatorConfig {
    pub accumulation_days: usize,
    pub pump_days: usize,
    pub dump_days: usize,
}

impl Default for ManipulatorConfig {
    fn default() -> Self {
        Self {
            accumulation_days: 30,
            pump_days: 10,
            dump_days: 15,
        }
    }
}

impl ManipulatorConfig {
    pub fn new(accumulation_days: usize, pump_days: usize, dump_days: usize) -> Self {
        Self {
            accumulation_days,
            pump_days,
            dump_days,
        }
    }

    /// Nominal length of one full campaign.
    pub fn total_days(&self) -> usize {
        self.accumulation_days + self.pump_days + self.dump_days
    }
}

#[derive(Debug, Clone)]
pub struct Manipulator {
    inner: WealthLimitedTrader,
    config: ManipulatorConfig,
}

impl Manipulator {
    pub fn new(trader_id: impl Into<TraderId>, seed: u64, wealth: f64, holdings: f64) -> Self {
        Self {
            inner: WealthLimitedTrader::new(trader_id, seed, wealth, holdings),
            config: ManipulatorConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ManipulatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ManipulatorConfig {
        &self.config
    }

    pub fn wealth(&self) -> f64 {
        self.inner.wealth()
    }

    pub fn holdings(&self) -> f64 {
        self.inner.holdings()
    }

    pub fn current_phase(&self, day: usize) -> Phase {
        if day < self.config.accumulation_days {
            Phase::Accumulate
        } else if day < self.config.accumulation_days + self.config.pump_days {
            Phase::Pump
        } else {
            Phase::Dump
        }
    }

    /// Zero or more orders for `ctx.day`.
    pub fn generate_order_batch(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        let config = ctx.config;
        let tick = config.price_tick;
        let mut orders = Vec::new();

        match self.current_phase(ctx.day) {
            Phase::Accumulate => {
                let reference = ctx.last_price * ACCUMULATE_DISCOUNT;
                if let Some(order) = self.inner.draw_limited_order(reference, ctx.sentiment_value, config)? {
                    orders.push(order);
                }
            }
            Phase::Pump => {
                let price = (ctx.last_price * PUMP_MARKUP).max(tick);
                let volume = (self.wealth() / price.max(tick))
                    .min(config.max_daily_volume * PUMP_VOLUME_FACTOR)
                    .max(0.0);
                if volume > 0.0 {
                    let id = self.inner.trader_id();
                    orders.push(Order::new(id.sub_id("pump_buy"), Side::BUY, price, volume)?);
                    orders.push(Order::new(
                        id.sub_id("pump_sell"),
                        Side::SELL,
                        price * PUMP_SELL_MARKUP,
                        volume,
                    )?);
                }
            }
            Phase::Dump => {
                let price = (ctx.last_price * DUMP_DISCOUNT).max(tick);
                let volume = self.holdings().min(config.max_daily_volume * DUMP_VOLUME_FACTOR);
                if volume > 0.0 {
                    let id = self.inner.trader_id().sub_id("dump");
                    orders.push(Order::new(id, Side::SELL, price, volume)?);
                }
            }
        }
        Ok(orders)
    }
}

impl Trader for Manipulator {
    fn trader_id(&self) -> &TraderId {
        self.inner.trader_id()
    }

    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        self.generate_order_batch(ctx)
    }

    fn apply_fill(&mut self, order: &Order, price: f64, volume: f64) {
        self.inner.apply_fill(order, price, volume);
    }

    fn account(&self) -> Option<&Account> {
        Some(self.inner.account_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::config::MarketConfig;

    fn manipulator(wealth: f64, holdings: f64) -> Manipulator {
        Manipulator::new("whale", 42, wealth, holdings).with_config(ManipulatorConfig::new(5, 3, 4))
    }

    #[test]
    fn test_phase_boundaries() {
        let m = manipulator(1_000.0, 0.0);
        assert_eq!(m.current_phase(0), Phase::Accumulate);
        assert_eq!(m.current_phase(4), Phase::Accumulate);
        assert_eq!(m.current_phase(5), Phase::Pump);
        assert_eq!(m.current_phase(7), Phase::Pump);
        assert_eq!(m.current_phase(8), Phase::Dump);
        assert_eq!(m.current_phase(500), Phase::Dump);
    }

    #[test]
    fn test_default_phases() {
        let m = Manipulator::new("m", 1, 0.0, 0.0);
        assert_eq!(m.current_phase(15), Phase::Accumulate);
        assert_eq!(m.current_phase(35), Phase::Pump);
        assert_eq!(m.current_phase(45), Phase::Dump);
        assert_eq!(m.config().total_days(), 55);
    }

    #[test]
    fn test_pump_emits_matched_pair() {
        let config = MarketConfig::default();
        let mut m = manipulator(100_000.0, 0.0);
        let ctx = DayContext::new(5, 100.0, 0.0, &config);
        let orders = m.generate_order_batch(&ctx).unwrap();

        assert_eq!(orders.len(), 2);
        let (buy, sell) = (&orders[0], &orders[1]);
        assert_eq!(buy.trader_id().as_str(), "whale_pump_buy");
        assert_eq!(sell.trader_id().as_str(), "whale_pump_sell");
        assert_eq!(buy.side(), Side::BUY);
        assert_eq!(sell.side(), Side::SELL);
        assert!((buy.price() - 102.0).abs() < 1e-9);
        assert!((sell.price() - 102.0 * 1.001).abs() < 1e-9);
        // capped at 2x max_daily_volume
        assert_eq!(buy.volume(), 30.0);
        assert_eq!(sell.volume(), buy.volume());
    }

    #[test]
    fn test_pump_sized_by_wealth() {
        let config = MarketConfig::default();
        let mut m = manipulator(510.0, 0.0);
        let orders = m.generate_order_batch(&DayContext::new(6, 100.0, 0.0, &config)).unwrap();
        assert!((orders[0].volume() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_pump_without_cash_is_silent() {
        let config = MarketConfig::default();
        let mut m = manipulator(0.0, 10.0);
        assert!(m.generate_order_batch(&DayContext::new(6, 100.0, 0.0, &config)).unwrap().is_empty());
    }

    #[test]
    fn test_dump_sells_position() {
        let config = MarketConfig::default();
        let mut m = manipulator(0.0, 100.0);
        let orders = m.generate_order_batch(&DayContext::new(9, 120.0, 0.0, &config)).unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].trader_id().as_str(), "whale_dump");
        assert_eq!(orders[0].side(), Side::SELL);
        assert!((orders[0].price() - 118.8).abs() < 1e-9);
        assert_eq!(orders[0].volume(), 45.0);
    }

    #[test]
    fn test_dump_with_nothing_to_sell() {
        let config = MarketConfig::default();
        let mut m = manipulator(1_000.0, 0.0);
        assert!(m.generate_order_batch(&DayContext::new(9, 100.0, 0.0, &config)).unwrap().is_empty());
    }

    #[test]
    fn test_accumulate_prices_below_market() {
        let config = MarketConfig::default().with_price_tick(0.5);
        let mut m = manipulator(100_000.0, 0.0);
        let mut prices = Vec::new();
        for _ in 0..200 {
            for order in m.generate_order_batch(&DayContext::new(0, 100.0, 0.0, &config)).unwrap() {
                assert_eq!(order.trader_id().as_str(), "whale");
                prices.push(order.price());
            }
        }
        let mean = prices.iter().sum::<f64>() / prices.len() as f64;
        assert!(mean < 99.5, "mean accumulate price {mean}");
    }

    #[test]
    fn test_fills_update_account() {
        let mut m = manipulator(1_000.0, 0.0);
        let order = Order::new("whale_pump_buy", Side::BUY, 10.0, 5.0).unwrap();
        m.apply_fill(&order, 10.0, 5.0);
        assert_eq!(m.wealth(), 950.0);
        assert_eq!(m.holdings(), 5.0);
    }
}
