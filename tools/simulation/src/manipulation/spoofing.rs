//! Spoofing manipulator
//!
//! Alternates between oversized orders placed away from the market to fake
//! pressure on one side, and small genuine orders that lean the other way.
//! Spoofs are remembered for `cancel_threshold` spoof-days and then dropped,
//! standing in for cancellation.

use crate::manipulation::TargetSide;
use crate::traders::{draws, Account, DayContext, Trader, WealthLimitedTrader};
use rand::Rng;
use serde::{Deserialize, Serialize};
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::{Order, Side};

/// Price improvement applied to genuine orders opposite the latest spoof.
const LEAN: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpoofingConfig {
    /// Spoof size relative to a normal draw
    pub spoof_multiplier: f64,
    pub spoof_probability: f64,
    /// Distance of the spoof from the last price, as a fraction
    pub price_offset: f64,
    pub cancel_threshold: usize,
    pub target_side: TargetSide,
}

impl Default for SpoofingConfig {
    fn default() -> Self {
        Self {
            spoof_multiplier: 5.0,
            spoof_probability: 0.3,
            price_offset: 0.02,
            cancel_threshold: 1,
            target_side: TargetSide::Random,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpoofingManipulator {
    inner: WealthLimitedTrader,
    config: SpoofingConfig,
    /// Live spoofs tagged with the spoof-day they were placed on
    spoof_orders: Vec<(usize, Order)>,
    spoof_day: usize,
}

impl SpoofingManipulator {
    pub fn new(trader_id: impl Into<TraderId>, seed: u64, wealth: f64, holdings: f64) -> Self {
        Self {
            inner: WealthLimitedTrader::new(trader_id, seed, wealth, holdings),
            config: SpoofingConfig::default(),
            spoof_orders: Vec::new(),
            spoof_day: 0,
        }
    }

    pub fn with_config(mut self, config: SpoofingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_active_probability(mut self, active_probability: f64) -> Self {
        self.inner = self.inner.with_active_probability(active_probability);
        self
    }

    pub fn config(&self) -> &SpoofingConfig {
        &self.config
    }

    pub fn live_spoofs(&self) -> impl Iterator<Item = &Order> {
        self.spoof_orders.iter().map(|(_, order)| order)
    }

    pub fn maybe_generate_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        self.cancel_stale_spoofs();
        let spoof_probability = self.config.spoof_probability;
        if self.inner.rng_mut().gen::<f64>() < spoof_probability {
            self.spoof_order(ctx)
        } else {
            self.genuine_order(ctx)
        }
    }

    fn cancel_stale_spoofs(&mut self) {
        let cutoff = self.spoof_day as i64 - self.config.cancel_threshold as i64;
        self.spoof_orders.retain(|(day, _)| *day as i64 >= cutoff);
    }

    fn spoof_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        let config = ctx.config;
        let cfg = &self.config;
        let side = cfg.target_side.resolve(self.inner.rng_mut());
        let price = match side {
            Side::BUY => (ctx.last_price * (1.0 - cfg.price_offset)).max(config.price_tick),
            Side::SELL => ctx.last_price * (1.0 + cfg.price_offset),
        };
        let volume = draws::draw_volume(self.inner.rng_mut(), config) * cfg.spoof_multiplier;

        let id = self.inner.trader_id().sub_id(format!("spoof_{}", self.spoof_orders.len()));
        let cap = config.max_daily_volume * cfg.spoof_multiplier;
        let Some(order) = self.inner.clipped_order(id, side, price, volume, config.price_tick, cap)? else {
            return Ok(None);
        };

        self.spoof_orders.push((self.spoof_day, order.clone()));
        self.spoof_day += 1;
        Ok(Some(order))
    }

    fn genuine_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        let config = ctx.config;
        let active_probability = self.inner.active_probability();
        let rng = self.inner.rng_mut();
        if !draws::is_active(rng, active_probability) {
            return Ok(None);
        }
        let side = draws::draw_side(rng);
        let mut price = draws::draw_price(rng, ctx.last_price, ctx.sentiment_value, config);
        let volume = draws::draw_volume(rng, config);

        let Some(volume) = self
            .inner
            .account_ref()
            .clip_volume(side, price, volume, config.price_tick, config.max_daily_volume)
        else {
            return Ok(None);
        };

        if let Some((_, latest)) = self.spoof_orders.last() {
            match (latest.side(), side) {
                (Side::BUY, Side::SELL) => price = (price * (1.0 + LEAN)).max(config.price_tick),
                (Side::SELL, Side::BUY) => price = (price * (1.0 - LEAN)).max(config.price_tick),
                _ => {}
            }
        }
        Order::new(self.inner.trader_id().clone(), side, price, volume).map(Some)
    }
}

impl Trader for SpoofingManipulator {
    fn trader_id(&self) -> &TraderId {
        self.inner.trader_id()
    }

    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        Ok(self.maybe_generate_order(ctx)?.into_iter().collect())
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

    fn always_spoof(side: TargetSide) -> SpoofingConfig {
        SpoofingConfig {
            spoof_probability: 1.1,
            target_side: side,
            ..Default::default()
        }
    }

    #[test]
    fn test_buy_spoof_below_market() {
        let config = MarketConfig::default();
        let mut m = SpoofingManipulator::new("spoofer", 1, 1_000_000.0, 0.0)
            .with_config(always_spoof(TargetSide::Buy));
        let order = m
            .maybe_generate_order(&DayContext::new(0, 100.0, 0.0, &config))
            .unwrap()
            .unwrap();
        assert_eq!(order.side(), Side::BUY);
        assert!((order.price() - 98.0).abs() < 1e-9);
        assert_eq!(order.trader_id().as_str(), "spoofer_spoof_0");
        assert!(order.volume() <= config.max_daily_volume * 5.0);
        assert!(order.volume() >= 0.1 * 5.0);
    }

    #[test]
    fn test_sell_spoof_needs_holdings() {
        let config = MarketConfig::default();
        let mut m = SpoofingManipulator::new("s", 2, 1_000_000.0, 0.0)
            .with_config(always_spoof(TargetSide::Sell));
        for _ in 0..20 {
            assert!(m
                .maybe_generate_order(&DayContext::new(0, 100.0, 0.0, &config))
                .unwrap()
                .is_none());
        }
        assert_eq!(m.live_spoofs().count(), 0);
    }

    #[test]
    fn test_spoofs_age_out() {
        let config = MarketConfig::default();
        let mut m = SpoofingManipulator::new("s", 3, 1_000_000.0, 0.0)
            .with_config(always_spoof(TargetSide::Buy));
        let ctx = DayContext::new(0, 100.0, 0.0, &config);
        for _ in 0..10 {
            m.maybe_generate_order(&ctx).unwrap();
        }
        // threshold 1 keeps only the previous spoof plus the new one
        assert!(m.live_spoofs().count() <= 2);
    }

    #[test]
    fn test_genuine_orders_use_plain_id() {
        let config = MarketConfig::default();
        let mut m = SpoofingManipulator::new("s", 4, 1_000_000.0, 1_000.0).with_config(SpoofingConfig {
            spoof_probability: -1.0,
            ..Default::default()
        });
        let mut seen = 0;
        for _ in 0..100 {
            if let Some(order) = m.maybe_generate_order(&DayContext::new(0, 100.0, 0.0, &config)).unwrap() {
                assert_eq!(order.trader_id().as_str(), "s");
                assert!(order.volume() <= config.max_daily_volume);
                seen += 1;
            }
        }
        assert!(seen > 0);
    }

    #[test]
    fn test_deterministic() {
        let config = MarketConfig::default();
        let run = || {
            let mut m = SpoofingManipulator::new("s", 77, 50_000.0, 50.0);
            (0..50)
                .map(|d| m.maybe_generate_order(&DayContext::new(d, 100.0, 0.0, &config)).unwrap())
                .collect::<Vec<_>>()
        };
        assert_eq!(run(), run());
    }
}
