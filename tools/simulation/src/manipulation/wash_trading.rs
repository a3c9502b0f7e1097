//! Wash-trading manipulator
//!
//! Trades with itself to inflate volume: batches of buy/sell pairs straddle
//! the last price by a hair and are released one order per call. Between
//! washes it drifts its position back toward where it started.

use crate::traders::{draws, Account, DayContext, Trader, WealthLimitedTrader};
use rand::Rng;
use serde::{Deserialize, Serialize};
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::{Order, Side};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WashTradingConfig {
    pub wash_probability: f64,
    pub volume_multiplier: f64,
    /// Full buy/sell spread as a fraction of the last price
    pub price_spread: f64,
    pub pairs_per_session: usize,
    /// Jitter pair prices and release sides in random order
    pub randomize_timing: bool,
    /// Tolerated position drift as a fraction of starting holdings
    pub max_position_drift: f64,
}

impl Default for WashTradingConfig {
    fn default() -> Self {
        Self {
            wash_probability: 0.5,
            volume_multiplier: 3.0,
            price_spread: 0.001,
            pairs_per_session: 2,
            randomize_timing: true,
            max_position_drift: 0.1,
        }
    }
}

#[derive(Debug, Clone)]
struct WashPair {
    buy: Order,
    sell: Order,
}

#[derive(Debug, Clone)]
pub struct WashTradingManipulator {
    inner: WealthLimitedTrader,
    config: WashTradingConfig,
    initial_holdings: f64,
    pending_pairs: Vec<WashPair>,
    pair_index: usize,
    session: usize,
}

impl WashTradingManipulator {
    pub fn new(trader_id: impl Into<TraderId>, seed: u64, wealth: f64, holdings: f64) -> Self {
        Self {
            inner: WealthLimitedTrader::new(trader_id, seed, wealth, holdings),
            config: WashTradingConfig::default(),
            initial_holdings: holdings,
            pending_pairs: Vec::new(),
            pair_index: 0,
            session: 0,
        }
    }

    pub fn with_config(mut self, config: WashTradingConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_active_probability(mut self, active_probability: f64) -> Self {
        self.inner = self.inner.with_active_probability(active_probability);
        self
    }

    pub fn config(&self) -> &WashTradingConfig {
        &self.config
    }

    /// Number of pair batches generated so far.
    pub fn sessions(&self) -> usize {
        self.session
    }

    pub fn maybe_generate_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        let wash_probability = self.config.wash_probability;
        if self.inner.rng_mut().gen::<f64>() < wash_probability {
            self.wash_order(ctx)
        } else {
            self.rebalancing_order(ctx)
        }
    }

    fn wash_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        if self.pair_index >= self.pending_pairs.len() {
            self.pending_pairs = self.generate_pairs(ctx)?;
            self.pair_index = 0;
            self.session += 1;
        }

        let Some(pair) = self.pending_pairs.get(self.pair_index) else {
            return Ok(None);
        };
        let take_buy = if self.config.randomize_timing {
            self.inner.rng_mut().gen::<f64>() < 0.5
        } else {
            self.pair_index % 2 == 0
        };
        let order = if take_buy { pair.buy.clone() } else { pair.sell.clone() };
        self.pair_index += 1;
        Ok(Some(order))
    }

    /// A fresh batch. Pairs where either leg clips to nothing are skipped.
    fn generate_pairs(&mut self, ctx: &DayContext<'_>) -> Result<Vec<WashPair>, OrderError> {
        let config = ctx.config;
        let tick = config.price_tick;
        let cfg = self.config.clone();
        let cap = config.max_daily_volume * cfg.volume_multiplier;
        let mut pairs = Vec::with_capacity(cfg.pairs_per_session);

        for pair_idx in 0..cfg.pairs_per_session {
            let spread = ctx.last_price * cfg.price_spread;
            let mut buy_price = (ctx.last_price - spread / 2.0).max(tick);
            let mut sell_price = ctx.last_price + spread / 2.0;

            let rng = self.inner.rng_mut();
            if cfg.randomize_timing {
                let jitter = draws::gauss(rng, 0.0, spread * 0.1);
                buy_price = (buy_price + jitter).max(tick);
                sell_price = (sell_price + jitter).max(tick);
            }

            let wash_volume = draws::draw_volume(rng, config) * cfg.volume_multiplier;
            let buy_volume = wash_volume * draws::uniform(rng, 0.95, 1.05);
            let sell_volume = wash_volume * draws::uniform(rng, 0.95, 1.05);

            let account = self.inner.account_ref();
            let buy_volume = buy_volume.min(account.max_buy_volume(buy_price, tick, cap));
            let sell_volume = sell_volume.min(account.max_sell_volume(cap));

            if buy_volume > 0.0 && sell_volume > 0.0 {
                let id = self.inner.trader_id();
                pairs.push(WashPair {
                    buy: Order::new(
                        id.sub_id(format!("wash_buy_{}_{}", self.session, pair_idx)),
                        Side::BUY,
                        buy_price,
                        buy_volume,
                    )?,
                    sell: Order::new(
                        id.sub_id(format!("wash_sell_{}_{}", self.session, pair_idx)),
                        Side::SELL,
                        sell_price,
                        sell_volume,
                    )?,
                });
            }
        }
        Ok(pairs)
    }

    /// Pull the position back toward its starting size, otherwise trade
    /// like any wealth-limited trader.
    fn rebalancing_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        let config = ctx.config;
        let account = *self.inner.account_ref();
        let drift = (account.holdings() - self.initial_holdings).abs();
        let max_drift = self.initial_holdings * self.config.max_position_drift;

        if drift > max_drift {
            let id = self.inner.trader_id().sub_id("rebalance");
            if account.holdings() > self.initial_holdings {
                let volume = drift.min(config.max_daily_volume);
                if volume > 0.0 {
                    return Order::new(id, Side::SELL, ctx.last_price, volume).map(Some);
                }
            } else {
                let volume = drift
                    .min(account.wealth() / ctx.last_price.max(config.price_tick))
                    .min(config.max_daily_volume);
                if volume > 0.0 {
                    return Order::new(id, Side::BUY, ctx.last_price, volume).map(Some);
                }
            }
        }

        self.inner.maybe_generate_order(ctx)
    }
}

impl Trader for WashTradingManipulator {
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

    fn always_wash(randomize_timing: bool) -> WashTradingConfig {
        WashTradingConfig {
            wash_probability: 1.1,
            randomize_timing,
            ..Default::default()
        }
    }

    #[test]
    fn test_pairs_straddle_last_price() {
        let config = MarketConfig::default();
        let mut m = WashTradingManipulator::new("washer", 1, 100_000.0, 100.0)
            .with_config(always_wash(false));
        let ctx = DayContext::new(0, 100.0, 0.0, &config);

        let first = m.maybe_generate_order(&ctx).unwrap().unwrap();
        let second = m.maybe_generate_order(&ctx).unwrap().unwrap();
        // pair 0 releases its buy leg, pair 1 its sell leg
        assert_eq!(first.trader_id().as_str(), "washer_wash_buy_0_0");
        assert_eq!(second.trader_id().as_str(), "washer_wash_sell_0_1");
        assert!((first.price() - 99.95).abs() < 1e-9);
        assert!((second.price() - 100.05).abs() < 1e-9);
        assert_eq!(m.sessions(), 1);

        // batch exhausted, next call starts session 2
        let third = m.maybe_generate_order(&ctx).unwrap().unwrap();
        assert_eq!(third.trader_id().as_str(), "washer_wash_buy_1_0");
        assert_eq!(m.sessions(), 2);
    }

    #[test]
    fn test_wash_volume_bounds() {
        let config = MarketConfig::default();
        let mut m = WashTradingManipulator::new("w", 2, 1e9, 1e9).with_config(always_wash(true));
        let ctx = DayContext::new(0, 100.0, 0.0, &config);
        for _ in 0..100 {
            let order = m.maybe_generate_order(&ctx).unwrap().unwrap();
            assert!(order.volume() <= config.max_daily_volume * 3.0);
            assert!(order.volume() >= 0.1 * 3.0 * 0.95);
        }
    }

    #[test]
    fn test_no_holdings_means_no_pairs() {
        let config = MarketConfig::default();
        let mut m = WashTradingManipulator::new("w", 3, 100_000.0, 0.0).with_config(always_wash(true));
        let ctx = DayContext::new(0, 100.0, 0.0, &config);
        assert!(m.maybe_generate_order(&ctx).unwrap().is_none());
        assert_eq!(m.sessions(), 1);
    }

    #[test]
    fn test_rebalance_sells_excess() {
        let config = MarketConfig::default();
        let mut m = WashTradingManipulator::new("w", 4, 10_000.0, 10.0).with_config(WashTradingConfig {
            wash_probability: -1.0,
            ..Default::default()
        });
        let buy = Order::new("w_wash_buy_0_0", Side::BUY, 100.0, 5.0).unwrap();
        m.apply_fill(&buy, 100.0, 5.0);

        let order = m
            .maybe_generate_order(&DayContext::new(0, 101.0, 0.0, &config))
            .unwrap()
            .unwrap();
        assert_eq!(order.trader_id().as_str(), "w_rebalance");
        assert_eq!(order.side(), Side::SELL);
        assert_eq!(order.price(), 101.0);
        assert_eq!(order.volume(), 5.0);
    }

    #[test]
    fn test_rebalance_buys_back_shortfall() {
        let config = MarketConfig::default();
        let mut m = WashTradingManipulator::new("w", 5, 10_000.0, 10.0).with_config(WashTradingConfig {
            wash_probability: -1.0,
            ..Default::default()
        });
        let sell = Order::new("w_wash_sell_0_0", Side::SELL, 100.0, 4.0).unwrap();
        m.apply_fill(&sell, 100.0, 4.0);

        let order = m
            .maybe_generate_order(&DayContext::new(0, 100.0, 0.0, &config))
            .unwrap()
            .unwrap();
        assert_eq!(order.side(), Side::BUY);
        assert_eq!(order.volume(), 4.0);
    }
}
