//! Capital-constrained random trader
//!
//! Generates orders like [`RandomTrader`] and then clips their volume to
//! what its cash and position allow.

use crate::traders::{Account, DayContext, RandomTrader, Trader};
use rand_chacha::ChaCha8Rng;
use types::config::MarketConfig;
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::{Order, Side};

#[derive(Debug, Clone)]
pub struct WealthLimitedTrader {
    base: RandomTrader,
    account: Account,
}

impl WealthLimitedTrader {
    pub fn new(trader_id: impl Into<TraderId>, seed: u64, wealth: f64, holdings: f64) -> Self {
        Self {
            base: RandomTrader::new(trader_id, seed),
            account: Account::new(wealth, holdings),
        }
    }

    pub fn with_rng(trader_id: impl Into<TraderId>, rng: ChaCha8Rng, wealth: f64, holdings: f64) -> Self {
        Self {
            base: RandomTrader::with_rng(trader_id, rng),
            account: Account::new(wealth, holdings),
        }
    }

    pub fn with_active_probability(mut self, active_probability: f64) -> Self {
        self.base = self.base.with_active_probability(active_probability);
        self
    }

    pub fn wealth(&self) -> f64 {
        self.account.wealth()
    }

    pub fn holdings(&self) -> f64 {
        self.account.holdings()
    }

    pub fn active_probability(&self) -> f64 {
        self.base.active_probability()
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        self.base.rng_mut()
    }

    pub(crate) fn account_ref(&self) -> &Account {
        &self.account
    }

    pub fn maybe_generate_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        self.draw_limited_order(ctx.last_price, ctx.sentiment_value, ctx.config)
    }

    /// Draw an unconstrained order, then clip it. Buys are capped by
    /// `wealth / price`, sells by holdings, both by `max_daily_volume`.
    pub(crate) fn draw_limited_order(
        &mut self,
        last_price: f64,
        sentiment_value: f64,
        config: &MarketConfig,
    ) -> Result<Option<Order>, OrderError> {
        let Some(order) = self.base.draw_order(last_price, sentiment_value, config)? else {
            return Ok(None);
        };
        self.clip(&order, config.price_tick, config.max_daily_volume)
    }

    /// Build a new order with the volume clipped, or `None` if nothing is
    /// affordable.
    pub(crate) fn clip(&self, order: &Order, price_tick: f64, cap: f64) -> Result<Option<Order>, OrderError> {
        match self
            .account
            .clip_volume(order.side(), order.price(), order.volume(), price_tick, cap)
        {
            Some(volume) => order.with_volume(volume).map(Some),
            None => Ok(None),
        }
    }

    /// Order under a synthetic sub-id, clipped against the account with
    /// `cap` as the hard volume ceiling.
    pub(crate) fn clipped_order(
        &self,
        trader_id: TraderId,
        side: Side,
        price: f64,
        volume: f64,
        price_tick: f64,
        cap: f64,
    ) -> Result<Option<Order>, OrderError> {
        match self.account.clip_volume(side, price, volume, price_tick, cap) {
            Some(volume) => Order::new(trader_id, side, price, volume).map(Some),
            None => Ok(None),
        }
    }
}

impl Trader for WealthLimitedTrader {
    fn trader_id(&self) -> &TraderId {
        self.base.trader_id()
    }

    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        Ok(self.maybe_generate_order(ctx)?.into_iter().collect())
    }

    fn apply_fill(&mut self, order: &Order, price: f64, volume: f64) {
        self.account.apply_fill(order, price, volume);
    }

    fn account(&self) -> Option<&Account> {
        Some(&self.account)
    }
}
