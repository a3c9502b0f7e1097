//! Unconstrained random trader
//!
//! Participates with a fixed probability, picks a side by coin flip, and
//! prices around the sentiment-adjusted last clearing price.

use crate::traders::draws;
use crate::traders::{DayContext, Trader, DEFAULT_ACTIVE_PROBABILITY};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use types::config::MarketConfig;
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::Order;

/// Trader with no capital constraints and its own seeded generator.
#[derive(Debug, Clone)]
pub struct RandomTrader {
    trader_id: TraderId,
    active_probability: f64,
    rng: ChaCha8Rng,
}

impl RandomTrader {
    /// Create a trader with the default activation probability.
    pub fn new(trader_id: impl Into<TraderId>, seed: u64) -> Self {
        Self::with_rng(trader_id, ChaCha8Rng::seed_from_u64(seed))
    }

    pub fn with_rng(trader_id: impl Into<TraderId>, rng: ChaCha8Rng) -> Self {
        Self {
            trader_id: trader_id.into(),
            active_probability: DEFAULT_ACTIVE_PROBABILITY,
            rng,
        }
    }

    pub fn with_active_probability(mut self, active_probability: f64) -> Self {
        self.active_probability = active_probability;
        self
    }

    pub fn active_probability(&self) -> f64 {
        self.active_probability
    }

    pub(crate) fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }

    /// One order or nothing.
    ///
    /// Draw order: activation, side, price, volume. The activation draw is
    /// consumed even when the trader stays out.
    pub fn maybe_generate_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        self.draw_order(ctx.last_price, ctx.sentiment_value, ctx.config)
    }

    pub(crate) fn draw_order(
        &mut self,
        last_price: f64,
        sentiment_value: f64,
        config: &MarketConfig,
    ) -> Result<Option<Order>, OrderError> {
        if !draws::is_active(&mut self.rng, self.active_probability) {
            return Ok(None);
        }
        let side = draws::draw_side(&mut self.rng);
        let price = draws::draw_price(&mut self.rng, last_price, sentiment_value, config);
        let volume = draws::draw_volume(&mut self.rng, config);
        Order::new(self.trader_id.clone(), side, price, volume).map(Some)
    }
}

impl Trader for RandomTrader {
    fn trader_id(&self) -> &TraderId {
        &self.trader_id
    }

    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        Ok(self.maybe_generate_order(ctx)?.into_iter().collect())
    }

    /// Unconstrained traders keep no state to update.
    fn apply_fill(&mut self, _order: &Order, _price: f64, _volume: f64) {}
}
