//! Cash and position bookkeeping for capital-constrained traders

use serde::{Deserialize, Serialize};
use types::order::{Order, Side};

pub const DEFAULT_WEALTH: f64 = 10_000.0;

/// Cash balance and position size.
///
/// Fields are private: the only way to change them after construction is
/// [`Account::apply_fill`], which moves exactly `price * volume` of cash and
/// `volume` of position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Account {
    wealth: f64,
    holdings: f64,
}

impl Default for Account {
    fn default() -> Self {
        Self::new(DEFAULT_WEALTH, 0.0)
    }
}

impl Account {
    pub fn new(wealth: f64, holdings: f64) -> Self {
        Self { wealth, holdings }
    }

    pub fn wealth(&self) -> f64 {
        self.wealth
    }

    pub fn holdings(&self) -> f64 {
        self.holdings
    }

    /// Cash plus position marked at `price`.
    pub fn equity(&self, price: f64) -> f64 {
        self.wealth + self.holdings * price
    }

    /// Largest buy volume affordable at `price`, capped at `cap`.
    pub fn max_buy_volume(&self, price: f64, price_tick: f64, cap: f64) -> f64 {
        (self.wealth / price.max(price_tick)).min(cap)
    }

    /// Largest sell volume covered by the position, capped at `cap`.
    pub fn max_sell_volume(&self, cap: f64) -> f64 {
        self.holdings.min(cap)
    }

    /// Clip `volume` to what the account can support on `side`.
    ///
    /// Returns `None` when the clipped volume is not positive.
    pub fn clip_volume(
        &self,
        side: Side,
        price: f64,
        volume: f64,
        price_tick: f64,
        cap: f64,
    ) -> Option<f64> {
        let max_volume = match side {
            Side::BUY => self.max_buy_volume(price, price_tick, cap),
            Side::SELL => self.max_sell_volume(cap),
        };
        if !(max_volume > 0.0) {
            return None;
        }
        let clipped = volume.min(max_volume);
        (clipped > 0.0).then_some(clipped)
    }

    /// Settle a fill. No-op when `volume <= 0`.
    pub fn apply_fill(&mut self, order: &Order, price: f64, volume: f64) {
        if volume <= 0.0 {
            return;
        }
        let notional = price * volume;
        match order.side() {
            Side::BUY => {
                self.wealth -= notional;
                self.holdings += volume;
            }
            Side::SELL => {
                self.wealth += notional;
                self.holdings -= volume;
            }
        }
    }
}
