//! Trader policies
//!
//! Every participant implements [`Trader`]: once per day it may emit orders,
//! and later it is told about the fills those orders received. Regular
//! traders emit at most one order; manipulators may emit several.

pub mod account;
pub mod draws;
pub mod participant;
pub mod population;
pub mod random;
pub mod wealth_limited;

pub use account::Account;
pub use participant::MarketParticipant;
pub use population::{build_traders, build_traders_with, PopulationConfig};
pub use random::RandomTrader;
pub use wealth_limited::WealthLimitedTrader;

use types::config::MarketConfig;
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::Order;

/// Default probability that a regular trader participates on a given day.
pub const DEFAULT_ACTIVE_PROBABILITY: f64 = 0.8;

/// Market view handed to traders for one day.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    pub day: usize,
    pub last_price: f64,
    pub sentiment_value: f64,
    pub config: &'a MarketConfig,
}

impl<'a> DayContext<'a> {
    pub fn new(day: usize, last_price: f64, sentiment_value: f64, config: &'a MarketConfig) -> Self {
        Self {
            day,
            last_price,
            sentiment_value,
            config,
        }
    }

    /// Same day with a different reference price.
    pub fn with_last_price(&self, last_price: f64) -> Self {
        Self { last_price, ..*self }
    }
}

/// Capability set shared by all trader variants.
pub trait Trader {
    fn trader_id(&self) -> &TraderId;

    /// Orders for the day. An empty vector means the trader sits out.
    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError>;

    /// Settle a fill of `volume` at `price` against one of this trader's
    /// orders.
    fn apply_fill(&mut self, order: &Order, price: f64, volume: f64);

    /// Cash/position state, for capital-constrained variants.
    fn account(&self) -> Option<&Account> {
        None
    }
}
