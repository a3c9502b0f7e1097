//! Limit order value type
//!
//! An `Order` is validated at construction and immutable afterwards, so no
//! order with a non-positive price or volume can exist anywhere in the lab.

use crate::errors::OrderError;
use crate::ids::TraderId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Order side (buyer or seller)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Buy order (bid)
    BUY,
    /// Sell order (ask)
    SELL,
}

impl Side {
    /// Get the opposite side
    pub fn opposite(&self) -> Self {
        match self {
            Side::BUY => Side::SELL,
            Side::SELL => Side::BUY,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Side::BUY => "buy",
            Side::SELL => "sell",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "buy" => Ok(Side::BUY),
            "sell" => Ok(Side::SELL),
            _ => Err(OrderError::InvalidSide(s.to_string())),
        }
    }
}

/// A single limit order for one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder")]
pub struct Order {
    trader_id: TraderId,
    side: Side,
    price: f64,
    volume: f64,
}

/// Unchecked wire form; deserialization funnels through `Order::new`.
#[derive(Deserialize)]
struct RawOrder {
    trader_id: TraderId,
    side: Side,
    price: f64,
    volume: f64,
}

impl TryFrom<RawOrder> for Order {
    type Error = OrderError;

    fn try_from(raw: RawOrder) -> Result<Self, Self::Error> {
        Order::new(raw.trader_id, raw.side, raw.price, raw.volume)
    }
}

impl Order {
    /// Create a validated order.
    ///
    /// Fails if price or volume is not a positive finite number.
    pub fn new(
        trader_id: impl Into<TraderId>,
        side: Side,
        price: f64,
        volume: f64,
    ) -> Result<Self, OrderError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(OrderError::InvalidPrice(price));
        }
        if !(volume.is_finite() && volume > 0.0) {
            return Err(OrderError::InvalidVolume(volume));
        }
        Ok(Self {
            trader_id: trader_id.into(),
            side,
            price,
            volume,
        })
    }

    /// Create an order from a textual side ("buy" | "sell").
    pub fn parse(
        trader_id: impl Into<TraderId>,
        side: &str,
        price: f64,
        volume: f64,
    ) -> Result<Self, OrderError> {
        let side = side.parse::<Side>()?;
        Self::new(trader_id, side, price, volume)
    }

    /// Copy of this order with a different volume (used when clipping to
    /// what a trader can afford).
    pub fn with_volume(&self, volume: f64) -> Result<Self, OrderError> {
        Self::new(self.trader_id.clone(), self.side, self.price, volume)
    }

    pub fn trader_id(&self) -> &TraderId {
        &self.trader_id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn volume(&self) -> f64 {
        self.volume
    }

    pub fn is_buy(&self) -> bool {
        self.side == Side::BUY
    }

    /// price × volume
    pub fn notional(&self) -> f64 {
        self.price * self.volume
    }
}
