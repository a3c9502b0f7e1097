//! Identifier types for simulation entities
//!
//! Trader identifiers are human-readable strings so that fixtures and exports
//! stay stable across runs. Run identifiers use UUID v7 so that exported runs
//! sort chronologically.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Minimum zero-padding width of generated trader identifiers.
pub const TRADER_ID_WIDTH: usize = 4;

/// Identifier of the agent that submitted an order.
///
/// Population traders are numbered sequentially (`trader_0000`, ...).
/// Manipulators tag the orders they emit with synthetic sub-identifiers
/// derived from their own id (`spoofer_pump_buy`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraderId(String);

impl TraderId {
    /// Create a trader id from any string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Sequential population id, zero-padded to at least four digits.
    pub fn sequential(index: usize) -> Self {
        Self(format!("trader_{:0width$}", index, width = TRADER_ID_WIDTH))
    }

    /// Derive a synthetic sub-id, e.g. `m1` + `pump_buy` -> `m1_pump_buy`.
    pub fn sub_id(&self, suffix: impl fmt::Display) -> Self {
        Self(format!("{}_{}", self.0, suffix))
    }

    /// Get the id string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TraderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TraderId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for TraderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for a simulation run export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(Uuid);

impl RunId {
    /// Create a new RunId with current timestamp
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RunId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
