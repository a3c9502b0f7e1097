//! Market configuration
//!
//! `MarketConfig` is an immutable snapshot owned by the caller and passed by
//! reference to every component of a run. Validation is opt-in: the runner
//! trusts the values it is given, callers that want early failure call
//! [`MarketConfig::validate`].

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lower bound of the uniform per-order volume draw.
pub const MIN_ORDER_VOLUME: f64 = 0.1;

/// Whether traders are constrained by cash and position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WealthMode {
    #[default]
    Unlimited,
    Limited,
}

impl FromStr for WealthMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unlimited" => Ok(WealthMode::Unlimited),
            "limited" => Ok(WealthMode::Limited),
            _ => Err(ConfigError::UnknownWealthMode(s.to_string())),
        }
    }
}

impl fmt::Display for WealthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WealthMode::Unlimited => f.write_str("unlimited"),
            WealthMode::Limited => f.write_str("limited"),
        }
    }
}

/// Shape of the exogenous sentiment drift requested for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SentimentMode {
    #[default]
    None,
    Step,
    Pulse,
}

impl FromStr for SentimentMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(SentimentMode::None),
            "step" => Ok(SentimentMode::Step),
            "pulse" => Ok(SentimentMode::Pulse),
            _ => Err(ConfigError::UnknownSentimentMode(s.to_string())),
        }
    }
}

impl fmt::Display for SentimentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SentimentMode::None => f.write_str("none"),
            SentimentMode::Step => f.write_str("step"),
            SentimentMode::Pulse => f.write_str("pulse"),
        }
    }
}

/// Configuration of a simulated single-asset market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Number of population traders
    pub n_traders: usize,
    /// Reference price on day 0
    pub initial_price: f64,
    /// Std-dev of the per-order Gaussian price draw
    pub price_volatility: f64,
    /// Upper bound of the per-order volume draw
    pub max_daily_volume: f64,
    pub wealth_mode: WealthMode,
    pub sentiment_mode: SentimentMode,
    /// Spacing of the auction price grid
    pub price_tick: f64,
    /// Top-level seed; `None` seeds from OS entropy
    pub seed: Option<u64>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            n_traders: 150,
            initial_price: 100.0,
            price_volatility: 2.5,
            max_daily_volume: 15.0,
            wealth_mode: WealthMode::Unlimited,
            sentiment_mode: SentimentMode::None,
            price_tick: 1.0,
            seed: None,
        }
    }
}

impl MarketConfig {
    /// Create a config with the four mandatory parameters; the rest default.
    pub fn new(
        n_traders: usize,
        initial_price: f64,
        price_volatility: f64,
        max_daily_volume: f64,
    ) -> Self {
        Self {
            n_traders,
            initial_price,
            price_volatility,
            max_daily_volume,
            ..Default::default()
        }
    }

    pub fn with_wealth_mode(mut self, mode: WealthMode) -> Self {
        self.wealth_mode = mode;
        self
    }

    pub fn with_sentiment_mode(mut self, mode: SentimentMode) -> Self {
        self.sentiment_mode = mode;
        self
    }

    pub fn with_price_tick(mut self, tick: f64) -> Self {
        self.price_tick = tick;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check for values that would make a run meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.price_tick.is_finite() && self.price_tick > 0.0) {
            return Err(ConfigError::InvalidTick(self.price_tick));
        }
        if !(self.initial_price.is_finite() && self.initial_price > 0.0) {
            return Err(ConfigError::InvalidInitialPrice(self.initial_price));
        }
        if !(self.price_volatility.is_finite() && self.price_volatility >= 0.0) {
            return Err(ConfigError::InvalidVolatility(self.price_volatility));
        }
        if !(self.max_daily_volume.is_finite() && self.max_daily_volume >= MIN_ORDER_VOLUME) {
            return Err(ConfigError::InvalidMaxVolume {
                value: self.max_daily_volume,
                min: MIN_ORDER_VOLUME,
            });
        }
        Ok(())
    }

    /// Parse a config from its JSON dictionary form. Missing keys default.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(json).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// JSON dictionary form handed to dashboards and exporters.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        serde_json::to_string(self).map_err(|e| ConfigError::Malformed(e.to_string()))
    }
}
