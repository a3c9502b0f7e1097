//! Layering manipulator
//!
//! Stacks several decaying orders on one side of the market, keeps them
//! fresh for a while, pulls them, then trades the opposite side. The phase
//! advances every `phase_duration` calls:
//!
//! Build → Maintain → Remove → Profit → Build (next cycle)

use crate::manipulation::TargetSide;
use crate::traders::{draws, Account, DayContext, Trader, WealthLimitedTrader};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::{Order, Side};

const PROFIT_EDGE: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayeringPhase {
    Build,
    Maintain,
    Remove,
    Profit,
}

impl LayeringPhase {
    fn next(self) -> Self {
        match self {
            LayeringPhase::Build => LayeringPhase::Maintain,
            LayeringPhase::Maintain => LayeringPhase::Remove,
            LayeringPhase::Remove => LayeringPhase::Profit,
            LayeringPhase::Profit => LayeringPhase::Build,
        }
    }
}

impl fmt::Display for LayeringPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LayeringPhase::Build => "build",
            LayeringPhase::Maintain => "maintain",
            LayeringPhase::Remove => "remove",
            LayeringPhase::Profit => "profit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeringConfig {
    pub n_layers: usize,
    /// Price gap between consecutive layers, as a fraction of last price
    pub layer_spacing: f64,
    /// Volume ratio between a layer and the one before it
    pub volume_decay: f64,
    pub layer_probability: f64,
    pub removal_rate: f64,
    pub phase_duration: usize,
    pub target_side: TargetSide,
    pub base_volume_multiplier: f64,
}

impl Default for LayeringConfig {
    fn default() -> Self {
        Self {
            n_layers: 5,
            layer_spacing: 0.005,
            volume_decay: 0.8,
            layer_probability: 0.6,
            removal_rate: 0.3,
            phase_duration: 10,
            target_side: TargetSide::Random,
            base_volume_multiplier: 4.0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayeringManipulator {
    inner: WealthLimitedTrader,
    config: LayeringConfig,
    phase: LayeringPhase,
    phase_counter: usize,
    layers: Vec<Order>,
    current_side: Option<Side>,
    cycle: usize,
}

impl LayeringManipulator {
    pub fn new(trader_id: impl Into<TraderId>, seed: u64, wealth: f64, holdings: f64) -> Self {
        Self {
            inner: WealthLimitedTrader::new(trader_id, seed, wealth, holdings),
            config: LayeringConfig::default(),
            phase: LayeringPhase::Build,
            phase_counter: 0,
            layers: Vec::new(),
            current_side: None,
            cycle: 0,
        }
    }

    pub fn with_config(mut self, config: LayeringConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &LayeringConfig {
        &self.config
    }

    pub fn phase(&self) -> LayeringPhase {
        self.phase
    }

    pub fn cycle_count(&self) -> usize {
        self.cycle
    }

    pub fn active_layers(&self) -> &[Order] {
        &self.layers
    }

    pub fn maybe_generate_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        self.advance_phase();
        match self.phase {
            LayeringPhase::Build => self.build_layer(ctx),
            LayeringPhase::Maintain => self.maintain_layers(ctx),
            LayeringPhase::Remove => {
                self.remove_layer();
                Ok(None)
            }
            LayeringPhase::Profit => self.profit_order(ctx),
        }
    }

    fn advance_phase(&mut self) {
        self.phase_counter += 1;
        if self.phase_counter < self.config.phase_duration {
            return;
        }
        self.phase_counter = 0;
        self.phase = self.phase.next();
        match self.phase {
            LayeringPhase::Profit => self.layers.clear(),
            LayeringPhase::Build => {
                self.cycle += 1;
                if self.config.target_side == TargetSide::Random {
                    self.current_side = None;
                }
            }
            _ => {}
        }
    }

    /// Side of the current cycle's layers, resolved on first use.
    fn layer_side(&mut self) -> Side {
        if let Some(side) = self.current_side {
            return side;
        }
        let side = self.config.target_side.resolve(self.inner.rng_mut());
        self.current_side = Some(side);
        side
    }

    fn build_layer(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        if self.inner.rng_mut().gen::<f64>() > self.config.layer_probability {
            return Ok(None);
        }
        if self.layers.len() >= self.config.n_layers {
            return Ok(None);
        }

        let config = ctx.config;
        let side = self.layer_side();
        let index = self.layers.len();
        let offset = (index + 1) as f64 * self.config.layer_spacing;
        let price = match side {
            Side::BUY => (ctx.last_price * (1.0 - offset)).max(config.price_tick),
            Side::SELL => ctx.last_price * (1.0 + offset),
        };

        let multiplier = self.config.base_volume_multiplier;
        let volume = draws::draw_volume(self.inner.rng_mut(), config)
            * multiplier
            * self.config.volume_decay.powi(index as i32);
        let id = self.inner.trader_id().sub_id(format!("layer_{}_{}", self.cycle, index));
        let cap = config.max_daily_volume * multiplier;

        let order = self.inner.clipped_order(id, side, price, volume, config.price_tick, cap)?;
        if let Some(order) = &order {
            self.layers.push(order.clone());
        }
        Ok(order)
    }

    /// Occasionally replace a random layer with a slightly perturbed copy.
    fn maintain_layers(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        if self.layers.is_empty() {
            return Ok(None);
        }
        let refresh_probability = self.config.layer_probability * 0.5;
        let rng = self.inner.rng_mut();
        if rng.gen::<f64>() >= refresh_probability {
            return Ok(None);
        }

        let idx = rng.gen_range(0..self.layers.len());
        let price_factor = draws::gauss(rng, 1.0, 0.001);
        let volume_factor = draws::gauss(rng, 1.0, 0.05);

        let old = &self.layers[idx];
        let refreshed = Order::new(
            old.trader_id().sub_id("refresh"),
            old.side(),
            (old.price() * price_factor).max(ctx.config.price_tick),
            (old.volume() * volume_factor).max(0.1),
        )?;
        self.layers[idx] = refreshed.clone();
        Ok(Some(refreshed))
    }

    fn remove_layer(&mut self) {
        if self.layers.is_empty() {
            return;
        }
        if self.inner.rng_mut().gen::<f64>() < self.config.removal_rate {
            self.layers.pop();
        }
    }

    fn profit_order(&mut self, ctx: &DayContext<'_>) -> Result<Option<Order>, OrderError> {
        let Some(layer_side) = self.current_side else {
            return Ok(None);
        };
        let config = ctx.config;
        let side = layer_side.opposite();
        let price = match side {
            Side::SELL => ctx.last_price * (1.0 + PROFIT_EDGE),
            Side::BUY => (ctx.last_price * (1.0 - PROFIT_EDGE)).max(config.price_tick),
        };
        let volume = draws::draw_volume(self.inner.rng_mut(), config);
        let id = self.inner.trader_id().sub_id(format!("profit_{}", self.cycle));
        self.inner
            .clipped_order(id, side, price, volume, config.price_tick, config.max_daily_volume)
    }
}

impl Trader for LayeringManipulator {
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
