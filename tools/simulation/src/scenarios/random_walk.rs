//! Baseline random walk
//!
//! Unconstrained random traders and no sentiment: the clearing price should
//! wander without drift.

use crate::error::SimulationError;
use crate::runner::SimulationRunner;
use crate::scenarios::ScenarioResult;
use types::config::{MarketConfig, WealthMode};

pub fn random_walk_config(seed: Option<u64>) -> MarketConfig {
    MarketConfig {
        n_traders: 150,
        initial_price: 100.0,
        price_volatility: 2.5,
        max_daily_volume: 15.0,
        wealth_mode: WealthMode::Unlimited,
        price_tick: 0.5,
        seed,
        ..Default::default()
    }
}

/// Run the baseline for `days` days. Without a seed the population is
/// seeded from OS entropy.
pub fn run_random_walk(days: usize, seed: Option<u64>) -> Result<ScenarioResult, SimulationError> {
    let mut runner = SimulationRunner::from_config(random_walk_config(seed));
    let (states, metrics) = runner.run_with_metrics(days)?;
    Ok(ScenarioResult::from_run("random_walk", states, metrics))
}
