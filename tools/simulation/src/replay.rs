//! Deterministic replay validation
//!
//! A run is reproducible when rebuilding it from the same recipe (config,
//! seed, population) yields the same `(day, price, volume)` path.

use crate::error::SimulationError;
use crate::runner::SimulationRunner;
use crate::state::MarketState;
use serde::{Deserialize, Serialize};
use types::config::MarketConfig;

/// One day of a price/volume path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub day: usize,
    pub price: f64,
    pub volume: f64,
}

/// Price/volume path of a run, for comparison.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub days: Vec<DayRecord>,
}

impl RunSnapshot {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn final_price(&self) -> Option<f64> {
        self.days.last().map(|d| d.price)
    }

    /// First day whose record differs from `other`, or the shorter length
    /// when one path is a prefix of the other.
    pub fn first_divergence(&self, other: &RunSnapshot) -> Option<usize> {
        self.days
            .iter()
            .zip(&other.days)
            .position(|(a, b)| a != b)
            .or_else(|| (self.len() != other.len()).then(|| self.len().min(other.len())))
    }
}

pub fn capture_snapshot(states: &[MarketState]) -> RunSnapshot {
    RunSnapshot {
        days: states
            .iter()
            .map(|s| DayRecord {
                day: s.day,
                price: s.price,
                volume: s.volume,
            })
            .collect(),
    }
}

/// Result of replay validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReplayValidation {
    pub matches: bool,
    pub divergence_day: Option<usize>,
    pub original: RunSnapshot,
    pub replayed: RunSnapshot,
}

/// Build two runners from `recipe`, run both for `n_days` and compare.
pub fn validate_replay<F>(recipe: F, n_days: usize) -> Result<ReplayValidation, SimulationError>
where
    F: Fn() -> SimulationRunner,
{
    let original = capture_snapshot(&recipe().run(n_days)?);
    let replayed = capture_snapshot(&recipe().run(n_days)?);
    let divergence_day = original.first_divergence(&replayed);

    Ok(ReplayValidation {
        matches: divergence_day.is_none(),
        divergence_day,
        original,
        replayed,
    })
}

/// Replay a config-built population with `seed` as its top-level seed.
pub fn validate_seeded_replay(
    config: &MarketConfig,
    seed: u64,
    n_days: usize,
) -> Result<ReplayValidation, SimulationError> {
    let config = config.clone().with_seed(seed);
    validate_replay(|| SimulationRunner::from_config(config.clone()), n_days)
}

pub fn export_snapshot(snapshot: &RunSnapshot) -> Result<String, SimulationError> {
    serde_json::to_string(snapshot).map_err(|e| SimulationError::Export(e.to_string()))
}

pub fn import_snapshot(json: &str) -> Result<RunSnapshot, SimulationError> {
    serde_json::from_str(json).map_err(|e| SimulationError::Export(e.to_string()))
}
