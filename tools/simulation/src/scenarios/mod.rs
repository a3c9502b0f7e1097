//! Ready-made scenarios
//!
//! Each scenario builds a market, runs it and checks the basic invariants of
//! the resulting path.

pub mod presets;
pub mod random_walk;

pub use presets::ScenarioPreset;
pub use random_walk::run_random_walk;

use crate::metrics::RunMetrics;
use crate::state::MarketState;
use serde::{Deserialize, Serialize};

/// Result of a scenario run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub name: String,
    pub days_run: usize,
    pub metrics: RunMetrics,
    pub states: Vec<MarketState>,
    /// Days are sequential, prices positive, volumes non-negative
    pub passed: bool,
    pub details: String,
}

impl ScenarioResult {
    pub fn from_run(name: impl Into<String>, states: Vec<MarketState>, metrics: RunMetrics) -> Self {
        let violation = states.iter().enumerate().find_map(|(idx, s)| {
            if s.day != idx {
                Some(format!("day {} recorded at position {}", s.day, idx))
            } else if !(s.price > 0.0 && s.price.is_finite()) {
                Some(format!("non-positive price {} on day {}", s.price, s.day))
            } else if !(s.volume >= 0.0 && s.volume.is_finite()) {
                Some(format!("invalid volume {} on day {}", s.volume, s.day))
            } else {
                None
            }
        });
        let passed = violation.is_none();
        let details = violation.unwrap_or_else(|| metrics.summary());

        Self {
            name: name.into(),
            days_run: states.len(),
            metrics,
            states,
            passed,
            details,
        }
    }

    pub fn final_price(&self) -> Option<f64> {
        self.states.last().map(|s| s.price)
    }
}
