//! Trader population factory
//!
//! One parent generator seeds every trader: each child seed is drawn from the
//! parent in index order, so a whole population is reproducible from the
//! top-level seed while traders stay statistically independent.

use crate::traders::draws;
use crate::traders::{MarketParticipant, RandomTrader, WealthLimitedTrader, DEFAULT_ACTIVE_PROBABILITY};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;
use types::config::{MarketConfig, WealthMode};
use types::ids::TraderId;

/// Upper bound (exclusive) of child seeds drawn from the parent generator.
pub const CHILD_SEED_RANGE: u64 = 1_000_000_000;

/// Population knobs not carried by [`MarketConfig`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub active_probability: f64,
    /// Starting cash range for limited traders
    pub wealth_range: (f64, f64),
    /// Starting position range for limited traders
    pub holdings_range: (f64, f64),
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            active_probability: DEFAULT_ACTIVE_PROBABILITY,
            wealth_range: (5_000.0, 15_000.0),
            holdings_range: (0.0, 20.0),
        }
    }
}

/// Build `config.n_traders` traders following `config.wealth_mode`.
pub fn build_traders<R: Rng>(config: &MarketConfig, rng: &mut R) -> Vec<MarketParticipant> {
    build_traders_with(config, config.wealth_mode, &PopulationConfig::default(), rng)
}

/// Build a population with an explicit wealth mode and population knobs.
///
/// Ids are `trader_0000`, `trader_0001`, ... Limited traders draw their
/// starting wealth and then holdings from their own child generator.
pub fn build_traders_with<R: Rng>(
    config: &MarketConfig,
    wealth_mode: WealthMode,
    population: &PopulationConfig,
    rng: &mut R,
) -> Vec<MarketParticipant> {
    let traders: Vec<MarketParticipant> = (0..config.n_traders)
        .map(|idx| {
            let mut child = ChaCha8Rng::seed_from_u64(rng.gen_range(0..CHILD_SEED_RANGE));
            let trader_id = TraderId::sequential(idx);
            match wealth_mode {
                WealthMode::Limited => {
                    let (w_lo, w_hi) = population.wealth_range;
                    let (h_lo, h_hi) = population.holdings_range;
                    let wealth = draws::uniform(&mut child, w_lo, w_hi);
                    let holdings = draws::uniform(&mut child, h_lo, h_hi);
                    WealthLimitedTrader::with_rng(trader_id, child, wealth, holdings)
                        .with_active_probability(population.active_probability)
                        .into()
                }
                WealthMode::Unlimited => RandomTrader::with_rng(trader_id, child)
                    .with_active_probability(population.active_probability)
                    .into(),
            }
        })
        .collect();

    debug!(count = traders.len(), wealth_mode = %wealth_mode, "Trader population built");
    traders
}
