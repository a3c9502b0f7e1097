//! Named market presets

use crate::error::SimulationError;
use crate::manipulation::{Manipulator, ManipulatorConfig};
use crate::runner::SimulationRunner;
use crate::scenarios::ScenarioResult;
use crate::traders::{build_traders_with, PopulationConfig};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use types::config::{MarketConfig, WealthMode};

/// Starting position of a preset manipulator.
const MANIPULATOR_HOLDINGS: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScenarioPreset {
    QuickStart,
    PumpAndDump,
    SmallMarket,
    LargeMarket,
    ExtremeManipulation,
    RandomWalk,
}

/// Manipulator slot of a preset.
#[derive(Debug, Clone, PartialEq)]
pub struct PresetManipulator {
    pub wealth: f64,
    pub holdings: f64,
    pub phases: ManipulatorConfig,
}

impl ScenarioPreset {
    pub const ALL: [ScenarioPreset; 6] = [
        ScenarioPreset::QuickStart,
        ScenarioPreset::PumpAndDump,
        ScenarioPreset::SmallMarket,
        ScenarioPreset::LargeMarket,
        ScenarioPreset::ExtremeManipulation,
        ScenarioPreset::RandomWalk,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ScenarioPreset::QuickStart => "quick_start",
            ScenarioPreset::PumpAndDump => "pump_and_dump",
            ScenarioPreset::SmallMarket => "small_market",
            ScenarioPreset::LargeMarket => "large_market",
            ScenarioPreset::ExtremeManipulation => "extreme_manipulation",
            ScenarioPreset::RandomWalk => "random_walk",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ScenarioPreset::QuickStart => "Small, fast market without manipulation",
            ScenarioPreset::PumpAndDump => "Classic pump-and-dump campaign",
            ScenarioPreset::SmallMarket => "Thin market where the manipulator carries weight",
            ScenarioPreset::LargeMarket => "Large, stable market",
            ScenarioPreset::ExtremeManipulation => "Aggressive manipulation with deep pockets",
            ScenarioPreset::RandomWalk => "Unconstrained random walk",
        }
    }

    pub fn days(&self) -> usize {
        match self {
            ScenarioPreset::QuickStart => 60,
            ScenarioPreset::PumpAndDump => 120,
            ScenarioPreset::SmallMarket => 90,
            ScenarioPreset::LargeMarket => 180,
            ScenarioPreset::ExtremeManipulation => 100,
            ScenarioPreset::RandomWalk => 200,
        }
    }

    pub fn market_config(&self, seed: u64) -> MarketConfig {
        let (n_traders, initial_price) = match self {
            ScenarioPreset::QuickStart => (100, 100.0),
            ScenarioPreset::PumpAndDump => (200, 100.0),
            ScenarioPreset::SmallMarket => (50, 50.0),
            ScenarioPreset::LargeMarket => (500, 150.0),
            ScenarioPreset::ExtremeManipulation => (150, 100.0),
            ScenarioPreset::RandomWalk => (300, 100.0),
        };
        let wealth_mode = match self {
            ScenarioPreset::RandomWalk => WealthMode::Unlimited,
            _ => WealthMode::Limited,
        };
        MarketConfig {
            n_traders,
            initial_price,
            wealth_mode,
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Population knobs; starting cash spans half to one and a half times
    /// the preset's nominal cash.
    pub fn population(&self) -> PopulationConfig {
        let cash = match self {
            ScenarioPreset::SmallMarket => 5_000.0,
            ScenarioPreset::LargeMarket => 20_000.0,
            _ => 10_000.0,
        };
        PopulationConfig {
            wealth_range: (cash * 0.5, cash * 1.5),
            ..Default::default()
        }
    }

    pub fn manipulator(&self) -> Option<PresetManipulator> {
        let (wealth, phases) = match self {
            ScenarioPreset::PumpAndDump => (100_000.0, ManipulatorConfig::new(40, 15, 20)),
            ScenarioPreset::SmallMarket => (25_000.0, ManipulatorConfig::default()),
            ScenarioPreset::ExtremeManipulation => (200_000.0, ManipulatorConfig::new(30, 20, 10)),
            _ => return None,
        };
        Some(PresetManipulator {
            wealth,
            holdings: MANIPULATOR_HOLDINGS,
            phases,
        })
    }

    /// Runner for this preset; the manipulator seed is drawn after the
    /// population from the same generator.
    pub fn build(&self, seed: u64) -> SimulationRunner {
        let config = self.market_config(seed);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let traders = build_traders_with(&config, config.wealth_mode, &self.population(), &mut rng);
        let manipulator = self.manipulator().map(|m| {
            let seed = rng.gen::<u64>();
            Manipulator::new("manipulator", seed, m.wealth, m.holdings).with_config(m.phases)
        });

        let runner = SimulationRunner::new(config, traders);
        match manipulator {
            Some(m) => runner.with_manipulator(m),
            None => runner,
        }
    }

    pub fn run(&self, seed: u64) -> Result<ScenarioResult, SimulationError> {
        let (states, metrics) = self.build(seed).run_with_metrics(self.days())?;
        Ok(ScenarioResult::from_run(self.name(), states, metrics))
    }
}

impl fmt::Display for ScenarioPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
