//! Market Manipulation Lab simulation harness
//!
//! Daily call-auction market populated by synthetic traders and optional
//! manipulators, with post-hoc detection of the resulting price path.
//!
//! # Modules
//! - `traders`: Trader capability, random and wealth-limited traders, population factory
//! - `manipulation`: Pump-and-dump, spoofing, wash-trading and layering strategies
//! - `sentiment`: Exogenous day-indexed price drift
//! - `runner`: The day loop: collect, clear, allocate, settle
//! - `state`: Per-day market snapshot
//! - `metrics`: Run counters
//! - `detection`: Rolling z-scores, anomaly scores and detectors
//! - `replay`: Deterministic replay validation
//! - `scenarios`: Presets and the baseline random walk
//! - `export`: JSON export of finished runs

pub mod detection;
pub mod error;
pub mod export;
pub mod manipulation;
pub mod metrics;
pub mod replay;
pub mod runner;
pub mod scenarios;
pub mod sentiment;
pub mod state;
pub mod traders;

pub use error::SimulationError;
pub use runner::SimulationRunner;
pub use state::MarketState;

/// Crate version constant
pub const VERSION: &str = "1.0.0";
