//! Simulation errors

use auction::AuctionError;
use thiserror::Error;
use types::errors::{ConfigError, OrderError};

/// Anything that aborts a run. There is no recovery path: the first error
/// raised by a trader or by clearing is returned to the caller as is.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error("order construction failed: {0}")]
    Order(#[from] OrderError),

    #[error("auction clearing failed: {0}")]
    Auction(#[from] AuctionError),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("export failed: {0}")]
    Export(String),
}
