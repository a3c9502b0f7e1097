//! Auction errors

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuctionError {
    /// The grid cannot be stepped with a non-positive or non-finite tick.
    #[error("price tick must be positive and finite, got {0}")]
    InvalidTick(f64),

    #[error("curve length mismatch: grid {grid}, buy {buy}, sell {sell}")]
    MisalignedCurves { grid: usize, buy: usize, sell: usize },

    #[error("price grid must be strictly increasing (index {index})")]
    UnorderedGrid { index: usize },
}
