//! Call Auction Service
//!
//! Single-price daily auction for one asset. A day's limit orders are
//! aggregated into cumulative demand/supply curves over a discrete price
//! grid, the price that maximizes executable volume is chosen, and that
//! volume is allocated back to the orders that cross it.
//!
//! **Key Invariants:**
//! - `price_grid`, `buy_curve` and `sell_curve` always have equal length
//! - Clearing volume is non-negative; the price is the mean of all grid
//!   prices achieving the maximum executable volume
//! - Fills on each side never exceed the clearing volume or any order's size
//! - Deterministic clearing (same orders → same price, volume, fills)

pub mod allocation;
pub mod clearing;
pub mod curves;
pub mod errors;

pub use allocation::{
    allocate_day, allocate_fills, allocate_order_fills, rank_fill_candidates, DayAllocation, Fill,
};
pub use clearing::{find_equilibrium_price, Clearing};
pub use curves::{aggregate_orders, build_order_curves, OrderCurves};
pub use errors::AuctionError;
