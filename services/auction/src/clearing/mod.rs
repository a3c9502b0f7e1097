//! Clearing logic
//!
//! Crossing rules against a single clearing price and the equilibrium search
//! over the aggregated curves.

pub mod crossing;
pub mod equilibrium;

pub use crossing::crosses_clearing_price;
pub use equilibrium::{find_equilibrium_price, Clearing};
