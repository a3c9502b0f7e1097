//! Types library for the market manipulation lab
//!
//! This library provides the value types shared by the auction and the
//! simulation crates, keeping their invariants in one place.
//!
//! # Modules
//! - `ids`: Trader and run identifiers
//! - `order`: Validated limit orders and order sides
//! - `config`: Market configuration snapshot
//! - `errors`: Error taxonomy

// Public modules
pub mod ids;
pub mod order;
pub mod config;
pub mod errors;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::ids::*;
    pub use crate::order::*;
    pub use crate::config::*;
    pub use crate::errors::*;
}
