//! Crossing detection logic
//!
//! Determines whether an order participates in a clearing at a given price

use types::order::Side;

/// Check if an order with `limit_price` is eligible for a fill when the
/// auction clears at `clearing_price`.
pub fn crosses_clearing_price(side: Side, limit_price: f64, clearing_price: f64) -> bool {
    match side {
        Side::BUY => limit_price >= clearing_price,  // willing to pay at least the clearing price
        Side::SELL => limit_price <= clearing_price, // willing to accept at most the clearing price
    }
}
