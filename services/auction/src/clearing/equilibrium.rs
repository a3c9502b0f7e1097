//! Equilibrium price search
//!
//! The clearing price is the grid price that maximizes executable volume.
//! Ties are resolved by the arithmetic mean of every tied grid price, so
//! price discovery is not biased toward either side of the book.

use crate::curves::OrderCurves;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Outcome of clearing one day's curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Clearing {
    pub price: f64,
    pub volume: f64,
}

impl Clearing {
    /// True if any volume changed hands.
    pub fn has_trade(&self) -> bool {
        self.volume > 0.0
    }
}

/// Find the clearing price and volume for a set of curves.
///
/// - If no grid price has positive executable volume the price is the last
///   grid price and the volume is zero.
/// - A completely empty grid yields price `0.0`, distinguishing "no market
///   data" from "no trade".
pub fn find_equilibrium_price(curves: &OrderCurves) -> Clearing {
    let satisfaction = curves.satisfaction();
    let max_volume = satisfaction.iter().copied().fold(0.0_f64, f64::max);
    let last_price = curves.price_grid().last().copied().unwrap_or(0.0);

    if max_volume <= 0.0 {
        return Clearing {
            price: last_price,
            volume: 0.0,
        };
    }

    let (sum, count) = curves
        .price_grid()
        .iter()
        .zip(&satisfaction)
        .filter(|(_, volume)| **volume == max_volume)
        .fold((0.0, 0usize), |(sum, count), (price, _)| (sum + price, count + 1));

    let price = if count > 0 { sum / count as f64 } else { last_price };
    trace!(price, volume = max_volume, tied = count, "Equilibrium found");

    Clearing {
        price,
        volume: max_volume,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::build_order_curves;
    use types::order::{Order, Side};

    fn orders(side: Side, levels: &[(f64, f64)]) -> Vec<Order> {
        levels.iter()
            .map(|(p, v)| Order::new("t", side, *p, *v).unwrap())
            .collect()
    }

    #[test]
    fn test_perfect_match() {
        let curves = build_order_curves(
            &orders(Side::BUY, &[(100.0, 100.0)]),
            &orders(Side::SELL, &[(100.0, 100.0)]),
            1.0,
        )
        .unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing.price, 100.0);
        assert_eq!(clearing.volume, 100.0);
        assert!(clearing.has_trade());
    }

    #[test]
    fn test_mixed_book_maximizes_volume() {
        let buys = orders(Side::BUY, &[(105.0, 100.0), (100.0, 150.0), (95.0, 50.0)]);
        let sells = orders(Side::SELL, &[(95.0, 80.0), (100.0, 120.0), (105.0, 100.0)]);
        let curves = build_order_curves(&buys, &sells, 1.0).unwrap();

        let clearing = find_equilibrium_price(&curves);
        let best = curves.satisfaction().into_iter().fold(0.0, f64::max);
        assert_eq!(clearing.volume, best);
        assert_eq!(clearing.volume, 200.0);
        assert_eq!(clearing.price, 100.0);
    }

    #[test]
    fn test_tie_uses_mean_of_tied_prices() {
        // satisfaction is 10 at 99, 100 and 101
        let curves = build_order_curves(
            &orders(Side::BUY, &[(101.0, 10.0)]),
            &orders(Side::SELL, &[(99.0, 10.0)]),
            1.0,
        )
        .unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing.volume, 10.0);
        assert_eq!(clearing.price, 100.0);
    }

    #[test]
    fn test_asymmetric_tie_is_not_first_or_last() {
        let curves = OrderCurves::new(
            vec![10.0, 11.0, 12.0, 13.0],
            vec![5.0, 5.0, 5.0, 0.0],
            vec![0.0, 5.0, 5.0, 5.0],
        )
        .unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing.price, 11.5);
        assert_eq!(clearing.volume, 5.0);
    }

    #[test]
    fn test_no_overlap_returns_last_grid_price() {
        let curves = build_order_curves(
            &orders(Side::BUY, &[(95.0, 10.0), (96.0, 5.0)]),
            &orders(Side::SELL, &[(104.0, 10.0), (105.0, 7.0)]),
            1.0,
        )
        .unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing.volume, 0.0);
        assert_eq!(clearing.price, *curves.price_grid().last().unwrap());
        assert_eq!(clearing.price, 106.0);
        assert!(!clearing.has_trade());
    }

    #[test]
    fn test_one_sided_book() {
        let curves =
            build_order_curves(&orders(Side::BUY, &[(100.0, 10.0)]), &[], 1.0).unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing.volume, 0.0);
        assert_eq!(clearing.price, 101.0);
    }

    #[test]
    fn test_empty_grid_returns_zero_price() {
        let curves = OrderCurves::new(vec![], vec![], vec![]).unwrap();
        let clearing = find_equilibrium_price(&curves);
        assert_eq!(clearing, Clearing { price: 0.0, volume: 0.0 });
    }
}
