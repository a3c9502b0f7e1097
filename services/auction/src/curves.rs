//! Aggregated demand/supply curves
//!
//! `buy_curve[i]` is the total volume of buy orders willing to pay at least
//! `price_grid[i]`; `sell_curve[i]` is the total volume of sell orders
//! willing to accept at most `price_grid[i]`. Curves are derived once per
//! day and never mutated.

use crate::errors::AuctionError;
use serde::{Deserialize, Serialize};
use types::order::Order;

/// Aggregated order curves along a discrete price grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCurves")]
pub struct OrderCurves {
    price_grid: Vec<f64>,
    buy_curve: Vec<f64>,
    sell_curve: Vec<f64>,
}

#[derive(Deserialize)]
struct RawCurves {
    price_grid: Vec<f64>,
    buy_curve: Vec<f64>,
    sell_curve: Vec<f64>,
}

impl TryFrom<RawCurves> for OrderCurves {
    type Error = AuctionError;

    fn try_from(raw: RawCurves) -> Result<Self, Self::Error> {
        OrderCurves::new(raw.price_grid, raw.buy_curve, raw.sell_curve)
    }
}

impl OrderCurves {
    /// Build curves from precomputed vectors.
    ///
    /// All three vectors must have the same length and the grid must be
    /// strictly increasing.
    pub fn new(
        price_grid: Vec<f64>,
        buy_curve: Vec<f64>,
        sell_curve: Vec<f64>,
    ) -> Result<Self, AuctionError> {
        if price_grid.len() != buy_curve.len() || price_grid.len() != sell_curve.len() {
            return Err(AuctionError::MisalignedCurves {
                grid: price_grid.len(),
                buy: buy_curve.len(),
                sell: sell_curve.len(),
            });
        }
        check_increasing(&price_grid)?;
        Ok(Self {
            price_grid,
            buy_curve,
            sell_curve,
        })
    }

    pub fn price_grid(&self) -> &[f64] {
        &self.price_grid
    }

    pub fn buy_curve(&self) -> &[f64] {
        &self.buy_curve
    }

    pub fn sell_curve(&self) -> &[f64] {
        &self.sell_curve
    }

    pub fn len(&self) -> usize {
        self.price_grid.len()
    }

    pub fn is_empty(&self) -> bool {
        self.price_grid.is_empty()
    }

    /// Volume that could clear if trading happened exactly at each grid price:
    /// `min(buy_curve[i], sell_curve[i])`.
    pub fn satisfaction(&self) -> Vec<f64> {
        self.buy_curve
            .iter()
            .zip(&self.sell_curve)
            .map(|(b, s)| b.min(*s))
            .collect()
    }

    /// `(demand, supply)` at the highest grid price not above `price`.
    pub fn depth_at(&self, price: f64) -> Option<(f64, f64)> {
        let idx = self.price_grid.partition_point(|p| *p <= price);
        if idx == 0 {
            return None;
        }
        Some((self.buy_curve[idx - 1], self.sell_curve[idx - 1]))
    }
}

fn check_increasing(grid: &[f64]) -> Result<(), AuctionError> {
    for (i, pair) in grid.windows(2).enumerate() {
        if !(pair[1] > pair[0]) {
            return Err(AuctionError::UnorderedGrid { index: i + 1 });
        }
    }
    Ok(())
}

/// Discrete grid from one tick below the cheapest order (floored at one
/// tick) to one tick above the dearest, stepped by `price_tick`.
fn price_grid_for(buy_orders: &[Order], sell_orders: &[Order], price_tick: f64) -> Vec<f64> {
    let mut prices = buy_orders.iter().chain(sell_orders).map(Order::price);
    let Some(first) = prices.next() else {
        return vec![price_tick];
    };
    let (lo, hi) = prices.fold((first, first), |(lo, hi), p| (lo.min(p), hi.max(p)));

    let min_price = (lo - price_tick).max(price_tick);
    let max_price = hi + price_tick;
    let steps = ((max_price - min_price) / price_tick) as usize + 1;
    (0..steps)
        .map(|idx| min_price + price_tick * idx as f64)
        .collect()
}

/// Convert individual orders into aggregated demand and supply curves.
///
/// When `price_grid` is `None` a grid covering every order is generated;
/// an empty grid (supplied or generated) collapses to the single point
/// `[price_tick]`. Cost is O(grid × orders), fine at simulated scale.
pub fn aggregate_orders(
    buy_orders: &[Order],
    sell_orders: &[Order],
    price_tick: f64,
    price_grid: Option<&[f64]>,
) -> Result<OrderCurves, AuctionError> {
    if !(price_tick.is_finite() && price_tick > 0.0) {
        return Err(AuctionError::InvalidTick(price_tick));
    }

    let mut grid = match price_grid {
        Some(grid) => grid.to_vec(),
        None => price_grid_for(buy_orders, sell_orders, price_tick),
    };
    if grid.is_empty() {
        grid.push(price_tick);
    }

    let buy_curve = grid
        .iter()
        .map(|p| {
            buy_orders
                .iter()
                .filter(|o| o.price() >= *p)
                .map(Order::volume)
                .sum()
        })
        .collect();
    let sell_curve = grid
        .iter()
        .map(|p| {
            sell_orders
                .iter()
                .filter(|o| o.price() <= *p)
                .map(Order::volume)
                .sum()
        })
        .collect();

    OrderCurves::new(grid, buy_curve, sell_curve)
}

/// Build curves on an auto-generated grid.
pub fn build_order_curves(
    buy_orders: &[Order],
    sell_orders: &[Order],
    price_tick: f64,
) -> Result<OrderCurves, AuctionError> {
    aggregate_orders(buy_orders, sell_orders, price_tick, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use types::order::Side;

    fn buy(price: f64, volume: f64) -> Order {
        Order::new("b", Side::BUY, price, volume).unwrap()
    }

    fn sell(price: f64, volume: f64) -> Order {
        Order::new("s", Side::SELL, price, volume).unwrap()
    }

    #[test]
    fn test_satisfaction() {
        let curves = OrderCurves::new(
            vec![100.0, 101.0],
            vec![50.0, 30.0],
            vec![40.0, 60.0],
        )
        .unwrap();
        assert_eq!(curves.satisfaction(), vec![40.0, 30.0]);
    }

    #[test]
    fn test_misaligned_rejected() {
        let err = OrderCurves::new(vec![1.0, 2.0], vec![1.0], vec![1.0, 2.0]).unwrap_err();
        assert_eq!(err, AuctionError::MisalignedCurves { grid: 2, buy: 1, sell: 2 });
    }

    #[test]
    fn test_unordered_grid_rejected() {
        let err = OrderCurves::new(vec![2.0, 1.0], vec![0.0, 0.0], vec![0.0, 0.0]).unwrap_err();
        assert_eq!(err, AuctionError::UnorderedGrid { index: 1 });
    }

    #[test]
    fn test_grid_bounds() {
        let curves = build_order_curves(&[buy(100.0, 10.0), buy(101.0, 5.0)], &[sell(99.0, 8.0)], 1.0)
            .unwrap();
        assert_eq!(curves.price_grid(), &[98.0, 99.0, 100.0, 101.0, 102.0]);
    }

    #[test]
    fn test_grid_floored_at_tick() {
        let curves = build_order_curves(&[buy(0.5, 1.0)], &[], 1.0).unwrap();
        assert_eq!(curves.price_grid()[0], 1.0);
    }

    #[test]
    fn test_empty_orders_single_point() {
        let curves = build_order_curves(&[], &[], 0.5).unwrap();
        assert_eq!(curves.price_grid(), &[0.5]);
        assert_eq!(curves.buy_curve(), &[0.0]);
        assert_eq!(curves.sell_curve(), &[0.0]);
    }

    #[test]
    fn test_cumulative_curves() {
        let curves = build_order_curves(
            &[buy(100.0, 10.0), buy(101.0, 5.0)],
            &[sell(99.0, 8.0)],
            1.0,
        )
        .unwrap();
        // grid 98..102
        assert_eq!(curves.buy_curve(), &[15.0, 15.0, 15.0, 5.0, 0.0]);
        assert_eq!(curves.sell_curve(), &[0.0, 8.0, 8.0, 8.0, 8.0]);
    }

    #[test]
    fn test_supplied_grid() {
        let grid = [99.0, 100.0, 101.0];
        let curves =
            aggregate_orders(&[buy(100.0, 3.0)], &[sell(100.0, 2.0)], 1.0, Some(&grid)).unwrap();
        assert_eq!(curves.price_grid(), &grid);
        assert_eq!(curves.buy_curve(), &[3.0, 3.0, 0.0]);
        assert_eq!(curves.sell_curve(), &[0.0, 2.0, 2.0]);
    }

    #[test]
    fn test_empty_supplied_grid_collapses() {
        let curves = aggregate_orders(&[], &[], 2.0, Some(&[])).unwrap();
        assert_eq!(curves.price_grid(), &[2.0]);
    }

    #[test]
    fn test_invalid_tick() {
        assert_eq!(
            build_order_curves(&[buy(100.0, 1.0)], &[], 0.0),
            Err(AuctionError::InvalidTick(0.0))
        );
        assert!(build_order_curves(&[], &[], -1.0).is_err());
    }

    #[test]
    fn test_depth_at() {
        let curves = build_order_curves(&[buy(100.0, 10.0)], &[sell(99.0, 8.0)], 1.0).unwrap();
        assert_eq!(curves.depth_at(99.5), Some((10.0, 8.0)));
        assert_eq!(curves.depth_at(10.0), None);
    }

    fn order_strategy() -> impl Strategy<Value = (f64, f64)> {
        (1.0f64..200.0, 0.1f64..50.0)
    }

    proptest! {
        #[test]
        fn prop_curves_aligned(
            buys in prop::collection::vec(order_strategy(), 0..30),
            sells in prop::collection::vec(order_strategy(), 0..30),
            tick in prop::sample::select(vec![0.01, 0.25, 0.5, 1.0, 2.0]),
        ) {
            let buys: Vec<Order> = buys.into_iter().map(|(p, v)| buy(p, v)).collect();
            let sells: Vec<Order> = sells.into_iter().map(|(p, v)| sell(p, v)).collect();
            let curves = build_order_curves(&buys, &sells, tick).unwrap();
            prop_assert_eq!(curves.price_grid().len(), curves.buy_curve().len());
            prop_assert_eq!(curves.price_grid().len(), curves.sell_curve().len());
            prop_assert!(!curves.is_empty());
            // demand never increases with price, supply never decreases
            for w in curves.buy_curve().windows(2) {
                prop_assert!(w[1] <= w[0]);
            }
            for w in curves.sell_curve().windows(2) {
                prop_assert!(w[1] >= w[0]);
            }
        }
    }
}
