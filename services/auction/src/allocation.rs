//! Fill allocation
//!
//! Hands the clearing volume out to the orders that cross the clearing
//! price. Candidates are served in price priority and the last order touched
//! may be partially filled. Buy and sell sides are allocated independently.

use crate::clearing::{crossing::crosses_clearing_price, Clearing};
use std::cmp::Ordering;
use types::order::{Order, Side};

/// Volume assigned to one candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fill<K> {
    pub key: K,
    pub volume: f64,
}

/// Greedy allocation over `(key, available)` candidates in iteration order.
///
/// Each candidate receives `min(available, remaining)`; allocation stops once
/// `volume` is exhausted. Zero fills are never emitted and a negative
/// `volume` is treated as zero.
pub fn allocate_fills<K, I>(candidates: I, volume: f64) -> Vec<Fill<K>>
where
    I: IntoIterator<Item = (K, f64)>,
{
    let mut remaining = volume.max(0.0);
    let mut fills = Vec::new();
    for (key, available) in candidates {
        if remaining <= 0.0 {
            break;
        }
        let fill_volume = available.min(remaining);
        if fill_volume > 0.0 {
            fills.push(Fill {
                key,
                volume: fill_volume,
            });
            remaining -= fill_volume;
        }
    }
    fills
}

/// [`allocate_fills`] over orders, keyed by reference.
pub fn allocate_order_fills<'a, I>(orders: I, volume: f64) -> Vec<(&'a Order, f64)>
where
    I: IntoIterator<Item = &'a Order>,
{
    allocate_fills(orders.into_iter().map(|o| (o, o.volume())), volume)
        .into_iter()
        .map(|fill| (fill.key, fill.volume))
        .collect()
}

/// Indices of `orders` that cross `clearing_price` on `side`, in price
/// priority: buys best (highest) first, sells best (lowest) first. The sort
/// is stable, so equal prices keep submission order.
pub fn rank_fill_candidates(orders: &[Order], side: Side, clearing_price: f64) -> Vec<usize> {
    let mut ranked: Vec<usize> = orders
        .iter()
        .enumerate()
        .filter(|(_, o)| crosses_clearing_price(side, o.price(), clearing_price))
        .map(|(idx, _)| idx)
        .collect();

    ranked.sort_by(|a, b| {
        let (pa, pb) = (orders[*a].price(), orders[*b].price());
        let ord = pa.partial_cmp(&pb).unwrap_or(Ordering::Equal);
        match side {
            Side::BUY => ord.reverse(),
            Side::SELL => ord,
        }
    });
    ranked
}

/// Fills for both sides of one day. Keys are indices into the day's buy and
/// sell order slices respectively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayAllocation {
    pub buy: Vec<Fill<usize>>,
    pub sell: Vec<Fill<usize>>,
}

impl DayAllocation {
    pub fn total_buy(&self) -> f64 {
        self.buy.iter().map(|f| f.volume).sum()
    }

    pub fn total_sell(&self) -> f64 {
        self.sell.iter().map(|f| f.volume).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buy.is_empty() && self.sell.is_empty()
    }
}

/// Allocate `clearing.volume` to each side of the book.
pub fn allocate_day(buy_orders: &[Order], sell_orders: &[Order], clearing: &Clearing) -> DayAllocation {
    let side_fills = |orders: &[Order], side: Side| {
        let ranked = rank_fill_candidates(orders, side, clearing.price);
        allocate_fills(
            ranked.into_iter().map(|idx| (idx, orders[idx].volume())),
            clearing.volume,
        )
    };

    DayAllocation {
        buy: side_fills(buy_orders, Side::BUY),
        sell: side_fills(sell_orders, Side::SELL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn order(id: &str, side: Side, price: f64, volume: f64) -> Order {
        Order::new(id, side, price, volume).unwrap()
    }

    #[test]
    fn test_partial_fill_of_last_candidate() {
        let orders = vec![
            order("a", Side::BUY, 100.0, 10.0),
            order("b", Side::BUY, 100.0, 5.0),
        ];
        let fills = allocate_order_fills(&orders, 12.0);
        let summary: Vec<(&str, f64)> = fills
            .iter()
            .map(|(o, v)| (o.trader_id().as_str(), *v))
            .collect();
        assert_eq!(summary, vec![("a", 10.0), ("b", 2.0)]);
    }

    #[test]
    fn test_zero_volume_allocates_nothing() {
        let orders = vec![order("a", Side::SELL, 100.0, 10.0)];
        assert!(allocate_order_fills(&orders, 0.0).is_empty());
        assert!(allocate_order_fills(&orders, -3.0).is_empty());
    }

    #[test]
    fn test_volume_exceeding_book() {
        let fills = allocate_fills(vec![("x", 2.0), ("y", 3.0)], 100.0);
        assert_eq!(fills.len(), 2);
        assert_eq!(fills.iter().map(|f| f.volume).sum::<f64>(), 5.0);
    }

    #[test]
    fn test_rank_buys_highest_first_stable() {
        let orders = vec![
            order("low", Side::BUY, 99.0, 1.0),
            order("first", Side::BUY, 102.0, 1.0),
            order("below", Side::BUY, 95.0, 1.0),
            order("second", Side::BUY, 102.0, 1.0),
        ];
        assert_eq!(rank_fill_candidates(&orders, Side::BUY, 98.0), vec![1, 3, 0]);
    }

    #[test]
    fn test_rank_sells_lowest_first() {
        let orders = vec![
            order("a", Side::SELL, 101.0, 1.0),
            order("b", Side::SELL, 97.0, 1.0),
            order("c", Side::SELL, 99.0, 1.0),
        ];
        assert_eq!(rank_fill_candidates(&orders, Side::SELL, 100.0), vec![1, 2]);
    }

    #[test]
    fn test_allocate_day() {
        let buys = vec![
            order("b1", Side::BUY, 105.0, 100.0),
            order("b2", Side::BUY, 100.0, 150.0),
            order("b3", Side::BUY, 95.0, 50.0),
        ];
        let sells = vec![
            order("s1", Side::SELL, 95.0, 80.0),
            order("s2", Side::SELL, 100.0, 120.0),
            order("s3", Side::SELL, 105.0, 100.0),
        ];
        let clearing = Clearing {
            price: 100.0,
            volume: 200.0,
        };
        let alloc = allocate_day(&buys, &sells, &clearing);

        assert_eq!(alloc.buy, vec![Fill { key: 0, volume: 100.0 }, Fill { key: 1, volume: 100.0 }]);
        assert_eq!(alloc.sell, vec![Fill { key: 0, volume: 80.0 }, Fill { key: 1, volume: 120.0 }]);
        assert_eq!(alloc.total_buy(), 200.0);
        assert_eq!(alloc.total_sell(), 200.0);
    }

    #[test]
    fn test_no_trade_day_is_empty() {
        let buys = vec![order("b", Side::BUY, 95.0, 10.0)];
        let sells = vec![order("s", Side::SELL, 105.0, 10.0)];
        let alloc = allocate_day(&buys, &sells, &Clearing { price: 106.0, volume: 0.0 });
        assert!(alloc.is_empty());
    }

    proptest! {
        #[test]
        fn prop_fills_never_exceed_volume_or_orders(
            sizes in prop::collection::vec(0.1f64..100.0, 0..40),
            volume in 0.0f64..1000.0,
        ) {
            let fills = allocate_fills(sizes.iter().copied().enumerate(), volume);
            let total: f64 = fills.iter().map(|f| f.volume).sum();
            prop_assert!(total <= volume + 1e-9);
            for fill in &fills {
                prop_assert!(fill.volume > 0.0);
                prop_assert!(fill.volume <= sizes[fill.key]);
            }
            // either the volume is used up or every candidate is fully filled
            let available: f64 = sizes.iter().sum();
            prop_assert!((total - volume.min(available)).abs() < 1e-6);
        }
    }
}
