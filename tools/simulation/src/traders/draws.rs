//! Random draws shared by every trader policy
//!
//! Each helper consumes a fixed number of values from the generator so that
//! a trader's draw sequence is reproducible from its seed.

use rand::Rng;
use rand_distr::StandardNormal;
use types::config::{MarketConfig, MIN_ORDER_VOLUME};
use types::order::Side;

/// Uniform draw on `[low, high]`. Tolerates `high < low`.
pub fn uniform<R: Rng>(rng: &mut R, low: f64, high: f64) -> f64 {
    low + (high - low) * rng.gen::<f64>()
}

/// Gaussian draw. A zero or negative `std_dev` never panics.
pub fn gauss<R: Rng>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

/// Returns true with probability `p`; always consumes one draw.
pub fn is_active<R: Rng>(rng: &mut R, active_probability: f64) -> bool {
    rng.gen::<f64>() <= active_probability
}

/// Fair coin between buy and sell.
pub fn draw_side<R: Rng>(rng: &mut R) -> Side {
    if rng.gen::<f64>() < 0.5 {
        Side::BUY
    } else {
        Side::SELL
    }
}

/// Limit price centered on the sentiment-adjusted last price, floored at
/// one tick.
pub fn draw_price<R: Rng>(
    rng: &mut R,
    last_price: f64,
    sentiment_value: f64,
    config: &MarketConfig,
) -> f64 {
    let center = (last_price + sentiment_value).max(config.price_tick);
    gauss(rng, center, config.price_volatility).max(config.price_tick)
}

pub fn draw_volume<R: Rng>(rng: &mut R, config: &MarketConfig) -> f64 {
    uniform(rng, MIN_ORDER_VOLUME, config.max_daily_volume)
}
