//! Manipulation strategies
//!
//! Capital-constrained traders running day-indexed or call-indexed state
//! machines. They share the [`Trader`](crate::traders::Trader) contract with
//! the regular population and can sit either in the population or in the
//! runner's manipulator slot.

pub mod layering;
pub mod pump_dump;
pub mod spoofing;
pub mod wash_trading;

pub use layering::{LayeringConfig, LayeringManipulator, LayeringPhase};
pub use pump_dump::{Manipulator, ManipulatorConfig, Phase};
pub use spoofing::{SpoofingConfig, SpoofingManipulator};
pub use wash_trading::{WashTradingConfig, WashTradingManipulator};

use rand::Rng;
use serde::{Deserialize, Serialize};
use types::order::Side;

/// Side a strategy concentrates its fake pressure on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetSide {
    Buy,
    Sell,
    #[default]
    Random,
}

impl TargetSide {
    /// Resolve to a concrete side. Only `Random` consumes a draw.
    pub fn resolve<R: Rng>(self, rng: &mut R) -> Side {
        match self {
            TargetSide::Buy => Side::BUY,
            TargetSide::Sell => Side::SELL,
            TargetSide::Random => crate::traders::draws::draw_side(rng),
        }
    }
}
