//! Closed set of trader variants
//!
//! The runner holds participants by value in a `Vec`; each call is routed to
//! the concrete variant through a `match`.

use crate::manipulation::{LayeringManipulator, Manipulator, SpoofingManipulator, WashTradingManipulator};
use crate::traders::{Account, DayContext, RandomTrader, Trader, WealthLimitedTrader};
use types::errors::OrderError;
use types::ids::TraderId;
use types::order::Order;

#[derive(Debug, Clone)]
pub enum MarketParticipant {
    Random(RandomTrader),
    WealthLimited(WealthLimitedTrader),
    PumpAndDump(Manipulator),
    Spoofing(SpoofingManipulator),
    WashTrading(WashTradingManipulator),
    Layering(LayeringManipulator),
}

impl MarketParticipant {
    /// Short label for logs and exports.
    pub fn kind(&self) -> &'static str {
        match self {
            MarketParticipant::Random(_) => "random",
            MarketParticipant::WealthLimited(_) => "wealth_limited",
            MarketParticipant::PumpAndDump(_) => "pump_and_dump",
            MarketParticipant::Spoofing(_) => "spoofing",
            MarketParticipant::WashTrading(_) => "wash_trading",
            MarketParticipant::Layering(_) => "layering",
        }
    }

    pub fn is_manipulator(&self) -> bool {
        !matches!(self, MarketParticipant::Random(_) | MarketParticipant::WealthLimited(_))
    }

    fn as_trader(&self) -> &dyn Trader {
        match self {
            MarketParticipant::Random(t) => t,
            MarketParticipant::WealthLimited(t) => t,
            MarketParticipant::PumpAndDump(t) => t,
            MarketParticipant::Spoofing(t) => t,
            MarketParticipant::WashTrading(t) => t,
            MarketParticipant::Layering(t) => t,
        }
    }

    fn as_trader_mut(&mut self) -> &mut dyn Trader {
        match self {
            MarketParticipant::Random(t) => t,
            MarketParticipant::WealthLimited(t) => t,
            MarketParticipant::PumpAndDump(t) => t,
            MarketParticipant::Spoofing(t) => t,
            MarketParticipant::WashTrading(t) => t,
            MarketParticipant::Layering(t) => t,
        }
    }
}

impl Trader for MarketParticipant {
    fn trader_id(&self) -> &TraderId {
        self.as_trader().trader_id()
    }

    fn generate_orders(&mut self, ctx: &DayContext<'_>) -> Result<Vec<Order>, OrderError> {
        self.as_trader_mut().generate_orders(ctx)
    }

    fn apply_fill(&mut self, order: &Order, price: f64, volume: f64) {
        self.as_trader_mut().apply_fill(order, price, volume);
    }

    fn account(&self) -> Option<&Account> {
        self.as_trader().account()
    }
}

macro_rules! impl_from_variant {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for MarketParticipant {
                fn from(trader: $ty) -> Self {
                    MarketParticipant::$variant(trader)
                }
            }
        )*
    };
}

impl_from_variant! {
    RandomTrader => Random,
    WealthLimitedTrader => WealthLimited,
    Manipulator => PumpAndDump,
    SpoofingManipulator => Spoofing,
    WashTradingManipulator => WashTrading,
    LayeringManipulator => Layering,
}
