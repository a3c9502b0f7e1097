//! Simulation runner
//!
//! Drives the day loop. Each day runs the same sequence:
//! sentiment, order collection, clearing, fill allocation, settlement,
//! snapshot. The only state carried between days is the last clearing price.

use crate::error::SimulationError;
use crate::metrics::RunMetrics;
use crate::sentiment::{sentiment_from_config, NoSentiment, SentimentCurve};
use crate::state::MarketState;
use crate::traders::{build_traders, DayContext, MarketParticipant, Trader};
use auction::{allocate_day, build_order_curves, find_equilibrium_price, Fill};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace, warn};
use types::config::MarketConfig;
use types::order::Order;

/// Which participant submitted an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Owner {
    Population(usize),
    Manipulator,
}

/// One day's orders split by side, each with a parallel owner vector.
#[derive(Debug, Default)]
struct DayBook {
    buys: Vec<Order>,
    buy_owners: Vec<Owner>,
    sells: Vec<Order>,
    sell_owners: Vec<Owner>,
}

impl DayBook {
    fn push(&mut self, order: Order, owner: Owner) {
        if order.is_buy() {
            self.buys.push(order);
            self.buy_owners.push(owner);
        } else {
            self.sells.push(order);
            self.sell_owners.push(owner);
        }
    }

    fn is_empty(&self) -> bool {
        self.buys.is_empty() && self.sells.is_empty()
    }
}

pub struct SimulationRunner {
    config: MarketConfig,
    traders: Vec<MarketParticipant>,
    manipulator: Option<MarketParticipant>,
    sentiment: Box<dyn SentimentCurve>,
}

impl SimulationRunner {
    /// Runner over an explicit population, no manipulator and no sentiment.
    pub fn new(config: MarketConfig, traders: Vec<MarketParticipant>) -> Self {
        Self {
            config,
            traders,
            manipulator: None,
            sentiment: Box::new(NoSentiment),
        }
    }

    /// Runner over a population built from `config`, seeded with
    /// `config.seed` or OS entropy when unset.
    pub fn from_config(config: MarketConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let traders = build_traders(&config, &mut rng);
        Self::new(config, traders)
    }

    pub fn with_manipulator(mut self, manipulator: impl Into<MarketParticipant>) -> Self {
        self.manipulator = Some(manipulator.into());
        self
    }

    pub fn with_sentiment(mut self, sentiment: impl SentimentCurve + 'static) -> Self {
        self.sentiment = Box::new(sentiment);
        self
    }

    pub fn with_boxed_sentiment(mut self, sentiment: Box<dyn SentimentCurve>) -> Self {
        self.sentiment = sentiment;
        self
    }

    /// Sentiment curve of the configured `sentiment_mode`. A pulse is
    /// centred on `start_day`.
    pub fn with_config_sentiment(self, start_day: usize, width: usize, magnitude: f64) -> Self {
        let sentiment = sentiment_from_config(self.config.sentiment_mode, start_day, width, magnitude);
        self.with_boxed_sentiment(sentiment)
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn traders(&self) -> &[MarketParticipant] {
        &self.traders
    }

    pub fn manipulator(&self) -> Option<&MarketParticipant> {
        self.manipulator.as_ref()
    }

    /// Simulate `n_days` days starting from `config.initial_price`.
    ///
    /// Trader state persists across calls; the price does not.
    pub fn run(&mut self, n_days: usize) -> Result<Vec<MarketState>, SimulationError> {
        self.run_with_metrics(n_days).map(|(states, _)| states)
    }

    /// Like [`SimulationRunner::run`], also returning run counters.
    pub fn run_with_metrics(&mut self, n_days: usize) -> Result<(Vec<MarketState>, RunMetrics), SimulationError> {
        info!(
            days = n_days,
            traders = self.traders.len(),
            manipulator = self.manipulator.as_ref().map(|m| m.kind()),
            initial_price = self.config.initial_price,
            "Simulation run started"
        );

        let mut metrics = RunMetrics::new();
        let mut states = Vec::with_capacity(n_days);
        let mut last_price = self.config.initial_price;

        for day in 0..n_days {
            let state = self.step_day(day, last_price, &mut metrics)?;
            last_price = state.price;
            states.push(state);
        }

        info!(
            days = n_days,
            final_price = last_price,
            total_volume = metrics.total_volume,
            empty_days = metrics.empty_days,
            "Simulation run finished"
        );
        Ok((states, metrics))
    }

    fn step_day(&mut self, day: usize, last_price: f64, metrics: &mut RunMetrics) -> Result<MarketState, SimulationError> {
        let sentiment_value = self.sentiment.value_at(day);
        let book = self.collect_orders(day, last_price, sentiment_value)?;
        metrics.record_orders(&book.buys, &book.sells);

        if book.is_empty() {
            debug!(day, price = last_price, "No orders, price carried forward");
            let state = MarketState::new(day, last_price, 0.0, sentiment_value);
            metrics.record_empty_day(&state);
            return Ok(state);
        }

        let curves = build_order_curves(&book.buys, &book.sells, self.config.price_tick)?;
        let clearing = find_equilibrium_price(&curves);
        let allocation = allocate_day(&book.buys, &book.sells, &clearing);

        debug!(
            day,
            buys = book.buys.len(),
            sells = book.sells.len(),
            price = clearing.price,
            volume = clearing.volume,
            "Day cleared"
        );

        self.settle(&allocation.buy, &book.buys, &book.buy_owners, clearing.price, metrics);
        self.settle(&allocation.sell, &book.sells, &book.sell_owners, clearing.price, metrics);

        let state = MarketState::new(day, clearing.price, clearing.volume, sentiment_value).with_curves(curves);
        if !clearing.has_trade() {
            metrics.record_no_trade();
        }
        metrics.record_day(&state);
        Ok(state)
    }

    /// Population first, then the manipulator.
    fn collect_orders(&mut self, day: usize, last_price: f64, sentiment_value: f64) -> Result<DayBook, SimulationError> {
        let ctx = DayContext::new(day, last_price, sentiment_value, &self.config);
        let mut book = DayBook::default();

        for (idx, trader) in self.traders.iter_mut().enumerate() {
            for order in trader.generate_orders(&ctx)? {
                book.push(order, Owner::Population(idx));
            }
        }
        if let Some(manipulator) = self.manipulator.as_mut() {
            for order in manipulator.generate_orders(&ctx)? {
                book.push(order, Owner::Manipulator);
            }
        }
        Ok(book)
    }

    fn settle(&mut self, fills: &[Fill<usize>], orders: &[Order], owners: &[Owner], price: f64, metrics: &mut RunMetrics) {
        for fill in fills {
            let Some(order) = orders.get(fill.key) else {
                warn!(index = fill.key, "Fill refers to an unknown order");
                continue;
            };
            let participant = match owners.get(fill.key) {
                Some(Owner::Population(idx)) => self.traders.get_mut(*idx),
                Some(Owner::Manipulator) => self.manipulator.as_mut(),
                None => None,
            };
            match participant {
                Some(participant) => {
                    trace!(
                        order = %order.trader_id(),
                        side = ?order.side(),
                        price,
                        volume = fill.volume,
                        "Fill settled"
                    );
                    participant.apply_fill(order, price, fill.volume);
                    metrics.record_fill(order, price, fill.volume);
                }
                None => warn!(order = %order.trader_id(), "Fill has no recorded owner"),
            }
        }
    }
}
