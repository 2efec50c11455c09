//! Synthetic command stream for replay tests, demos, and benchmarks.
//!
//! Deterministic and configurable: same seed ⇒ same sequence of commands ⇒ same book.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rust_decimal::Decimal;

use crate::error::EngineError;
use crate::order_book::OrderBook;
use crate::types::{OrderId, Side};

/// One caller request against a book.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    PlaceLimit { side: Side, price: Decimal, size: Decimal },
    PlaceMarket { side: Side, size: Decimal },
    /// Cancel the `placement`-th limit order placed during this replay (0-based).
    /// The order may already be filled or cancelled.
    Cancel { placement: usize },
}

/// Configuration for the synthetic command generator.
/// All ranges are inclusive. Same config + seed produces the same stream.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// RNG seed. Same seed ⇒ same command stream.
    pub seed: u64,
    /// Number of commands to generate (used by [`Generator::all_commands`]).
    pub num_commands: usize,
    /// Probability of Bid (0.0..=1.0). Ask otherwise.
    pub bid_ratio: f64,
    /// Probability of a limit placement, then a market order; the rest are cancels.
    pub limit_ratio: f64,
    pub market_ratio: f64,
    /// Price range (inclusive) for limit orders, whole ticks.
    pub price_min: i64,
    pub price_max: i64,
    /// Size range (inclusive), in tenths of a unit.
    pub size_min_tenths: i64,
    pub size_max_tenths: i64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            num_commands: 1000,
            bid_ratio: 0.5,
            limit_ratio: 0.7,
            market_ratio: 0.2,
            price_min: 95,
            price_max: 105,
            size_min_tenths: 1,
            size_max_tenths: 100,
        }
    }
}

/// Deterministic command stream. Create with [`Generator::new`].
pub struct Generator {
    rng: StdRng,
    config: GeneratorConfig,
    limits_issued: usize,
}

impl Generator {
    /// Builds a generator with the given config. Same config (including seed) ⇒ same stream.
    pub fn new(config: GeneratorConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self {
            rng,
            config,
            limits_issued: 0,
        }
    }

    /// Generates the next command. Cancels only target limits issued earlier in the stream.
    pub fn next_command(&mut self) -> Command {
        let side = if self.rng.gen::<f64>() < self.config.bid_ratio {
            Side::Bid
        } else {
            Side::Ask
        };
        let size = Decimal::new(
            self.rng
                .gen_range(self.config.size_min_tenths.max(1)..=self.config.size_max_tenths.max(1)),
            1,
        );
        let r = self.rng.gen::<f64>();
        if r < self.config.limit_ratio || self.limits_issued == 0 {
            let price = Decimal::from(
                self.rng
                    .gen_range(self.config.price_min.max(1)..=self.config.price_max.max(1)),
            );
            self.limits_issued += 1;
            Command::PlaceLimit { side, price, size }
        } else if r < self.config.limit_ratio + self.config.market_ratio {
            Command::PlaceMarket { side, size }
        } else {
            Command::Cancel {
                placement: self.rng.gen_range(0..self.limits_issued),
            }
        }
    }

    /// Returns `n` commands, advancing the generator.
    pub fn take_commands(&mut self, n: usize) -> Vec<Command> {
        (0..n).map(|_| self.next_command()).collect()
    }

    /// Returns the full stream as defined by config.num_commands.
    pub fn all_commands(&mut self) -> Vec<Command> {
        self.take_commands(self.config.num_commands)
    }
}

/// Counters accumulated over a replay.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ReplayStats {
    pub placed: usize,
    pub matches: usize,
    pub traded_volume: Decimal,
    pub markets_filled: usize,
    pub markets_rejected: usize,
    pub cancelled: usize,
    pub cancel_misses: usize,
}

/// Applies commands to a book, tracking the ids of limits it placed so cancels can refer to them.
#[derive(Debug, Default)]
pub struct Replayer {
    placements: Vec<OrderId>,
    stats: ReplayStats,
}

impl Replayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Ids of limit orders placed so far, in placement order.
    pub fn placements(&self) -> &[OrderId] {
        &self.placements
    }

    /// Applies one command. Expected rejections (insufficient liquidity, cancelling an order
    /// that is gone) are counted and returned; anything else is a bug in the stream or book.
    /// A cancel naming a placement that never happened is counted as a miss and returns `Ok`.
    pub fn apply(&mut self, book: &mut OrderBook, command: &Command) -> Result<(), EngineError> {
        match *command {
            Command::PlaceLimit { side, price, size } => {
                let handle = book.place_limit(side, price, size)?;
                self.placements.push(handle.id);
                self.stats.placed += 1;
                Ok(())
            }
            Command::PlaceMarket { side, size } => match book.place_market(side, size) {
                Ok(matches) => {
                    self.stats.markets_filled += 1;
                    self.stats.matches += matches.len();
                    self.stats.traded_volume += matches.iter().map(|m| m.size).sum::<Decimal>();
                    Ok(())
                }
                Err(e @ EngineError::InsufficientLiquidity { .. }) => {
                    self.stats.markets_rejected += 1;
                    Err(e)
                }
                Err(e) => Err(e),
            },
            Command::Cancel { placement } => {
                let Some(&order_id) = self.placements.get(placement) else {
                    // No order behind this index: count the miss, leave the book alone.
                    self.stats.cancel_misses += 1;
                    return Ok(());
                };
                match book.cancel(order_id) {
                    Ok(_) => {
                        self.stats.cancelled += 1;
                        Ok(())
                    }
                    Err(e) => {
                        self.stats.cancel_misses += 1;
                        Err(e)
                    }
                }
            }
        }
    }
}

/// Replays a stream into `book`, tolerating the rejections a random stream produces.
/// Returns the accumulated stats, or the first unexpected error.
pub fn replay_into_book(
    book: &mut OrderBook,
    commands: impl IntoIterator<Item = Command>,
) -> Result<ReplayStats, EngineError> {
    let mut replayer = Replayer::new();
    for command in commands {
        match replayer.apply(book, &command) {
            Ok(()) => {}
            Err(EngineError::InsufficientLiquidity { .. }) | Err(EngineError::OrderNotFound(_)) => {}
            Err(e) => return Err(e),
        }
    }
    Ok(replayer.stats.clone())
}
