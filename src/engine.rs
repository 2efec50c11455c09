//! Market registry: one [`OrderBook`] per market symbol.
//!
//! Built once at startup and handed to the service layer by reference. Each book sits behind
//! its own `RwLock`: a mutating call holds the write lock for exactly one book operation, and
//! queries share the read lock, so nobody observes a half-applied mutation. Books for
//! different markets never contend.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{info, warn};

use crate::error::EngineError;
use crate::order_book::OrderBook;
use crate::types::Market;

/// A book shared between request handlers.
pub type SharedOrderBook = Arc<RwLock<OrderBook>>;

#[derive(Debug, Default)]
pub struct MarketRegistry {
    books: HashMap<Market, SharedOrderBook>,
}

impl MarketRegistry {
    /// Creates a registry with an empty book for each market.
    pub fn new(markets: impl IntoIterator<Item = Market>) -> Self {
        let mut registry = Self::default();
        for market in markets {
            registry.register(market);
        }
        registry
    }

    /// Adds a market if missing. Returns its book either way.
    pub fn register(&mut self, market: Market) -> SharedOrderBook {
        self.books
            .entry(market.clone())
            .or_insert_with(|| {
                info!("market registered market={}", market);
                Arc::new(RwLock::new(OrderBook::new(market)))
            })
            .clone()
    }

    pub fn get(&self, market: &Market) -> Result<SharedOrderBook, EngineError> {
        self.books.get(market).cloned().ok_or_else(|| {
            warn!("market lookup failed market={}", market);
            EngineError::MarketNotFound(market.clone())
        })
    }

    /// Registered markets, sorted.
    pub fn markets(&self) -> Vec<Market> {
        let mut markets: Vec<Market> = self.books.keys().cloned().collect();
        markets.sort();
        markets
    }

    /// Runs a read-only query against `market`'s book under the shared lock.
    pub fn with_book<R>(
        &self,
        market: &Market,
        f: impl FnOnce(&OrderBook) -> R,
    ) -> Result<R, EngineError> {
        let book = self.get(market)?;
        // Book operations validate (including volume overflow) before mutating, so a
        // poisoned lock still guards a consistent book.
        let guard = book.read().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&*guard))
    }

    /// Runs one mutating operation against `market`'s book under the exclusive lock.
    pub fn with_book_mut<R>(
        &self,
        market: &Market,
        f: impl FnOnce(&mut OrderBook) -> Result<R, EngineError>,
    ) -> Result<R, EngineError> {
        let book = self.get(market)?;
        let mut guard = book.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Side;
    use rust_decimal::Decimal;
    use std::thread;

    fn init_log() {
        let _ = env_logger::try_init();
    }

    #[test]
    fn unknown_market_is_not_found() {
        init_log();
        let registry = MarketRegistry::new([Market::new("ETH")]);
        let err = registry.get(&Market::new("BTC")).unwrap_err();
        assert_eq!(err, EngineError::MarketNotFound(Market::new("BTC")));
        assert!(registry
            .with_book(&Market::new("BTC"), |book| book.len())
            .is_err());
    }

    #[test]
    fn register_is_idempotent() {
        let mut registry = MarketRegistry::new([Market::new("ETH")]);
        let book = registry.get(&Market::new("ETH")).unwrap();
        let again = registry.register(Market::new("ETH"));
        assert!(Arc::ptr_eq(&book, &again));
        registry.register(Market::new("BTC"));
        assert_eq!(registry.markets(), vec![Market::new("BTC"), Market::new("ETH")]);
    }

    #[test]
    fn markets_are_independent() {
        let registry = MarketRegistry::new([Market::new("ETH"), Market::new("BTC")]);
        let eth = Market::new("ETH");
        let btc = Market::new("BTC");
        registry
            .with_book_mut(&eth, |book| book.place_limit(Side::Ask, Decimal::from(100), Decimal::from(3)))
            .unwrap();
        assert_eq!(
            registry.with_book(&eth, |b| b.total_volume(Side::Ask)).unwrap(),
            Decimal::from(3)
        );
        assert_eq!(
            registry.with_book(&btc, |b| b.total_volume(Side::Ask)).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn concurrent_writers_are_serialized() {
        init_log();
        let registry = Arc::new(MarketRegistry::new([Market::new("ETH")]));
        let eth = Market::new("ETH");
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let eth = eth.clone();
                thread::spawn(move || {
                    for _ in 0..50 {
                        registry
                            .with_book_mut(&eth, |book| {
                                book.place_limit(Side::Bid, Decimal::from(100 + i), Decimal::from(1))
                            })
                            .unwrap();
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let (count, volume) = registry
            .with_book(&eth, |b| (b.len(), b.total_volume(Side::Bid)))
            .unwrap();
        assert_eq!(count, 400);
        assert_eq!(volume, Decimal::from(400));
    }

    #[test]
    fn readers_never_see_partial_mutation() {
        init_log();
        let registry = Arc::new(MarketRegistry::new([Market::new("ETH")]));
        let eth = Market::new("ETH");

        let writers: Vec<_> = (0..4)
            .map(|i| {
                let registry = Arc::clone(&registry);
                let eth = eth.clone();
                thread::spawn(move || {
                    for n in 0..100i64 {
                        registry
                            .with_book_mut(&eth, |book| {
                                book.place_limit(
                                    Side::Ask,
                                    Decimal::from(100 + (n + i) % 7),
                                    Decimal::from(1 + n % 3),
                                )
                            })
                            .unwrap();
                        if n % 4 == 3 {
                            // May find too little resting; that rejection is all-or-nothing.
                            let _ = registry.with_book_mut(&eth, |book| {
                                book.place_market(Side::Bid, Decimal::from(5))
                            });
                        }
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                let eth = eth.clone();
                thread::spawn(move || {
                    for _ in 0..500 {
                        let (depth, total) = registry
                            .with_book(&eth, |b| (b.depth(Side::Ask), b.total_volume(Side::Ask)))
                            .unwrap();
                        let summed: Decimal = depth.iter().map(|l| l.volume).sum();
                        assert_eq!(summed, total, "depth and total volume disagree");
                        assert!(depth.windows(2).all(|w| w[0].price < w[1].price));
                        assert!(depth.iter().all(|l| l.volume > Decimal::ZERO && l.order_count > 0));
                    }
                })
            })
            .collect();

        for h in writers.into_iter().chain(readers) {
            h.join().unwrap();
        }
        let (depth, total) = registry
            .with_book(&eth, |b| (b.depth(Side::Ask), b.total_volume(Side::Ask)))
            .unwrap();
        assert_eq!(depth.iter().map(|l| l.volume).sum::<Decimal>(), total);
    }
}
