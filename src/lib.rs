//! # Order book engine
//!
//! Single-market limit order book with deterministic price-time priority matching:
//! resting limit orders, all-or-nothing market orders, cancels, and depth queries.
//!
//! ## Entry point
//!
//! Use [`OrderBook`] for one market: [`OrderBook::place_limit`], [`OrderBook::place_market`],
//! [`OrderBook::cancel`], [`OrderBook::depth`] and [`OrderBook::total_volume`].
//! For several markets shared across threads, build a [`MarketRegistry`] once at startup.
//!
//! ## Example
//!
//! ```rust
//! use orderbook_engine::{Market, OrderBook, Side};
//! use rust_decimal::Decimal;
//!
//! let mut book = OrderBook::new(Market::new("ETH"));
//! book.place_limit(Side::Ask, Decimal::from(10_000), Decimal::from(10)).unwrap();
//! book.place_limit(Side::Ask, Decimal::from(9_000), Decimal::from(5)).unwrap();
//!
//! let matches = book.place_market(Side::Bid, Decimal::from(10)).unwrap();
//! assert_eq!(matches[0].price, Decimal::from(9_000));
//! assert_eq!(book.total_volume(Side::Ask), Decimal::from(5));
//! ```
//!
//! ## Lower-level API
//!
//! [`BookSide`], [`PriceLevel`] and the [`matching`] functions are public for callers that
//! want to drive the structures directly.

pub mod api;
pub mod book_side;
pub mod config;
pub mod engine;
pub mod error;
pub mod execution;
pub mod market_data_gen;
pub mod matching;
pub mod order_book;
pub mod price_level;
pub mod types;

pub use book_side::{BookSide, DepthLevel};
pub use config::ServerConfig;
pub use engine::{MarketRegistry, SharedOrderBook};
pub use error::EngineError;
pub use execution::Match;
pub use market_data_gen::{replay_into_book, Command, Generator, GeneratorConfig, ReplayStats, Replayer};
pub use order_book::{BookSnapshot, OrderBook};
pub use price_level::PriceLevel;
pub use types::{Market, Order, OrderHandle, OrderId, OrderStatus, Side};
