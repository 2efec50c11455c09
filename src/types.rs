//! Core types and IDs for the order book.
//!
//! Identifiers are newtype wrappers. [`Order`] is the unit of trading interest;
//! [`OrderHandle`] is the read-only view returned to callers.

use rust_decimal::Decimal;

use crate::error::EngineError;

/// Unique order identifier, assigned by the book that accepted the order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct OrderId(pub u64);

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Market symbol (e.g. `ETH`). One [`crate::OrderBook`] per market.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct Market(pub String);

impl Market {
    pub fn new(symbol: impl Into<String>) -> Self {
        Self(symbol.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Market {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Order side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Bid,
    Ask,
}

impl Side {
    /// The side an incoming order on `self` takes liquidity from.
    pub fn opposite(self) -> Self {
        match self {
            Side::Bid => Side::Ask,
            Side::Ask => Side::Bid,
        }
    }
}

/// Order lifecycle status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Cancelled,
}

/// An order: side, original and remaining size, arrival time.
///
/// Only the matching routine reduces `remaining`; everything else is fixed at construction.
/// `level` is the price of the level currently holding the order, `None` when not resting.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Order {
    id: OrderId,
    side: Side,
    size: Decimal,
    remaining: Decimal,
    timestamp: u64,
    status: OrderStatus,
    level: Option<Decimal>,
}

impl Order {
    /// Builds an open order. Fails with [`EngineError::InvalidOrder`] unless `size > 0`.
    pub fn new(id: OrderId, side: Side, size: Decimal, timestamp: u64) -> Result<Self, EngineError> {
        if size <= Decimal::ZERO {
            return Err(EngineError::InvalidOrder {
                reason: format!("size must be positive, got {}", size),
            });
        }
        Ok(Self {
            id,
            side,
            size,
            remaining: size,
            timestamp,
            status: OrderStatus::Open,
            level: None,
        })
    }

    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Original requested size.
    pub fn size(&self) -> Decimal {
        self.size
    }

    pub fn remaining(&self) -> Decimal {
        self.remaining
    }

    /// Quantity matched so far.
    pub fn filled(&self) -> Decimal {
        self.size - self.remaining
    }

    /// Arrival time, Unix epoch nanoseconds.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn is_filled(&self) -> bool {
        self.remaining.is_zero()
    }

    /// Price of the level this order rests at, if any.
    pub fn level_price(&self) -> Option<Decimal> {
        self.level
    }

    /// Reduces the remaining size by `qty`, capped at what is left. Returns the amount applied.
    pub(crate) fn fill(&mut self, qty: Decimal) -> Decimal {
        let applied = qty.min(self.remaining).max(Decimal::ZERO);
        self.remaining -= applied;
        self.status = if self.remaining.is_zero() {
            OrderStatus::Filled
        } else if applied > Decimal::ZERO {
            OrderStatus::PartiallyFilled
        } else {
            self.status
        };
        applied
    }

    pub(crate) fn attach(&mut self, price: Decimal) {
        self.level = Some(price);
    }

    pub(crate) fn detach(&mut self) {
        self.level = None;
    }

    pub(crate) fn mark_cancelled(&mut self) {
        self.status = OrderStatus::Cancelled;
    }
}

/// What the caller gets back for an order: identity, side, price, sizes, arrival time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderHandle {
    pub id: OrderId,
    pub side: Side,
    pub price: Decimal,
    pub size: Decimal,
    pub remaining: Decimal,
    pub timestamp: u64,
}

impl OrderHandle {
    pub(crate) fn resting(order: &Order, price: Decimal) -> Self {
        Self {
            id: order.id(),
            side: order.side(),
            price,
            size: order.size(),
            remaining: order.remaining(),
            timestamp: order.timestamp(),
        }
    }
}
