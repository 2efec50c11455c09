//! Single-market order book: bids and asks, price-time priority.
//!
//! [`OrderBook`] owns both [`BookSide`]s and an index from order id to where the order rests.
//! Limit orders always rest (they never match on arrival, even when marketable); market
//! orders sweep the opposite side and are rejected whole if it cannot absorb them.
//!
//! Every method runs to completion without yielding. Callers sharing a book across threads
//! must serialize mutations; see [`crate::engine::MarketRegistry`].

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use log::{info, warn};
use rust_decimal::Decimal;

use crate::book_side::{BookSide, DepthLevel};
use crate::error::EngineError;
use crate::execution::Match;
use crate::matching;
use crate::types::{Market, Order, OrderHandle, OrderId, Side};

/// Totals plus every resting order, best price first on each side.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BookSnapshot {
    pub market: Market,
    pub total_bid_volume: Decimal,
    pub total_ask_volume: Decimal,
    pub asks: Vec<OrderHandle>,
    pub bids: Vec<OrderHandle>,
}

#[derive(Debug)]
pub struct OrderBook {
    market: Market,
    bids: BookSide,
    asks: BookSide,
    /// Resting orders by id: (side, level price).
    orders: HashMap<OrderId, (Side, Decimal)>,
    next_order_id: u64,
    last_timestamp: u64,
}

impl OrderBook {
    pub fn new(market: Market) -> Self {
        Self {
            market,
            bids: BookSide::new(Side::Bid),
            asks: BookSide::new(Side::Ask),
            orders: HashMap::new(),
            next_order_id: 1,
            last_timestamp: 0,
        }
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    /// Rests a limit order at `price` on `side`. Never matches against the opposite side.
    ///
    /// Rejects a size that would push the side's total volume past [`Decimal::MAX`]; level
    /// totals are bounded by the side total, so no later addition can overflow either.
    pub fn place_limit(
        &mut self,
        side: Side,
        price: Decimal,
        size: Decimal,
    ) -> Result<OrderHandle, EngineError> {
        if price <= Decimal::ZERO {
            warn!("limit rejected market={} side={:?} price={} reason=non-positive price", self.market, side, price);
            return Err(EngineError::InvalidOrder {
                reason: format!("price must be positive, got {}", price),
            });
        }
        if self.total_volume(side).checked_add(size).is_none() {
            warn!("limit rejected market={} side={:?} size={} reason=side volume overflow", self.market, side, size);
            return Err(EngineError::InvalidOrder {
                reason: format!("size {} would overflow {:?} side volume", size, side),
            });
        }
        let order = match self.new_order(side, size) {
            Ok(order) => order,
            Err(e) => {
                warn!("limit rejected market={} side={:?} size={} reason={}", self.market, side, size, e);
                return Err(e);
            }
        };
        let handle = OrderHandle::resting(&order, price);
        self.book_side_mut(side).upsert_level(price).add_order(order);
        self.orders.insert(handle.id, (side, price));
        info!(
            "limit placed market={} order_id={} side={:?} price={} size={}",
            self.market, handle.id, side, price, size
        );
        Ok(handle)
    }

    /// Fills a market order of `size` on `side` against the opposite side, best price first.
    ///
    /// All or nothing: if the opposite side holds less than `size`, fails with
    /// [`EngineError::InsufficientLiquidity`] and the book is untouched.
    pub fn place_market(&mut self, side: Side, size: Decimal) -> Result<Vec<Match>, EngineError> {
        if size <= Decimal::ZERO {
            warn!("market rejected market={} side={:?} size={} reason=non-positive size", self.market, side, size);
            return Err(EngineError::InvalidOrder {
                reason: format!("size must be positive, got {}", size),
            });
        }
        if let Err(e) = matching::check_liquidity(self.book_side(side.opposite()), size) {
            warn!("market rejected market={} side={:?} size={} reason={}", self.market, side, size, e);
            return Err(e);
        }

        let mut taker = self.new_order(side, size)?;
        let matches = matching::sweep(self.book_side_mut(side.opposite()), &mut taker);
        for m in matches.iter().filter(|m| m.maker_filled) {
            self.orders.remove(&m.maker_order_id);
        }
        info!(
            "market filled market={} order_id={} side={:?} size={} matches={}",
            self.market,
            taker.id(),
            side,
            size,
            matches.len()
        );
        Ok(matches)
    }

    /// Removes a resting order. Fails with [`EngineError::OrderNotFound`] if it is not resting.
    /// Returns the order as it was when pulled, marked cancelled.
    pub fn cancel(&mut self, order_id: OrderId) -> Result<Order, EngineError> {
        let Some(&(side, price)) = self.orders.get(&order_id) else {
            warn!("cancel rejected market={} order_id={} reason=not found", self.market, order_id);
            return Err(EngineError::OrderNotFound(order_id));
        };
        let book_side = self.book_side_mut(side);
        let Some(level) = book_side.level_mut(price) else {
            return Err(EngineError::OrderNotFound(order_id));
        };
        let Some(mut order) = level.remove_order(order_id) else {
            return Err(EngineError::OrderNotFound(order_id));
        };
        if level.is_empty() {
            book_side.remove_level(price);
        }
        self.orders.remove(&order_id);
        order.mark_cancelled();
        info!(
            "order cancelled market={} order_id={} side={:?} price={} remaining={}",
            self.market,
            order_id,
            side,
            price,
            order.remaining()
        );
        Ok(order)
    }

    /// Looks up a resting order by id.
    pub fn order(&self, order_id: OrderId) -> Option<&Order> {
        let &(side, price) = self.orders.get(&order_id)?;
        self.book_side(side).level(price)?.get(order_id)
    }

    pub fn depth(&self, side: Side) -> Vec<DepthLevel> {
        self.book_side(side).depth()
    }

    pub fn total_volume(&self, side: Side) -> Decimal {
        self.book_side(side).total_volume()
    }

    pub fn best_bid(&self) -> Option<Decimal> {
        self.bids.best_price()
    }

    pub fn best_ask(&self) -> Option<Decimal> {
        self.asks.best_price()
    }

    /// Resting orders on `side`, best price first and oldest first within a price.
    pub fn resting_orders(&self, side: Side) -> Vec<OrderHandle> {
        self.book_side(side)
            .best_price_order()
            .flat_map(|level| {
                level
                    .orders()
                    .map(move |order| OrderHandle::resting(order, level.price()))
            })
            .collect()
    }

    pub fn snapshot(&self) -> BookSnapshot {
        BookSnapshot {
            market: self.market.clone(),
            total_bid_volume: self.bids.total_volume(),
            total_ask_volume: self.asks.total_volume(),
            asks: self.resting_orders(Side::Ask),
            bids: self.resting_orders(Side::Bid),
        }
    }

    pub fn book_side(&self, side: Side) -> &BookSide {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Number of resting orders.
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    fn book_side_mut(&mut self, side: Side) -> &mut BookSide {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    /// Validates the size, then assigns the next id and arrival time.
    fn new_order(&mut self, side: Side, size: Decimal) -> Result<Order, EngineError> {
        let timestamp = self.next_timestamp();
        let order = Order::new(OrderId(self.next_order_id), side, size, timestamp)?;
        self.next_order_id += 1;
        self.last_timestamp = timestamp;
        Ok(order)
    }

    /// Wall-clock nanoseconds, forced strictly increasing within this book.
    fn next_timestamp(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::try_from(d.as_nanos()).unwrap_or(u64::MAX))
            .unwrap_or(0);
        now.max(self.last_timestamp.saturating_add(1))
    }
}
