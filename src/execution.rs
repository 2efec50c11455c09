//! Match records.
//!
//! A [`Match`] is emitted for each pairing of a resting (maker) order with an incoming (taker)
//! order. The service layer uses these for settlement after the engine call returns.

use rust_decimal::Decimal;

use crate::types::{Order, OrderId, Side};

/// One fill between a maker and a taker, at the maker's price.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Match {
    pub maker_order_id: OrderId,
    pub taker_order_id: OrderId,
    pub ask_order_id: OrderId,
    pub bid_order_id: OrderId,
    pub price: Decimal,
    pub size: Decimal,
    /// True if the maker was fully consumed by this match (and left the book).
    pub maker_filled: bool,
}

impl Match {
    /// Labels bid/ask by each order's own side, not by which one is incoming.
    pub(crate) fn new(maker: &Order, taker: &Order, price: Decimal, size: Decimal) -> Self {
        let (bid, ask) = match maker.side() {
            Side::Bid => (maker.id(), taker.id()),
            Side::Ask => (taker.id(), maker.id()),
        };
        Self {
            maker_order_id: maker.id(),
            taker_order_id: taker.id(),
            ask_order_id: ask,
            bid_order_id: bid,
            price,
            size,
            maker_filled: maker.is_filled(),
        }
    }

    /// Side of the taker, i.e. who crossed the spread.
    pub fn aggressor_side(&self) -> Side {
        if self.taker_order_id == self.bid_order_id {
            Side::Bid
        } else {
            Side::Ask
        }
    }
}
