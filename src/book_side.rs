//! All price levels for one side of the book.
//!
//! Levels live in a `BTreeMap` keyed by price, so the price lookup and the ordered collection
//! are the same structure. Best ask is the lowest key, best bid the highest.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::price_level::PriceLevel;
use crate::types::Side;

/// Aggregated liquidity at one price.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DepthLevel {
    pub price: Decimal,
    pub volume: Decimal,
    pub order_count: usize,
}

#[derive(Clone, Debug)]
pub struct BookSide {
    side: Side,
    levels: BTreeMap<Decimal, PriceLevel>,
}

impl BookSide {
    pub fn new(side: Side) -> Self {
        Self {
            side,
            levels: BTreeMap::new(),
        }
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of live price levels.
    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Existing level at `price`, or a freshly registered empty one.
    pub fn upsert_level(&mut self, price: Decimal) -> &mut PriceLevel {
        self.levels
            .entry(price)
            .or_insert_with(|| PriceLevel::new(price))
    }

    /// Drops the level at `price`. No-op if absent.
    pub fn remove_level(&mut self, price: Decimal) -> Option<PriceLevel> {
        self.levels.remove(&price)
    }

    pub fn level(&self, price: Decimal) -> Option<&PriceLevel> {
        self.levels.get(&price)
    }

    pub(crate) fn level_mut(&mut self, price: Decimal) -> Option<&mut PriceLevel> {
        self.levels.get_mut(&price)
    }

    /// Levels best price first: ascending for asks, descending for bids.
    /// Walks the live map, so it always reflects the latest adds and removals.
    pub fn best_price_order(&self) -> Box<dyn Iterator<Item = &PriceLevel> + '_> {
        match self.side {
            Side::Ask => Box::new(self.levels.values()),
            Side::Bid => Box::new(self.levels.values().rev()),
        }
    }

    pub fn best_price(&self) -> Option<Decimal> {
        match self.side {
            Side::Ask => self.levels.keys().next().copied(),
            Side::Bid => self.levels.keys().next_back().copied(),
        }
    }

    pub(crate) fn best_level_mut(&mut self) -> Option<&mut PriceLevel> {
        match self.side {
            Side::Ask => self.levels.values_mut().next(),
            Side::Bid => self.levels.values_mut().next_back(),
        }
    }

    /// Sum of every level's volume. Not cached.
    pub fn total_volume(&self) -> Decimal {
        self.levels.values().map(PriceLevel::total_volume).sum()
    }

    /// (price, volume, order count) per level, best price first.
    pub fn depth(&self) -> Vec<DepthLevel> {
        self.best_price_order()
            .map(|level| DepthLevel {
                price: level.price(),
                volume: level.total_volume(),
                order_count: level.order_count(),
            })
            .collect()
    }
}
