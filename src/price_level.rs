//! One price on one side of the book.
//!
//! Orders queue in arrival order (oldest at the front) and `total_volume` caches the sum of
//! their remaining sizes. A level with no orders is dead and must be removed by its owner.

use std::collections::VecDeque;

use rust_decimal::Decimal;

use crate::execution::Match;
use crate::types::{Order, OrderId};

#[derive(Clone, Debug)]
pub struct PriceLevel {
    price: Decimal,
    orders: VecDeque<Order>,
    total_volume: Decimal,
}

impl PriceLevel {
    pub fn new(price: Decimal) -> Self {
        Self {
            price,
            orders: VecDeque::new(),
            total_volume: Decimal::ZERO,
        }
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn total_volume(&self) -> Decimal {
        self.total_volume
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Resting orders, oldest first.
    pub fn orders(&self) -> impl Iterator<Item = &Order> + '_ {
        self.orders.iter()
    }

    pub fn get(&self, order_id: OrderId) -> Option<&Order> {
        self.orders.iter().find(|o| o.id() == order_id)
    }

    /// Appends at the back of the queue. No re-sort: arrival order is queue order.
    pub fn add_order(&mut self, mut order: Order) {
        order.attach(self.price);
        self.total_volume += order.remaining();
        self.orders.push_back(order);
    }

    /// Removes an order by id, returning it detached. Linear scan.
    pub fn remove_order(&mut self, order_id: OrderId) -> Option<Order> {
        let pos = self.orders.iter().position(|o| o.id() == order_id)?;
        let mut order = self.orders.remove(pos)?;
        self.total_volume -= order.remaining();
        order.detach();
        Some(order)
    }

    /// Fills `incoming` against resting orders, oldest first, until either side runs out.
    /// Every match is priced at this level. Fully filled resting orders are dropped afterwards.
    pub fn fill(&mut self, incoming: &mut Order) -> Vec<Match> {
        let mut matches = Vec::new();
        let mut any_filled = false;

        for resting in self.orders.iter_mut() {
            if incoming.is_filled() {
                break;
            }
            let size_filled = resting.remaining().min(incoming.remaining());
            resting.fill(size_filled);
            incoming.fill(size_filled);
            self.total_volume -= size_filled;
            matches.push(Match::new(resting, incoming, self.price, size_filled));
            any_filled |= resting.is_filled();
        }

        if any_filled {
            self.orders.retain(|o| !o.is_filled());
        }
        matches
    }
}
