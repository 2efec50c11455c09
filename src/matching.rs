//! Price-time priority matching for market orders.
//!
//! [`check_liquidity`] rejects a market order the opposite side cannot absorb before anything
//! is touched; [`sweep`] then walks the opposite side best price first, filling level by level
//! and dropping levels as they empty.

use log::debug;
use rust_decimal::Decimal;

use crate::book_side::BookSide;
use crate::error::EngineError;
use crate::execution::Match;
use crate::types::Order;

/// Fails with [`EngineError::InsufficientLiquidity`] if `size` exceeds the side's total volume.
pub fn check_liquidity(opposite: &BookSide, size: Decimal) -> Result<(), EngineError> {
    let available = opposite.total_volume();
    if size > available {
        return Err(EngineError::InsufficientLiquidity {
            requested: size,
            available,
        });
    }
    Ok(())
}

/// Fills `incoming` against `opposite` until it is filled or the side runs dry.
/// Returns the matches in execution order.
pub fn sweep(opposite: &mut BookSide, incoming: &mut Order) -> Vec<Match> {
    let mut matches = Vec::new();
    while !incoming.is_filled() {
        let Some(level) = opposite.best_level_mut() else {
            break;
        };
        let price = level.price();
        let level_matches = level.fill(incoming);
        let emptied = level.is_empty();
        if emptied {
            opposite.remove_level(price);
        }
        if level_matches.is_empty() && !emptied {
            // A live level always has volume; no progress means a broken level.
            break;
        }
        for m in &level_matches {
            debug!(
                "match maker={} taker={} price={} size={} maker_filled={}",
                m.maker_order_id, m.taker_order_id, m.price, m.size, m.maker_filled
            );
        }
        matches.extend(level_matches);
    }
    matches
}
