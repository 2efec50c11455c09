//! Error kinds returned by the book and the market registry.
//!
//! Every error is a recoverable value; the service layer decides how to present it.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Market, OrderId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Non-positive size or price.
    #[error("invalid order: {reason}")]
    InvalidOrder { reason: String },

    /// Market order larger than the whole opposite side.
    #[error("insufficient liquidity: requested {requested}, available {available}")]
    InsufficientLiquidity { requested: Decimal, available: Decimal },

    #[error("order {0} not found")]
    OrderNotFound(OrderId),

    #[error("market {0} not found")]
    MarketNotFound(Market),
}
