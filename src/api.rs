//! REST API router over a [`MarketRegistry`].
//!
//! Book and order routes name their market in the path or body and resolve it through the registry;
//! engine errors become JSON `{"error": ...}` bodies with a matching status code.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use rust_decimal::Decimal;

use crate::engine::MarketRegistry;
use crate::error::EngineError;
use crate::{DepthLevel, Market, Match, OrderId, Side};

/// Shared app state: the registry built at startup.
#[derive(Clone)]
pub struct AppState {
    pub(crate) registry: Arc<MarketRegistry>,
}

/// Mounts the order and book routes over `registry`, which is shared with every handler.
pub fn create_router(registry: MarketRegistry) -> Router<()> {
    let state = AppState {
        registry: Arc::new(registry),
    };
    Router::new()
        .route("/health", get(health))
        .route("/book/:market", get(get_book))
        .route("/book/:market/depth", get(get_depth))
        .route("/order", post(place_order))
        .route("/order/:market/:id", delete(cancel_order))
        .layer(Extension(state))
}

/// Engine and request errors mapped onto HTTP.
#[derive(Debug)]
pub enum ApiError {
    Engine(EngineError),
    BadRequest(String),
}

impl From<EngineError> for ApiError {
    fn from(e: EngineError) -> Self {
        ApiError::Engine(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Engine(e) => {
                let status = match e {
                    EngineError::InvalidOrder { .. } => StatusCode::BAD_REQUEST,
                    EngineError::InsufficientLiquidity { .. } => StatusCode::UNPROCESSABLE_ENTITY,
                    EngineError::OrderNotFound(_) | EngineError::MarketNotFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                };
                (status, e.to_string())
            }
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

async fn get_book(
    Extension(state): Extension<AppState>,
    Path(market): Path<String>,
) -> Result<Response, ApiError> {
    let snapshot = state
        .registry
        .with_book(&Market::new(market), |book| book.snapshot())?;
    Ok((StatusCode::OK, Json(snapshot)).into_response())
}

#[derive(serde::Serialize)]
struct DepthOut {
    bids: Vec<DepthLevel>,
    asks: Vec<DepthLevel>,
}

async fn get_depth(
    Extension(state): Extension<AppState>,
    Path(market): Path<String>,
) -> Result<Response, ApiError> {
    let depth = state.registry.with_book(&Market::new(market), |book| DepthOut {
        bids: book.depth(Side::Bid),
        asks: book.depth(Side::Ask),
    })?;
    Ok((StatusCode::OK, Json(depth)).into_response())
}

#[derive(Clone, Copy, Debug, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
enum OrderKind {
    Limit,
    Market,
}

#[derive(Debug, serde::Deserialize)]
struct PlaceOrderRequest {
    market: Market,
    #[serde(rename = "type")]
    kind: OrderKind,
    side: Side,
    size: Decimal,
    #[serde(default)]
    price: Option<Decimal>,
}

async fn place_order(
    Extension(state): Extension<AppState>,
    Json(req): Json<PlaceOrderRequest>,
) -> Result<Response, ApiError> {
    match req.kind {
        OrderKind::Limit => {
            let price = req
                .price
                .ok_or_else(|| ApiError::BadRequest("limit order must have price".into()))?;
            let handle = state
                .registry
                .with_book_mut(&req.market, |book| book.place_limit(req.side, price, req.size))?;
            Ok((StatusCode::CREATED, Json(handle)).into_response())
        }
        OrderKind::Market => {
            let matches = state
                .registry
                .with_book_mut(&req.market, |book| book.place_market(req.side, req.size))?;
            #[derive(serde::Serialize)]
            struct Out {
                matches: Vec<Match>,
            }
            Ok((StatusCode::CREATED, Json(Out { matches })).into_response())
        }
    }
}

async fn cancel_order(
    Extension(state): Extension<AppState>,
    Path((market, id)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let order_id = id
        .parse::<u64>()
        .map(OrderId)
        .map_err(|_| ApiError::BadRequest(format!("invalid order id {:?}", id)))?;
    let order = state
        .registry
        .with_book_mut(&Market::new(market), |book| book.cancel(order_id))?;
    Ok((StatusCode::OK, Json(order)).into_response())
}
