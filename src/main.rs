//! HTTP server for the order book engine.
//!
//! Endpoints: health, book snapshot, depth, place order, cancel order.
//! Configured from the environment; see [`orderbook_engine::config`].

use log::info;
use orderbook_engine::{api, MarketRegistry, ServerConfig};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let _ = env_logger::try_init();
    let config = ServerConfig::from_env();

    let registry = MarketRegistry::new(config.markets.iter().cloned());
    let app = api::create_router(registry);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "listening on http://{} markets={:?}",
        addr,
        config.markets.iter().map(|m| m.as_str()).collect::<Vec<_>>()
    );
    axum::serve(listener, app.into_make_service()).await
}
