//! Server configuration from environment variables.
//!
//! `HOST` (default `0.0.0.0`), `PORT` (default `8080`), `MARKETS` (comma-separated symbols,
//! default `ETH`). Values that do not parse fall back to the default.

use log::warn;

use crate::types::Market;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_MARKET: &str = "ETH";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub markets: Vec<Market>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            markets: vec![Market::new(DEFAULT_MARKET)],
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup (the process environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST").filter(|h| !h.trim().is_empty()) {
            config.host = host.trim().to_string();
        }
        if let Some(port) = lookup("PORT") {
            match port.trim().parse() {
                Ok(p) => config.port = p,
                Err(_) => warn!("ignoring unparsable PORT={:?}, using {}", port, DEFAULT_PORT),
            }
        }
        if let Some(raw) = lookup("MARKETS") {
            let markets = parse_markets(&raw);
            if markets.is_empty() {
                warn!("MARKETS={:?} names no market, using {}", raw, DEFAULT_MARKET);
            } else {
                config.markets = markets;
            }
        }
        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_markets(raw: &str) -> Vec<Market> {
    let mut markets: Vec<Market> = Vec::new();
    for symbol in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let market = Market::new(symbol);
        if !markets.contains(&market) {
            markets.push(market);
        }
    }
    markets
}
