use std::time::Duration;
use thiserror::Error;

use crate::models::FundamentalSnapshot;

pub mod yahoo_client;
pub use yahoo_client::YahooFinanceClient;

/// Errors surfaced by the data provider boundary.
///
/// A `SymbolNotFound` means the provider has no record of the ticker; the
/// screener skips the ticker and keeps going. Everything else is a transport
/// or decoding problem with the same recovery.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no data for symbol {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected provider response: {0}")]
    Decode(String),
}

/// Simple rate limiter for API requests
pub struct ApiRateLimiter {
    delay_ms: u64,
}

impl ApiRateLimiter {
    pub fn new(requests_per_minute: u32) -> Self {
        let delay_ms = if requests_per_minute > 0 {
            60_000 / requests_per_minute as u64
        } else {
            1000 // Default 1 second delay
        };

        Self { delay_ms }
    }

    pub async fn wait(&self) {
        tokio::time::sleep(Duration::from_millis(self.delay_ms)).await;
    }
}

/// Common trait for fundamental data providers
#[async_trait::async_trait]
pub trait FundamentalsProvider: Send + Sync {
    async fn fetch_fundamentals(&self, symbol: &str)
        -> Result<FundamentalSnapshot, ProviderError>;
}
