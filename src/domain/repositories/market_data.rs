//! Market Data Provider Trait
//!
//! This module defines the `MarketDataProvider` trait, the common interface
//! for whatever service supplies daily price history and fundamental
//! snapshots. The scan services only see this abstraction, which keeps the
//! scoring logic independent of any vendor API and easy to mock in tests.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::entities::fundamentals::FundamentalSnapshot;
use crate::domain::services::indicators::Candle;

/// Common result type for market data operations
pub type MarketDataResult<T> = Result<T, MarketDataError>;

/// Errors that can occur while fetching market data
#[derive(Debug, Error)]
pub enum MarketDataError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("Unexpected payload for {symbol}: {reason}")]
    Payload { symbol: String, reason: String },
    #[error("No data for symbol: {0}")]
    NoData(String),
    #[error("Rate limited by data service")]
    RateLimited,
}

impl MarketDataError {
    pub fn payload(symbol: &str, reason: impl Into<String>) -> Self {
        MarketDataError::Payload {
            symbol: symbol.to_string(),
            reason: reason.into(),
        }
    }
}

/// How much daily history to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    SixMonths,
    OneYear,
    TwoYears,
}

impl HistoryRange {
    pub fn as_query(&self) -> &str {
        match self {
            HistoryRange::SixMonths => "6mo",
            HistoryRange::OneYear => "1y",
            HistoryRange::TwoYears => "2y",
        }
    }
}

/// Provider of daily OHLCV history and fundamental snapshots.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Daily bars for `symbol`, oldest first.
    async fn daily_history(&self, symbol: &str, range: HistoryRange)
        -> MarketDataResult<Vec<Candle>>;

    /// Fundamental snapshot for `symbol`; unknown figures stay `None`.
    async fn fundamentals(&self, symbol: &str) -> MarketDataResult<FundamentalSnapshot>;
}
