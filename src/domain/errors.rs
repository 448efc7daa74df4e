use thiserror::Error;

use crate::domain::repositories::market_data::MarketDataError;

/// Top-level error for a scan run.
///
/// Per-symbol trouble (bad payloads, missing data, short histories) never
/// surfaces here; the scan logs it and skips the symbol. These are run-level
/// failures only.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error(transparent)]
    MarketData(#[from] MarketDataError),

    #[error("Watchlist I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Watchlist CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Scan task failed: {0}")]
    TaskJoin(String),
}
