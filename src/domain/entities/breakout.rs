use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::region::Region;

/// A symbol that passed every breakout gate, with its additive score.
///
/// Scores run from 0 to 100. The flags carry the human-readable reasons each
/// factor contributed its points, joined with "; " for the watchlist CSV.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakoutCandidate {
    pub region: Region,
    pub symbol: String,
    /// Last close, rounded to two decimals.
    pub price: f64,
    /// Additive breakout score in [0, 100].
    pub score: u32,
    /// 14-day RSI at the last bar, rounded to two decimals.
    pub rsi14: f64,
    /// Relative volume (volume / 50-day average volume), rounded to two decimals.
    pub rvol: f64,
    /// Normalized Bollinger band width at the last bar.
    pub bb_width: f64,
    pub flags: String,
    pub link: String,
    pub scanned_at: DateTime<Utc>,
}

impl BreakoutCandidate {
    /// Sort candidates for the watchlist: score descending, then region and
    /// symbol ascending for a stable report.
    pub fn rank(results: &mut Vec<BreakoutCandidate>) {
        results.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(a.region.cmp(&b.region))
                .then(a.symbol.cmp(&b.symbol))
        });
    }

    pub fn quote_link(symbol: &str) -> String {
        format!("https://finance.yahoo.com/quote/{}", symbol)
    }
}
